use clap::{Args, ValueEnum};

use procure_api::types::ListScope;
use procure_app::RequestListModel;
use procure_core::config::AppConfig;
use procure_core::domain::request::RequestStatus;
use procure_core::filters::{FilterOptions, SortKey, SortOrder};
use procure_core::progress;

use super::Context;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScopeArg {
    Mine,
    Team,
    Queue,
    All,
}

impl From<ScopeArg> for ListScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Mine => Self::Mine,
            ScopeArg::Team => Self::Team,
            ScopeArg::Queue => Self::Queue,
            ScopeArg::All => Self::All,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortArg {
    CreatedAt,
    UpdatedAt,
    Item,
    Status,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::CreatedAt => Self::CreatedAt,
            SortArg::UpdatedAt => Self::UpdatedAt,
            SortArg::Item => Self::Item,
            SortArg::Status => Self::Status,
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value = "mine", help = "Which list to read")]
    pub scope: ScopeArg,
    #[arg(long, help = "Keep only these statuses (repeatable)")]
    pub status: Vec<String>,
    #[arg(long, help = "Case-insensitive text search over item, number, description, creator")]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value = "created-at")]
    pub sort: SortArg,
    #[arg(long, help = "Sort ascending instead of newest-first")]
    pub asc: bool,
    #[arg(long, help = "Fetch up to this many extra pages after the first")]
    pub pages: Option<u32>,
}

pub async fn run(config: AppConfig, args: ListArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let mut filters = FilterOptions {
        sort_by: args.sort.into(),
        sort_order: if args.asc { SortOrder::Asc } else { SortOrder::Desc },
        ..FilterOptions::default()
    };
    for raw in &args.status {
        filters.statuses.insert(raw.parse::<RequestStatus>()?);
    }

    let mut model =
        RequestListModel::new(ctx.client.clone(), args.scope.into(), ctx.config.api.page_size);
    model.set_filters(filters);
    if let Some(search) = args.search {
        model.set_query(search);
    }

    model.refresh().await;
    for _ in 0..args.pages.unwrap_or(0) {
        if !model.has_more() {
            break;
        }
        model.load_more().await;
    }

    let visible = model.visible();
    if visible.is_empty() {
        println!("no matching requests");
    }
    for request in &visible {
        let progress = progress::percent(request.status);
        println!(
            "{:<16} {:>3}%  {:<20} {:<10} {}  {}",
            request.request_number,
            progress,
            request.status.label(),
            format!("{} {:?}", request.quantity, request.unit).to_lowercase(),
            request.item,
            request.created_by_name,
        );
    }
    if model.has_more() {
        println!("... more pages available (--pages to fetch)");
    }

    super::print_banners(model.take_banners());
    ctx.finish().await
}
