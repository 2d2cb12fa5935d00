use chrono::Utc;
use clap::Args;

use procure_core::config::AppConfig;
use procure_core::domain::request::RequestId;
use procure_core::progress::{self, StatusProgress};

use super::Context;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
    #[arg(long, help = "Include the full approval history")]
    pub history: bool,
}

pub async fn run(config: AppConfig, args: ShowArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let request =
        ctx.client.get_request(id).await.map_err(|error| anyhow::anyhow!(error.user_message()))?;

    let timeline = StatusProgress::of(request.status);
    println!("{}  {}", request.request_number, request.item);
    println!("status: {} ({}%, {:?})", request.status.label(), timeline.percent, timeline.color);
    println!("quantity: {} {}", request.quantity, request.unit.label().to_lowercase());
    if !request.description.is_empty() {
        println!("description: {}", request.description);
    }
    if !request.reason.is_empty() {
        println!("reason: {}", request.reason);
    }
    println!("created by: {} on {}", request.created_by_name, request.created_at.date_naive());
    match request.submitted_at {
        Some(submitted_at) => println!(
            "submitted: {} ({} days ago)",
            submitted_at.date_naive(),
            progress::days_elapsed(&request, Utc::now())
        ),
        None => println!("not yet submitted"),
    }
    if request.revision_count > 0 {
        println!("revisions: {}", request.revision_count);
        if !request.revision_notes.is_empty() {
            println!("revision notes: {}", request.revision_notes);
        }
    }

    if args.history {
        let entries =
            ctx.client.history(id).await.map_err(|error| anyhow::anyhow!(error.user_message()))?;
        println!("history:");
        for entry in entries {
            let notes = if entry.notes.is_empty() {
                String::new()
            } else {
                format!(": {}", entry.notes)
            };
            println!(
                "  {}  {} by {} (level {}){}",
                entry.created_at.date_naive(),
                entry.action.label(),
                entry.user_name,
                entry.level,
                notes,
            );
        }
    }

    ctx.finish().await
}
