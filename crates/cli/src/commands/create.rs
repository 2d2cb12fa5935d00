use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use procure_api::types::NewRequest;
use procure_core::config::AppConfig;
use procure_core::domain::request::Unit;

use super::Context;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UnitArg {
    Pieces,
    Kg,
    Ton,
    Meter,
    M2,
    M3,
    Liter,
}

impl From<UnitArg> for Unit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Pieces => Self::Pieces,
            UnitArg::Kg => Self::Kg,
            UnitArg::Ton => Self::Ton,
            UnitArg::Meter => Self::Meter,
            UnitArg::M2 => Self::M2,
            UnitArg::M3 => Self::M3,
            UnitArg::Liter => Self::Liter,
        }
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(help = "What to procure, e.g. \"Cordless drill\"")]
    pub item: String,
    #[arg(long)]
    pub quantity: Decimal,
    #[arg(long, value_enum, default_value = "pieces")]
    pub unit: UnitArg,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub reason: String,
}

pub async fn run(config: AppConfig, args: CreateArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let new = NewRequest {
        item: args.item,
        quantity: args.quantity,
        unit: args.unit.into(),
        description: args.description,
        category: args.category,
        reason: args.reason,
    };

    let request = ctx
        .client
        .create_request(&new)
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message()))?;

    println!("created {} ({})", request.request_number, request.status.label());
    println!("submit it with: procure submit {}", request.id);
    ctx.finish().await
}
