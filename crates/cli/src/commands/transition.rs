use clap::{Args, ValueEnum};
use serde_json::json;

use procure_api::error::ApiError;
use procure_api::types::WriteMethod;
use procure_core::config::AppConfig;
use procure_core::domain::request::{Request, RequestId, RequestStatus};

use super::Context;

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct NotesArgs {
    pub id: i64,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Args)]
pub struct ReasonArgs {
    pub id: i64,
    #[arg(long, help = "Why the request is rejected; the backend refuses blank reasons")]
    pub reason: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PurchasingStatusArg {
    Ordered,
    Delivered,
}

impl From<PurchasingStatusArg> for RequestStatus {
    fn from(value: PurchasingStatusArg) -> Self {
        match value {
            PurchasingStatusArg::Ordered => Self::Ordered,
            PurchasingStatusArg::Delivered => Self::Delivered,
        }
    }
}

#[derive(Debug, Args)]
pub struct PurchasingArgs {
    pub id: i64,
    #[arg(long, value_enum)]
    pub status: PurchasingStatusArg,
    #[arg(long, default_value = "")]
    pub notes: String,
}

/// Report a lifecycle write. Connectivity failures land in the offline queue
/// (replayed by `procure queue drain`); everything else only banners.
fn settle(
    ctx: &mut Context,
    result: Result<Request, ApiError>,
    method: WriteMethod,
    path: String,
    payload: serde_json::Value,
) {
    match result {
        Ok(request) => {
            println!("{} is now: {}", request.request_number, request.status.label());
        }
        Err(error) => {
            let queued = ctx.store.record_write_failure(&error, method, path, Some(payload));
            if queued.is_some() {
                println!("queued for replay ({} pending)", ctx.store.pending_writes());
            }
        }
    }
}

pub async fn submit(config: AppConfig, args: IdArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let result = ctx.client.submit(id).await;
    settle(&mut ctx, result, WriteMethod::Post, format!("requests/{id}/submit/"), json!({}));
    ctx.finish().await
}

pub async fn approve(config: AppConfig, args: NotesArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let result = ctx.client.approve(id, &args.notes).await;
    settle(
        &mut ctx,
        result,
        WriteMethod::Post,
        format!("requests/{id}/approve/"),
        json!({ "notes": args.notes }),
    );
    ctx.finish().await
}

pub async fn reject(config: AppConfig, args: ReasonArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let result = ctx.client.reject(id, &args.reason).await;
    settle(
        &mut ctx,
        result,
        WriteMethod::Post,
        format!("requests/{id}/reject/"),
        json!({ "reason": args.reason }),
    );
    ctx.finish().await
}

pub async fn revise(config: AppConfig, args: NotesArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let result = ctx.client.revise(id, &args.notes).await;
    settle(
        &mut ctx,
        result,
        WriteMethod::Post,
        format!("requests/{id}/revise/"),
        json!({ "notes": args.notes }),
    );
    ctx.finish().await
}

pub async fn purchasing(config: AppConfig, args: PurchasingArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let status = RequestStatus::from(args.status);
    let result = ctx.client.set_purchasing_status(id, status, &args.notes).await;
    settle(
        &mut ctx,
        result,
        WriteMethod::Post,
        format!("requests/{id}/purchasing-status/"),
        json!({ "status": status, "notes": args.notes }),
    );
    ctx.finish().await
}

pub async fn complete(config: AppConfig, args: IdArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let id = RequestId(args.id);
    let result = ctx.client.complete(id).await;
    settle(&mut ctx, result, WriteMethod::Post, format!("requests/{id}/complete/"), json!({}));
    ctx.finish().await
}
