use clap::Subcommand;
use uuid::Uuid;

use procure_core::config::AppConfig;

use super::Context;

#[derive(Debug, Subcommand)]
pub enum QueueAction {
    #[command(about = "Show the queued writes waiting for connectivity")]
    Status,
    #[command(about = "Replay queued writes against the backend, oldest first")]
    Drain,
    #[command(about = "Remove one queued write without replaying it")]
    Remove { id: Uuid },
    #[command(about = "Discard every queued write")]
    Clear,
}

pub async fn run(config: AppConfig, action: QueueAction) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;

    match action {
        QueueAction::Status => {
            let items = ctx.store.pending_items();
            if items.is_empty() {
                println!("offline queue is empty");
            } else {
                println!("{} pending write(s):", items.len());
                for item in items {
                    println!(
                        "  {}  {} {}  queued {}",
                        item.id,
                        item.method.as_str(),
                        item.url,
                        item.queued_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    );
                }
            }
        }
        QueueAction::Drain => {
            if !ctx.store.has_pending_writes() {
                println!("offline queue is empty");
                return ctx.finish().await;
            }
            ctx.ensure_session().await?;
            let outcome = ctx.store.connectivity_restored(ctx.client.as_ref()).await;
            if outcome.remaining > 0 {
                println!("{} write(s) still queued", outcome.remaining);
            }
        }
        QueueAction::Remove { id } => {
            if ctx.store.remove_pending_write(id) {
                println!("removed {id}");
            } else {
                anyhow::bail!("no queued write with id {id}");
            }
        }
        QueueAction::Clear => {
            let dropped = ctx.store.pending_writes();
            ctx.store.clear_pending_writes();
            println!("discarded {dropped} queued write(s)");
        }
    }

    ctx.finish().await
}
