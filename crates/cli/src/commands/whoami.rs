use procure_core::config::AppConfig;
use procure_core::navigation::{dashboard_variant, visible_entries};

use super::Context;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;
    ctx.ensure_session().await?;

    let (user, role) = match (ctx.store.user(), ctx.store.role()) {
        (Some(user), Some(role)) => (user.clone(), role),
        _ => anyhow::bail!("not signed in (run `procure login <username>` first)"),
    };

    println!("{} (@{})", user.full_name(), user.username);
    println!("role: {}", role.role().as_str());
    if role.has_subordinates {
        println!("direct reports: {}", role.subordinate_count);
    }
    println!("dashboard: {:?}", dashboard_variant(&role));

    println!("tabs:");
    for entry in visible_entries(&role) {
        println!("  {}", entry.label);
    }

    if ctx.store.has_pending_writes() {
        println!("pending offline writes: {}", ctx.store.pending_writes());
    }
    ctx.finish().await
}
