use clap::Subcommand;
use serde_json::json;

use procure_app::KeyValueStorage;
use procure_core::config::{AppConfig, DEFAULT_BASE_URL};

use super::{Context, BASE_URL_OVERRIDE_KEY};

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    #[command(about = "Print the effective configuration")]
    Show,
    #[command(about = "Point the client at a different backend (persists)")]
    SetUrl { url: String },
    #[command(about = "Drop the persisted backend override")]
    ResetUrl,
}

pub async fn run(config: AppConfig, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let ctx = Context::init(config).await?;
            let overridden = ctx.storage.get(BASE_URL_OVERRIDE_KEY).await?.is_some();
            println!(
                "base url: {}{}",
                ctx.config.api.base_url,
                if overridden { " (persisted override)" } else { "" }
            );
            println!("timeout: {}s", ctx.config.api.timeout_secs);
            println!("page size: {}", ctx.config.api.page_size);
            println!("state file: {}", ctx.config.storage.state_path.display());
            println!("log level: {}", ctx.config.logging.level);
            Ok(())
        }
        ConfigAction::SetUrl { url } => {
            // Validate before persisting so a typo never wedges the client.
            let mut ctx = Context::init(config).await?;
            ctx.config.set_base_url(&url)?;
            ctx.storage.put(BASE_URL_OVERRIDE_KEY, json!(ctx.config.api.base_url)).await?;
            println!("base url set to {}", ctx.config.api.base_url);
            Ok(())
        }
        ConfigAction::ResetUrl => {
            let ctx = Context::init(config).await?;
            ctx.storage.remove(BASE_URL_OVERRIDE_KEY).await?;
            println!("base url reset to {DEFAULT_BASE_URL}");
            Ok(())
        }
    }
}
