use clap::Args;
use secrecy::SecretString;

use procure_app::AppStore;
use procure_core::config::AppConfig;

use super::Context;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(help = "Backend username, e.g. ayse.demir")]
    pub username: String,
    #[arg(long, env = "PROCURE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(config: AppConfig, args: LoginArgs) -> anyhow::Result<()> {
    let mut ctx = Context::init(config).await?;

    let tokens = ctx
        .client
        .login(&args.username, &args.password)
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message()))?;
    ctx.client.set_access_token(SecretString::from(tokens.access.clone()));

    let user = ctx.client.me().await.map_err(|error| anyhow::anyhow!(error.user_message()))?;
    let full_name = user.full_name();

    ctx.store.begin_session(
        SecretString::from(tokens.access),
        SecretString::from(tokens.refresh),
        user,
    );
    ctx.store.persist_session(&ctx.storage).await?;

    if let Some(role) = ctx.store.role() {
        println!("signed in as {} ({})", full_name, role.role().as_str());
    }
    ctx.finish().await
}

pub async fn logout(config: AppConfig) -> anyhow::Result<()> {
    let ctx = Context::init(config).await?;
    let mut store = AppStore::new();
    store.end_session();
    store.persist_session(&ctx.storage).await?;
    println!("signed out");
    Ok(())
}
