pub mod config;
pub mod create;
pub mod doctor;
pub mod list;
pub mod login;
pub mod notify;
pub mod queue;
pub mod show;
pub mod transition;
pub mod whoami;

use std::sync::Arc;

use anyhow::{bail, Context as _};

use procure_api::ApiClient;
use procure_app::{AppStore, Banner, BannerKind, FileStorage, KeyValueStorage};
use procure_core::config::AppConfig;

pub(crate) const BASE_URL_OVERRIDE_KEY: &str = "api_base_url";

/// Shared command context: effective config (including any persisted base-URL
/// override), the state file, the API client, and the store with the offline
/// queue restored.
pub(crate) struct Context {
    pub config: AppConfig,
    pub storage: FileStorage,
    pub client: Arc<ApiClient>,
    pub store: AppStore,
}

impl Context {
    pub async fn init(mut config: AppConfig) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.storage.state_path)
            .await
            .context("opening local state file")?;

        // A base URL set through `procure config set-url` outlives the
        // process; it wins over file and environment.
        if let Some(value) = storage.get(BASE_URL_OVERRIDE_KEY).await? {
            if let Some(url) = value.as_str() {
                config.set_base_url(url).context("persisted base url override")?;
            }
        }

        let client = Arc::new(ApiClient::new(&config.api)?);
        let mut store = AppStore::new();
        store.restore_queue(&storage).await.context("restoring offline queue")?;

        Ok(Self { config, storage, client, store })
    }

    /// Load the persisted tokens and refetch the user record; role flags are
    /// derived once here, not per screen.
    pub async fn ensure_session(&mut self) -> anyhow::Result<()> {
        let Some((access, refresh)) = AppStore::stored_tokens(&self.storage).await? else {
            bail!("not signed in (run `procure login <username>` first)");
        };
        self.client.set_access_token(access.clone());
        let user = self.client.me().await.map_err(|error| anyhow::anyhow!(error.user_message()))?;
        self.store.begin_session(access, refresh, user);
        Ok(())
    }

    /// Persist queue state and print any accumulated banners.
    pub async fn finish(mut self) -> anyhow::Result<()> {
        self.store.persist_queue(&self.storage).await?;
        print_banners(self.store.take_banners());
        Ok(())
    }
}

pub(crate) fn print_banners(banners: Vec<Banner>) {
    for banner in banners {
        match banner.kind {
            BannerKind::Error => eprintln!("! {}", banner.message),
            BannerKind::Success => println!("+ {}", banner.message),
            BannerKind::Info => println!("- {}", banner.message),
        }
    }
}
