use std::sync::RwLock;
use std::time::Duration;

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use procure_core::config::ApiConfig;
use procure_core::domain::history::ApprovalHistoryEntry;
use procure_core::domain::request::{Request, RequestId, RequestStatus};
use procure_core::domain::user::{PasswordResetRequest, User};

use crate::error::ApiError;
use crate::types::{
    AdminStats, ListQuery, ListScope, NewRequest, Page, RequestDirectory, RequestUpdate,
    TokenPair, WriteMethod, WriteTransport,
};

/// Access token refresh response; the refresh token itself stays valid.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct RefreshedToken {
    pub access: String,
}

/// Thin REST client over the PMS backend. All list endpoints speak
/// `{results, next}` pages; all failures map into [`ApiError`].
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    access_token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        // A trailing slash keeps Url::join appending instead of replacing
        // the last path segment.
        let normalized = format!("{}/", config.base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized).map_err(|error| ApiError::Url(error.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ApiError::Connectivity(error.to_string()))?;

        Ok(Self { http, base, access_token: RwLock::new(None) })
    }

    pub fn set_access_token(&self, token: SecretString) {
        *self.access_token.write().expect("token lock poisoned") = Some(token);
    }

    pub fn clear_access_token(&self) {
        *self.access_token.write().expect("token lock poisoned") = None;
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|error| ApiError::Url(error.to_string()))
    }

    /// Resolve a stored write target: absolute URLs (from `next` links or a
    /// queued item) pass through, relative paths join the base.
    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path).map_err(|error| ApiError::Url(error.to_string()))
        } else {
            self.endpoint(path)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let guard = self.access_token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => {
                builder.header("Authorization", format!("Bearer {}", token.expose_secret()))
            }
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response =
            self.authorize(builder).send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|error| ApiError::Decode(error.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "backend rejected request");
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    async fn send_unit(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response =
            self.authorize(builder).send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    /// Reachability probe for diagnostics. Any HTTP answer counts as
    /// reachable; only transport failures are errors.
    pub async fn ping(&self) -> Result<u16, ApiError> {
        let response =
            self.http.get(self.base.clone()).send().await.map_err(ApiError::from_transport)?;
        Ok(response.status().as_u16())
    }

    // --- auth ---

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let url = self.endpoint("auth/login/")?;
        let body = json!({ "username": username, "password": password });
        self.send_json(self.http.post(url).json(&body)).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ApiError> {
        let url = self.endpoint("auth/token/refresh/")?;
        let body = json!({ "refresh": refresh_token });
        self.send_json(self.http.post(url).json(&body)).await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let url = self.endpoint("auth/me/")?;
        self.send_json(self.http.get(url)).await
    }

    // --- request lifecycle ---

    pub async fn get_request(&self, id: RequestId) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/"))?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn create_request(&self, new: &NewRequest) -> Result<Request, ApiError> {
        let url = self.endpoint("requests/")?;
        self.send_json(self.http.post(url).json(new)).await
    }

    pub async fn update_request(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/"))?;
        self.send_json(self.http.patch(url).json(update)).await
    }

    pub async fn delete_request(&self, id: RequestId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("requests/{id}/"))?;
        self.send_unit(self.http.delete(url)).await
    }

    pub async fn submit(&self, id: RequestId) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/submit/"))?;
        self.send_json(self.http.post(url).json(&json!({}))).await
    }

    pub async fn approve(&self, id: RequestId, notes: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/approve/"))?;
        self.send_json(self.http.post(url).json(&json!({ "notes": notes }))).await
    }

    /// The backend requires a reason and answers 400 without one; that
    /// message is surfaced as-is.
    pub async fn reject(&self, id: RequestId, reason: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/reject/"))?;
        self.send_json(self.http.post(url).json(&json!({ "reason": reason }))).await
    }

    pub async fn revise(&self, id: RequestId, notes: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/revise/"))?;
        self.send_json(self.http.post(url).json(&json!({ "notes": notes }))).await
    }

    pub async fn set_purchasing_status(
        &self,
        id: RequestId,
        status: RequestStatus,
        notes: &str,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/purchasing-status/"))?;
        let body = json!({ "status": status, "notes": notes });
        self.send_json(self.http.post(url).json(&body)).await
    }

    pub async fn complete(&self, id: RequestId) -> Result<Request, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/complete/"))?;
        self.send_json(self.http.post(url).json(&json!({}))).await
    }

    pub async fn history(&self, id: RequestId) -> Result<Vec<ApprovalHistoryEntry>, ApiError> {
        let url = self.endpoint(&format!("requests/{id}/history/"))?;
        self.send_json(self.http.get(url)).await
    }

    // --- admin ---

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let url = self.endpoint("requests/admin/stats/")?;
        self.send_json(self.http.get(url)).await
    }

    pub async fn admin_users(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        let url = self.endpoint("auth/admin/users/")?;
        self.send_json(self.http.get(url).query(&query.query_pairs())).await
    }

    // --- password reset workflow (backend-owned lifecycle) ---

    pub async fn request_password_reset(
        &self,
        username: &str,
        reason: &str,
    ) -> Result<PasswordResetRequest, ApiError> {
        let url = self.endpoint("auth/password-reset/")?;
        let body = json!({ "username": username, "reason": reason });
        self.send_json(self.http.post(url).json(&body)).await
    }

    pub async fn approve_password_reset(
        &self,
        reset_id: i64,
    ) -> Result<PasswordResetRequest, ApiError> {
        let url = self.endpoint(&format!("auth/password-reset/{reset_id}/approve/"))?;
        self.send_json(self.http.post(url).json(&json!({}))).await
    }

    pub async fn reject_password_reset(
        &self,
        reset_id: i64,
    ) -> Result<PasswordResetRequest, ApiError> {
        let url = self.endpoint(&format!("auth/password-reset/{reset_id}/reject/"))?;
        self.send_json(self.http.post(url).json(&json!({}))).await
    }
}

#[async_trait::async_trait]
impl RequestDirectory for ApiClient {
    async fn list_requests(
        &self,
        scope: ListScope,
        query: &ListQuery,
    ) -> Result<Page<Request>, ApiError> {
        let url = self.endpoint(scope.path())?;
        self.send_json(self.http.get(url).query(&query.query_pairs())).await
    }

    async fn follow_next(&self, next_url: &str) -> Result<Page<Request>, ApiError> {
        let url = self.resolve(next_url)?;
        self.send_json(self.http.get(url)).await
    }
}

#[async_trait::async_trait]
impl WriteTransport for ApiClient {
    async fn replay(
        &self,
        method: WriteMethod,
        path: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), ApiError> {
        let url = self.resolve(path)?;
        let builder = match method {
            WriteMethod::Post => self.http.post(url),
            WriteMethod::Put => self.http.put(url),
            WriteMethod::Patch => self.http.patch(url),
            WriteMethod::Delete => self.http.delete(url),
        };
        let builder = match payload {
            Some(payload) => builder.json(payload),
            None => builder,
        };
        self.send_unit(builder).await
    }
}
