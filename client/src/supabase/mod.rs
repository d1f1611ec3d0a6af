//! Thin HTTP client for the hosted Supabase project
//!
//! Covers the three surfaces the app uses: PostgREST RPC, object storage
//! downloads and GoTrue auth (see [`auth`]).
//!
//! # Design Principles
//!
//! 1. **Cheap cloning**: HTTP pool and session are shared behind `Arc`
//! 2. **No retries**: failures are surfaced to the caller as-is
//! 3. **Secrets stay secret**: tokens are never logged

pub mod auth;

use crate::config::SupabaseConfig;
use crate::error::{ClientError, ClientResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub use auth::{AuthUser, Session, SignUpOutcome};

/// Shared Supabase client
///
/// All fields are designed for cheap cloning across async tasks.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
    session: Arc<RwLock<Option<Session>>>,
}

impl SupabaseClient {
    /// Create a client for the configured project
    pub fn new(config: &SupabaseConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.url.trim_end_matches('/')),
            anon_key: Arc::from(config.anon_key.as_str()),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Project base URL
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the project key and the best available bearer token
    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.bearer(),
            None => self.anon_key.to_string(),
        };
        builder
            .header("apikey", &*self.anon_key)
            .bearer_auth(bearer)
    }

    /// Call a Postgres function and return the raw response body
    pub async fn rpc_raw<P>(&self, function: &str, params: &P) -> ClientResult<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(&format!("rest/v1/rpc/{}", function));
        debug!(function, "Calling RPC");

        let request = self.authorize(self.http.post(&url).json(params)).await;
        let response = ensure_success(request.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Call a Postgres function and decode its JSON result
    pub async fn rpc<P, T>(&self, function: &str, params: &P) -> ClientResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.rpc_raw(function, params).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Download an object from a storage bucket
    pub async fn download(&self, bucket: &str, path: &str) -> ClientResult<Vec<u8>> {
        let url = self.endpoint(&format!(
            "storage/v1/object/{}/{}",
            bucket,
            path.trim_start_matches('/')
        ));
        debug!(bucket, path, "Downloading object");

        let request = self.authorize(self.http.get(&url)).await;
        let response = ensure_success(request.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Turn a non-2xx response into [`ClientError::Api`], keeping the body
pub(crate) async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    warn!(status = %status, body = %body, "Request failed");
    Err(ClientError::Api { status, body })
}

/// Decode an RPC result that should hold at most one row.
///
/// PostgREST returns a bare object or a one-element array depending on the
/// function signature; an empty body, `null` or `[]` mean no row.
pub fn decode_single<T: DeserializeOwned>(body: &[u8]) -> ClientResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<serde_json::Value>(body)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Array(rows) => match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        },
        row => Ok(Some(serde_json::from_value(row)?)),
    }
}
