//! Booking service HTTP client.
//!
//! [`BookingBackend`] is the seam the rest of the client talks to;
//! [`HttpBackend`] implements it over reqwest with a cookie store, which is
//! how the service recognizes the signed-in session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, StatusCode};
use seat_wire::{
    decode_seat_records, ActionAck, BookingRequest, ErrorBody, Identity, SeatId, SeatRecord,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid booking service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: StatusCode,
        /// `detail` from the error body, when the service sent one
        detail: Option<String>,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The service rejected the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED
        )
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Operations the desk client needs from the booking service.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// `GET /seats`
    async fn fetch_seats(&self) -> Result<Vec<SeatRecord>, ApiError>;

    /// `GET /me`
    async fn fetch_identity(&self) -> Result<Identity, ApiError>;

    /// `POST /book`
    async fn book(&self, request: &BookingRequest) -> Result<ActionAck, ApiError>;

    /// `POST /release/{seat_id}`
    async fn release(&self, seat_id: &SeatId) -> Result<ActionAck, ApiError>;

    /// Browser sign-in entry point. Never requested by the client itself.
    fn login_url(&self) -> String;

    /// Install a session cookie obtained out of band.
    fn set_session_cookie(&self, _value: &str) {}
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
    cookie_name: String,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        cookie_name: impl Into<String>,
    ) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless it ends with '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url,
            cookies,
            cookie_name: cookie_name.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let backend = Self::new(
            &config.base_url,
            config.request_timeout(),
            config.session_cookie_name.clone(),
        )?;
        if let Some(cookie) = config.session_cookie.as_deref() {
            backend.set_session_cookie(cookie);
        }
        Ok(backend)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send<T: DeserializeOwned + Default>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ApiError> {
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        debug!(url = %url, %status, bytes = body.len(), "booking service response");

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_text());
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
                detail,
            });
        }

        // Actions may answer with an empty body
        if body.is_empty() {
            return Ok(T::default());
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn fetch_seats(&self) -> Result<Vec<SeatRecord>, ApiError> {
        let url = self.endpoint("seats")?;
        let raw: Vec<serde_json::Value> = self.send(self.client.get(url.clone()), &url).await?;
        let (records, rejected) = decode_seat_records(raw);
        for (index, e) in &rejected {
            warn!(index, "Ignoring malformed seat record: {}", e);
        }
        Ok(records)
    }

    async fn fetch_identity(&self) -> Result<Identity, ApiError> {
        let url = self.endpoint("me")?;
        // An empty body comes back as null and fails to decode below
        let raw: serde_json::Value = self.send(self.client.get(url.clone()), &url).await?;
        serde_json::from_value(raw).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn book(&self, request: &BookingRequest) -> Result<ActionAck, ApiError> {
        let url = self.endpoint("book")?;
        debug!(seat_id = %request.seat_id, date = %request.date, slot = %request.time_slot, "booking seat");
        self.send(self.client.post(url.clone()).json(request), &url).await
    }

    async fn release(&self, seat_id: &SeatId) -> Result<ActionAck, ApiError> {
        let path = format!("release/{}", urlencoding::encode(&seat_id.to_string()));
        let url = self.endpoint(&path)?;
        debug!(%seat_id, "releasing seat");
        self.send(self.client.post(url.clone()), &url).await
    }

    fn login_url(&self) -> String {
        self.base_url
            .join("auth/login")
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}auth/login", self.base_url))
    }

    fn set_session_cookie(&self, value: &str) {
        let cookie = format!("{}={}; Path=/", self.cookie_name, value.trim());
        self.cookies.add_cookie_str(&cookie, &self.base_url);
        debug!(cookie_name = %self.cookie_name, "session cookie installed");
    }
}
