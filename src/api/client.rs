use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::models::{Booking, BookingDraft, Credentials, ErrorBody, LoginResponse};
use crate::api::ApiError;

/// Everything the admin workflows need from the bookings backend.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;
    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError>;
    async fn public_bookings(&self) -> Result<Vec<Booking>, ApiError>;
    async fn booking(&self, token: &str, id: &str) -> Result<Booking, ApiError>;
    async fn create_booking(&self, token: &str, draft: &BookingDraft) -> Result<(), ApiError>;
    /// Unauthenticated create, as used by the public booking page.
    async fn request_booking(&self, draft: &BookingDraft) -> Result<(), ApiError>;
    async fn update_booking(&self, token: &str, id: &str, draft: &BookingDraft) -> Result<(), ApiError>;
    async fn delete_booking(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    pub http: HttpClient,
    base: Url,
    login: Url,
}

impl ApiClient {
    /// `base_url` is the booking collection resource, e.g.
    /// `https://host/api/bookings`. The login endpoint defaults to
    /// `{base_url}/login`.
    pub fn new(base_url: &str, login_url: Option<&str>) -> Result<Self, ApiError> {
        let base = Self::parse_base(base_url)?;
        let login = match login_url {
            Some(url) => Self::parse_base(url)?,
            None => Self::join(&base, &["login"]),
        };
        Ok(Self {
            http: HttpClient::new(),
            base,
            login,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn login_url(&self) -> &Url {
        &self.login
    }

    fn parse_base(raw: &str) -> Result<Url, ApiError> {
        let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(raw.to_string()));
        }
        Ok(url)
    }

    fn join(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        Self::join(&self.base, segments)
    }

    fn with_auth(req: RequestBuilder, token: &str) -> RequestBuilder {
        req.header("Authorization", format!("Bearer {}", token))
    }

    /// Performs a single attempt and returns the parsed JSON body. Any status
    /// outside 2xx becomes `RequestFailed`, carrying the server's `message`
    /// when the error body has one. An empty success body parses as `null`.
    pub async fn send(&self, req: RequestBuilder) -> Result<Value, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            log::debug!("request failed: HTTP {} ({:?})", status, message);
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_as<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let json = self.send(req).await?;
        Ok(serde_json::from_value(json)?)
    }
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let req = self.http.post(self.login.clone()).json(credentials);
        let body: LoginResponse = self
            .send_as(req)
            .await
            .map_err(|e| match e {
                ApiError::Decode(err) => ApiError::MalformedResponse(err.to_string()),
                other => other,
            })?;
        body.token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("token not found in response".into()))
    }

    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        let req = Self::with_auth(self.http.get(self.endpoint(&["admin"])), token);
        let rows: Option<Vec<Value>> = self.send_as(req).await?;
        Ok(Booking::from_rows(rows.unwrap_or_default()))
    }

    async fn public_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let req = self.http.get(self.base.clone());
        let rows: Option<Vec<Value>> = self.send_as(req).await?;
        Ok(Booking::from_rows(rows.unwrap_or_default()))
    }

    async fn booking(&self, token: &str, id: &str) -> Result<Booking, ApiError> {
        let req = Self::with_auth(self.http.get(self.endpoint(&[id])), token);
        self.send_as(req).await.map_err(|e| match e {
            ApiError::RequestFailed { status, message } if status == StatusCode::NOT_FOUND.as_u16() => {
                ApiError::NotFound {
                    id: id.to_string(),
                    message,
                }
            }
            other => other,
        })
    }

    async fn create_booking(&self, token: &str, draft: &BookingDraft) -> Result<(), ApiError> {
        let req = Self::with_auth(self.http.post(self.endpoint(&["manual"])), token).json(draft);
        self.send(req).await.map(|_| ())
    }

    async fn request_booking(&self, draft: &BookingDraft) -> Result<(), ApiError> {
        let req = self.http.post(self.base.clone()).json(draft);
        self.send(req).await.map(|_| ())
    }

    async fn update_booking(&self, token: &str, id: &str, draft: &BookingDraft) -> Result<(), ApiError> {
        let req = Self::with_auth(self.http.put(self.endpoint(&[id])), token).json(draft);
        self.send(req).await.map(|_| ())
    }

    async fn delete_booking(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let req = Self::with_auth(self.http.delete(self.endpoint(&[id])), token);
        self.send(req).await.map(|_| ())
    }
}
