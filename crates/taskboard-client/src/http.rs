//! HTTP Client Wrapper
//!
//! Every backend call goes through [`HttpClient::dispatch`]. A 401 on a
//! first attempt triggers one silent `POST /auth/refresh` and, if that
//! succeeds, exactly one resubmission. The attempt count travels in the
//! returned [`Dispatched`] value; the request itself is never mutated.
//!
//! `/auth/refresh` and `/auth/login` are exempt: a 401 from either comes
//! back as a plain error. A wrong password must not trigger a renewal
//! and a forced trip to the login screen.

use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGIN_PATH: &str = "/auth/login";

/// A 401 from these means "no session" rather than "session expired".
const RENEWAL_EXEMPT: &[&str] = &[REFRESH_PATH, LOGIN_PATH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A request relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn renewable(&self) -> bool {
        !RENEWAL_EXEMPT.contains(&self.path.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Shape of the backend's error payload; only `message` matters here.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn decode<R: DeserializeOwned>(&self) -> ApiResult<R> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Turn a non-2xx response into an error, keeping the server message.
    pub fn into_error(self) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.message);
        ApiError::Status {
            status: self.status,
            message,
        }
    }
}

/// Whether a response came from the first submission or the one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retried,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub response: ApiResponse,
    pub attempt: Attempt,
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations must not interpret status codes; that is the
/// wrapper's job.
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

/// Called once when renewal fails; expected to drop the local session
/// and send the user to the login screen.
pub type ExpiryHandler = Rc<dyn Fn()>;

pub struct HttpClient<T> {
    transport: T,
    on_session_expired: Option<ExpiryHandler>,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            on_session_expired: None,
        }
    }

    pub fn with_expiry_handler(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_session_expired = Some(Rc::new(handler));
        self
    }

    /// Send `request`, renewing the session and retrying once on 401.
    pub async fn dispatch(&self, request: &ApiRequest) -> ApiResult<Dispatched> {
        let response = self.transport.execute(request).await?;
        if !response.is_unauthorized() || !request.renewable() {
            return settle(response, Attempt::Initial);
        }

        tracing::debug!(method = request.method.as_str(), path = %request.path, "unauthorized, renewing session");
        if let Err(err) = self.renew().await {
            tracing::warn!(error = %err, path = %request.path, "session renewal failed");
            if let Some(handler) = &self.on_session_expired {
                handler();
            }
            return Err(ApiError::RenewalFailed(Box::new(err)));
        }

        let retried = self.transport.execute(request).await?;
        settle(retried, Attempt::Retried)
    }

    /// Dispatch and decode a JSON body.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        self.dispatch(&request).await?.response.decode()
    }

    /// Dispatch and ignore the body.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<()> {
        self.dispatch(&request).await.map(|_| ())
    }

    // Goes straight to the transport: renewal must never renew itself.
    async fn renew(&self) -> ApiResult<()> {
        let response = self.transport.execute(&ApiRequest::post(REFRESH_PATH)).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(response.into_error())
        }
    }
}

fn settle(response: ApiResponse, attempt: Attempt) -> ApiResult<Dispatched> {
    if response.is_success() {
        Ok(Dispatched { response, attempt })
    } else {
        Err(response.into_error())
    }
}
