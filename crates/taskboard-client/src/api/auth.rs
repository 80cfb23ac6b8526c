//! Auth Endpoints
//!
//! Login, registration, logout and silent renewal. All cookie based; the
//! only thing the client ever keeps is the email it logged in with.

use std::rc::Rc;

use crate::error::ApiResult;
use crate::http::{ApiRequest, HttpClient, Transport, LOGIN_PATH, REFRESH_PATH};
use crate::models::{LoginRequest, MessageResponse, RegisterRequest};

const LOGOUT_PATH: &str = "/auth/logout";
const REGISTER_PATH: &str = "/users/register";

pub struct AuthApi<T> {
    http: Rc<HttpClient<T>>,
}

impl<T> Clone for AuthApi<T> {
    fn clone(&self) -> Self {
        Self { http: self.http.clone() }
    }
}

impl<T: Transport> AuthApi<T> {
    pub fn new(http: Rc<HttpClient<T>>) -> Self {
        Self { http }
    }

    /// The session cookie is the only useful output; the body is ignored.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<()> {
        self.http.send(ApiRequest::post(LOGIN_PATH).json(credentials)?).await
    }

    pub async fn register(&self, details: &RegisterRequest) -> ApiResult<MessageResponse> {
        self.http.fetch(ApiRequest::post(REGISTER_PATH).json(details)?).await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.http.send(ApiRequest::post(LOGOUT_PATH)).await
    }

    pub async fn refresh(&self) -> ApiResult<()> {
        self.http.send(ApiRequest::post(REFRESH_PATH)).await
    }
}
