//! Project Endpoints

use std::rc::Rc;

use super::DEFAULT_SORT;
use crate::collection::Page;
use crate::error::ApiResult;
use crate::http::{ApiRequest, HttpClient, Transport};
use crate::models::{Project, ProjectProgress, ProjectRequest};

pub struct ProjectApi<T> {
    http: Rc<HttpClient<T>>,
}

impl<T> Clone for ProjectApi<T> {
    fn clone(&self) -> Self {
        Self { http: self.http.clone() }
    }
}

impl<T: Transport> ProjectApi<T> {
    pub fn new(http: Rc<HttpClient<T>>) -> Self {
        Self { http }
    }

    pub async fn list(&self, page: u32, size: u32) -> ApiResult<Page<Project>> {
        let request = ApiRequest::get("/projects")
            .query("page", page)
            .query("size", size)
            .query("sort", DEFAULT_SORT);
        self.http.fetch(request).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Project> {
        self.http.fetch(ApiRequest::get(format!("/projects/{id}"))).await
    }

    pub async fn create(&self, body: &ProjectRequest) -> ApiResult<Project> {
        self.http.fetch(ApiRequest::post("/projects").json(body)?).await
    }

    pub async fn update(&self, id: i64, body: &ProjectRequest) -> ApiResult<Project> {
        self.http
            .fetch(ApiRequest::put(format!("/projects/{id}")).json(body)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.http.send(ApiRequest::delete(format!("/projects/{id}"))).await
    }

    pub async fn progress(&self, id: i64) -> ApiResult<ProjectProgress> {
        self.http
            .fetch(ApiRequest::get(format!("/projects/{id}/progress")))
            .await
    }
}
