//! Task Endpoints
//!
//! Tasks always live under a project, so every call takes the project id.

use std::rc::Rc;

use super::DEFAULT_SORT;
use crate::collection::{Page, PageQuery};
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, HttpClient, Transport};
use crate::models::{Task, TaskFilters, TaskRequest};

pub struct TaskApi<T> {
    http: Rc<HttpClient<T>>,
}

impl<T> Clone for TaskApi<T> {
    fn clone(&self) -> Self {
        Self { http: self.http.clone() }
    }
}

impl<T: Transport> TaskApi<T> {
    pub fn new(http: Rc<HttpClient<T>>) -> Self {
        Self { http }
    }

    pub async fn list(&self, project_id: i64, query: &PageQuery<TaskFilters>) -> ApiResult<Page<Task>> {
        let mut request = ApiRequest::get(format!("/projects/{project_id}/tasks"))
            .query("page", query.page)
            .query("size", query.size)
            .query("sort", DEFAULT_SORT);
        for (key, value) in query.filters.query_pairs() {
            request = request.query(key, value);
        }
        self.http.fetch(request).await
    }

    pub async fn get(&self, project_id: i64, task_id: i64) -> ApiResult<Task> {
        self.http
            .fetch(ApiRequest::get(format!("/projects/{project_id}/tasks/{task_id}")))
            .await
    }

    pub async fn create(&self, project_id: i64, body: &TaskRequest) -> ApiResult<Task> {
        self.http
            .fetch(ApiRequest::post(format!("/projects/{project_id}/tasks")).json(body)?)
            .await
    }

    pub async fn update(&self, project_id: i64, task_id: i64, body: &TaskRequest) -> ApiResult<Task> {
        self.http
            .fetch(ApiRequest::put(format!("/projects/{project_id}/tasks/{task_id}")).json(body)?)
            .await
    }

    pub async fn delete(&self, project_id: i64, task_id: i64) -> ApiResult<()> {
        self.http
            .send(ApiRequest::delete(format!("/projects/{project_id}/tasks/{task_id}")))
            .await
    }

    pub async fn toggle_completion(&self, project_id: i64, task_id: i64, completed: bool) -> ApiResult<Task> {
        let request = ApiRequest::patch(format!("/projects/{project_id}/tasks/{task_id}/completion"))
            .query("completed", completed);
        self.http.fetch(request).await
    }
}

/// The tasks of one project, as a collection source.
///
/// The project id is optional because views may mount before it is known;
/// any operation needing it fails with [`ApiError::MissingIdentifier`].
pub struct ProjectTasks<T> {
    api: TaskApi<T>,
    project_id: Option<i64>,
}

impl<T> Clone for ProjectTasks<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            project_id: self.project_id,
        }
    }
}

impl<T: Transport> ProjectTasks<T> {
    pub fn new(api: TaskApi<T>, project_id: Option<i64>) -> Self {
        Self { api, project_id }
    }

    pub fn api(&self) -> &TaskApi<T> {
        &self.api
    }

    pub fn project_id(&self) -> ApiResult<i64> {
        self.project_id.ok_or(ApiError::MissingIdentifier("project id"))
    }
}
