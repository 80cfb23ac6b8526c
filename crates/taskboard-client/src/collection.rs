//! Collection Hooks
//!
//! A [`CollectionHook`] owns one paginated, filterable view of a resource.
//! It is generic over where the items come from ([`CollectionSource`]) and
//! where its state lives ([`StateCell`]), so the same logic drives the
//! project list and the task list.
//!
//! Reconciliation after a mutation is local (prepend, replace, remove)
//! except where the source asks for a refetch. Totals are not adjusted
//! locally after a delete; they stay stale until the next fetch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{ProjectApi, ProjectTasks};
use crate::error::{ApiError, ApiResult};
use crate::http::Transport;
use crate::models::{Identified, Project, ProjectRequest, Task, TaskFilters, TaskRequest};
use crate::state::StateCell;

/// Standard page envelope returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery<F> {
    pub page: u32,
    pub size: u32,
    pub filters: F,
}

/// How a collection absorbs an item it just created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Put the new item at the front of the current page.
    Prepend,
    /// Reload the current page from the server.
    Refetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    ToggleCompletion,
}

impl Operation {
    /// Generic message used when the server gives none.
    pub fn fallback(self, noun: &str) -> String {
        match self {
            Operation::Fetch => format!("Failed to fetch {noun}s"),
            Operation::Create => format!("Failed to create {noun}"),
            Operation::Update => format!("Failed to update {noun}"),
            Operation::Delete => format!("Failed to delete {noun}"),
            Operation::ToggleCompletion => format!("Failed to toggle {noun} completion"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T, F> {
    pub items: Vec<T>,
    pub query: PageQuery<F>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub loading: bool,
    pub error: Option<String>,
    /// Set once any fetch has succeeded; views use it to tell a failed
    /// first load (full-page retry) from a failed refresh.
    pub loaded: bool,
    generation: u64,
}

impl<T: Identified, F> CollectionState<T, F> {
    pub fn new(page: u32, size: u32, filters: F) -> Self {
        Self {
            items: Vec::new(),
            query: PageQuery { page, size, filters },
            total_pages: 0,
            total_elements: 0,
            loading: true,
            error: None,
            loaded: false,
            generation: 0,
        }
    }

    /// Start a fetch and return its token. Only the latest token's
    /// response will be applied.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.generation
    }

    /// Replace the items with a fetched page. Returns `false` (and changes
    /// nothing) if a newer fetch has been issued since `token`.
    pub fn apply_page(&mut self, token: u64, page: Page<T>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.items = page.content;
        self.total_pages = page.total_pages;
        self.total_elements = page.total_elements;
        self.loading = false;
        self.loaded = true;
        true
    }

    pub fn fail_fetch(&mut self, token: u64, message: String) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    /// Returns whether the page actually changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let changed = self.query.page != page;
        self.query.page = page;
        changed
    }

    pub fn set_size(&mut self, size: u32) -> bool {
        let changed = self.query.size != size;
        self.query.size = size;
        changed
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Swap in `item` for the entry whose id is `id`, keeping its position.
    pub fn replace(&mut self, id: i64, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub fn has_previous(&self) -> bool {
        self.query.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.query.page + 1 < self.total_pages
    }
}

impl<T: Identified, F: PartialEq> CollectionState<T, F> {
    /// New filters always send the view back to the first page.
    pub fn set_filters(&mut self, filters: F) -> bool {
        let changed = self.query.filters != filters || self.query.page != 0;
        self.query.filters = filters;
        self.query.page = 0;
        changed
    }
}

/// Where a collection's items come from.
#[async_trait(?Send)]
pub trait CollectionSource {
    type Item: Identified + Clone;
    type Filters: Clone + PartialEq;
    type Draft;

    const RECONCILE: Reconcile;
    /// Singular noun used in fallback error messages.
    const NOUN: &'static str;

    /// Fails when an identifier the source needs is missing.
    fn ready(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn list(&self, query: &PageQuery<Self::Filters>) -> ApiResult<Page<Self::Item>>;
    async fn create(&self, draft: &Self::Draft) -> ApiResult<Self::Item>;
    async fn update(&self, id: i64, draft: &Self::Draft) -> ApiResult<Self::Item>;
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

#[async_trait(?Send)]
impl<T: Transport> CollectionSource for ProjectApi<T> {
    type Item = Project;
    type Filters = ();
    type Draft = ProjectRequest;

    const RECONCILE: Reconcile = Reconcile::Prepend;
    const NOUN: &'static str = "project";

    async fn list(&self, query: &PageQuery<()>) -> ApiResult<Page<Project>> {
        ProjectApi::list(self, query.page, query.size).await
    }

    async fn create(&self, draft: &ProjectRequest) -> ApiResult<Project> {
        ProjectApi::create(self, draft).await
    }

    async fn update(&self, id: i64, draft: &ProjectRequest) -> ApiResult<Project> {
        ProjectApi::update(self, id, draft).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        ProjectApi::delete(self, id).await
    }
}

#[async_trait(?Send)]
impl<T: Transport> CollectionSource for ProjectTasks<T> {
    type Item = Task;
    type Filters = TaskFilters;
    type Draft = TaskRequest;

    const RECONCILE: Reconcile = Reconcile::Refetch;
    const NOUN: &'static str = "task";

    fn ready(&self) -> ApiResult<()> {
        self.project_id().map(|_| ())
    }

    async fn list(&self, query: &PageQuery<TaskFilters>) -> ApiResult<Page<Task>> {
        self.api().list(self.project_id()?, query).await
    }

    async fn create(&self, draft: &TaskRequest) -> ApiResult<Task> {
        self.api().create(self.project_id()?, draft).await
    }

    async fn update(&self, id: i64, draft: &TaskRequest) -> ApiResult<Task> {
        self.api().update(self.project_id()?, id, draft).await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.api().delete(self.project_id()?, id).await
    }
}

pub type ProjectsState = CollectionState<Project, ()>;
pub type TasksState = CollectionState<Task, TaskFilters>;

pub struct CollectionHook<S, C> {
    source: S,
    state: C,
}

pub type ProjectsHook<T, C> = CollectionHook<ProjectApi<T>, C>;
pub type TasksHook<T, C> = CollectionHook<ProjectTasks<T>, C>;

impl<S: Clone, C: Clone> Clone for CollectionHook<S, C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S, C> CollectionHook<S, C>
where
    S: CollectionSource,
    C: StateCell<CollectionState<S::Item, S::Filters>>,
{
    pub fn new(source: S, state: C) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the page described by the current query.
    ///
    /// Failures land in the state's `error`; a response that arrives after
    /// a newer fetch was started is dropped.
    pub async fn fetch(&self) {
        if self.source.ready().is_err() {
            self.state.update(|s| s.loading = false);
            return;
        }

        let mut token = 0;
        self.state.update(|s| token = s.begin_fetch());
        let query = self.state.read(|s| s.query.clone());

        let result = self.source.list(&query).await;
        self.state.update(|s| match result {
            Ok(page) => {
                if !s.apply_page(token, page) {
                    tracing::debug!(noun = S::NOUN, token, "discarding stale page");
                }
            }
            Err(err) => {
                tracing::error!(noun = S::NOUN, error = %err, "fetch failed");
                s.fail_fetch(token, err.user_message(&Operation::Fetch.fallback(S::NOUN)));
            }
        });
    }

    pub async fn refresh(&self) {
        self.fetch().await
    }

    pub async fn set_page(&self, page: u32) {
        let mut changed = false;
        self.state.update(|s| changed = s.set_page(page));
        if changed {
            self.fetch().await;
        }
    }

    pub async fn set_size(&self, size: u32) {
        let mut changed = false;
        self.state.update(|s| changed = s.set_size(size));
        if changed {
            self.fetch().await;
        }
    }

    pub async fn update_filters(&self, filters: S::Filters) {
        let mut changed = false;
        self.state.update(|s| changed = s.set_filters(filters));
        if changed {
            self.fetch().await;
        }
    }

    pub async fn create(&self, draft: &S::Draft) -> ApiResult<S::Item> {
        self.source.ready()?;
        self.clear_error();
        let item = self
            .source
            .create(draft)
            .await
            .map_err(|err| self.report(Operation::Create, err))?;

        match S::RECONCILE {
            Reconcile::Prepend => {
                let created = item.clone();
                self.state.update(|s| s.prepend(created));
            }
            Reconcile::Refetch => self.fetch().await,
        }
        Ok(item)
    }

    pub async fn update(&self, id: i64, draft: &S::Draft) -> ApiResult<S::Item> {
        self.source.ready()?;
        self.clear_error();
        let item = self
            .source
            .update(id, draft)
            .await
            .map_err(|err| self.report(Operation::Update, err))?;
        self.replace(id, item.clone());
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.source.ready()?;
        self.clear_error();
        self.source
            .delete(id)
            .await
            .map_err(|err| self.report(Operation::Delete, err))?;
        self.state.update(|s| {
            s.remove(id);
        });
        Ok(())
    }

    fn replace(&self, id: i64, item: S::Item) {
        self.state.update(|s| {
            if !s.replace(id, item) {
                tracing::debug!(noun = S::NOUN, id, "updated item is not on the current page");
            }
        });
    }

    fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    fn report(&self, operation: Operation, err: ApiError) -> ApiError {
        tracing::error!(noun = S::NOUN, ?operation, error = %err, "operation failed");
        let message = err.user_message(&operation.fallback(S::NOUN));
        self.state.update(|s| s.error = Some(message));
        err
    }
}

impl<T, C> CollectionHook<ProjectTasks<T>, C>
where
    T: Transport,
    C: StateCell<TasksState>,
{
    pub async fn toggle_completion(&self, task_id: i64, completed: bool) -> ApiResult<Task> {
        let project_id = self.source.project_id()?;
        self.clear_error();
        let task = self
            .source
            .api()
            .toggle_completion(project_id, task_id, completed)
            .await
            .map_err(|err| self.report(Operation::ToggleCompletion, err))?;
        self.replace(task_id, task.clone());
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::poll;

    use super::*;
    use crate::api::TaskApi;
    use crate::http::{HttpClient, Method};
    use crate::state::LocalState;
    use crate::testing::{page_of, project, task, MockTransport};

    fn projects_hook(mock: &MockTransport) -> ProjectsHook<MockTransport, LocalState<ProjectsState>> {
        let http = Rc::new(HttpClient::new(mock.clone()));
        CollectionHook::new(ProjectApi::new(http), LocalState::new(CollectionState::new(0, 10, ())))
    }

    fn tasks_hook(mock: &MockTransport, project_id: Option<i64>) -> TasksHook<MockTransport, LocalState<TasksState>> {
        let http = Rc::new(HttpClient::new(mock.clone()));
        let source = ProjectTasks::new(TaskApi::new(http), project_id);
        CollectionHook::new(source, LocalState::new(CollectionState::new(0, 20, TaskFilters::default())))
    }

    fn ids<T: Identified>(items: &[T]) -> Vec<i64> {
        items.iter().map(Identified::id).collect()
    }

    // ========================
    // State reducer
    // ========================

    #[test]
    fn test_stale_token_is_ignored() {
        let mut state: ProjectsState = CollectionState::new(0, 10, ());
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.apply_page(second, page_of(vec![project(2, "new")], 1)));
        assert!(!state.apply_page(first, page_of(vec![project(1, "old")], 1)));
        assert!(!state.fail_fetch(first, "late failure".into()));

        assert_eq!(ids(&state.items), vec![2]);
        assert_eq!(state.error, None);
        assert!(!state.loading);
    }

    #[test]
    fn test_set_filters_resets_page() {
        let mut state: TasksState = CollectionState::new(3, 20, TaskFilters::default());
        let filters = TaskFilters {
            completed: Some(false),
            search: None,
        };
        assert!(state.set_filters(filters.clone()));
        assert_eq!(state.query.page, 0);
        assert_eq!(state.query.filters, filters);
        assert!(!state.set_filters(filters));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut state: ProjectsState = CollectionState::new(0, 10, ());
        let token = state.begin_fetch();
        state.apply_page(token, page_of(vec![project(1, "a"), project(2, "b"), project(3, "c")], 3));

        assert!(state.replace(2, project(2, "renamed")));
        assert!(!state.replace(9, project(9, "missing")));
        assert_eq!(ids(&state.items), vec![1, 2, 3]);
        assert_eq!(state.items[1].title, "renamed");
    }

    #[test]
    fn test_pagination_bounds() {
        let mut state: ProjectsState = CollectionState::new(0, 10, ());
        let token = state.begin_fetch();
        let mut page = page_of(vec![project(1, "a")], 25);
        page.total_pages = 3;
        state.apply_page(token, page);

        assert!(!state.has_previous());
        assert!(state.has_next());
        state.set_page(2);
        assert!(state.has_previous());
        assert!(!state.has_next());
    }

    // ========================
    // Projects
    // ========================

    #[tokio::test]
    async fn test_fetch_fills_state() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "Alpha"), project(2, "Beta")], 12));
        let hook = projects_hook(&mock);

        hook.fetch().await;

        let state = hook.state().snapshot();
        assert_eq!(ids(&state.items), vec![1, 2]);
        assert_eq!(state.total_elements, 12);
        assert!(!state.loading);
        assert!(state.loaded);

        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/projects");
        assert_eq!(request.query_value("page"), Some("0"));
        assert_eq!(request.query_value("size"), Some("10"));
        assert_eq!(request.query_value("sort"), Some("id"));
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_message() {
        let mock = MockTransport::default();
        mock.reply(500, "");
        let hook = projects_hook(&mock);

        hook.fetch().await;

        let state = hook.state().snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to fetch projects"));
        assert!(!state.loading);
        assert!(!state.loaded);
    }

    #[tokio::test]
    async fn test_create_project_prepends_without_refetch() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "Alpha")], 1));
        mock.reply_json(201, &project(7, "Fresh"));
        let hook = projects_hook(&mock);
        hook.fetch().await;

        let body = ProjectRequest {
            title: "Fresh".into(),
            description: None,
        };
        let created = hook.create(&body).await.unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(ids(&hook.state().snapshot().items), vec![7, 1]);
        assert_eq!(mock.requests().len(), 2);
        assert_eq!(mock.last_request().unwrap().method, Method::Post);
    }

    #[tokio::test]
    async fn test_delete_leaves_totals_stale() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "a"), project(2, "b")], 2));
        mock.reply(204, "");
        let hook = projects_hook(&mock);
        hook.fetch().await;

        hook.delete(1).await.unwrap();

        let state = hook.state().snapshot();
        assert_eq!(ids(&state.items), vec![2]);
        assert_eq!(state.total_elements, 2);
        assert_eq!(mock.last_request().unwrap().path, "/projects/1");
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_items_and_reports() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "a")], 1));
        mock.reply(403, r#"{"message":"Access denied"}"#);
        mock.reply(500, "");
        let hook = projects_hook(&mock);
        hook.fetch().await;

        let body = ProjectRequest {
            title: "b".into(),
            description: None,
        };
        assert!(hook.update(1, &body).await.is_err());
        assert_eq!(hook.state().snapshot().error.as_deref(), Some("Access denied"));

        assert!(hook.delete(1).await.is_err());
        let state = hook.state().snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to delete project"));
        assert_eq!(ids(&state.items), vec![1]);
    }

    #[tokio::test]
    async fn test_unchanged_page_does_not_refetch() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "a")], 30));
        let hook = projects_hook(&mock);

        hook.set_page(0).await;
        assert!(mock.requests().is_empty());

        hook.set_page(2).await;
        assert_eq!(mock.last_request().unwrap().query_value("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_size_change_refetches() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![project(1, "a")], 30));
        let hook = projects_hook(&mock);

        hook.set_size(10).await;
        assert!(mock.requests().is_empty());

        hook.set_size(20).await;
        let request = mock.last_request().unwrap();
        assert_eq!(request.query_value("size"), Some("20"));
        assert_eq!(mock.requests().len(), 1);
        assert_eq!(hook.state().snapshot().query.size, 20);
    }

    #[tokio::test]
    async fn test_overlapping_fetches_keep_latest() {
        let mock = MockTransport::default();
        let first = mock.defer();
        let second = mock.defer();
        let hook = projects_hook(&mock);

        let mut to_page_one = Box::pin(hook.set_page(1));
        assert!(poll!(&mut to_page_one).is_pending());
        let mut to_page_two = Box::pin(hook.set_page(2));
        assert!(poll!(&mut to_page_two).is_pending());

        second.resolve_json(200, &page_of(vec![project(20, "page two")], 30));
        to_page_two.await;
        first.resolve_json(200, &page_of(vec![project(10, "page one")], 30));
        to_page_one.await;

        let state = hook.state().snapshot();
        assert_eq!(state.query.page, 2);
        assert_eq!(ids(&state.items), vec![20]);
    }

    // ========================
    // Tasks
    // ========================

    #[tokio::test]
    async fn test_create_task_refetches_page() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![task(1, "a")], 1));
        mock.reply_json(201, &task(2, "b"));
        mock.reply_json(200, &page_of(vec![task(1, "a"), task(2, "b")], 2));
        let hook = tasks_hook(&mock, Some(5));
        hook.fetch().await;

        let body = TaskRequest {
            title: "b".into(),
            description: None,
            due_date: None,
        };
        hook.create(&body).await.unwrap();

        let state = hook.state().snapshot();
        assert_eq!(ids(&state.items), vec![1, 2]);
        assert_eq!(state.total_elements, 2);
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].method, Method::Get);
        assert_eq!(requests[2].path, "/projects/5/tasks");
    }

    #[tokio::test]
    async fn test_filters_reset_to_first_page() {
        let mock = MockTransport::default();
        mock.reply_json(200, &page_of(vec![task(1, "a")], 80));
        mock.reply_json(200, &page_of(vec![task(4, "report")], 1));
        let hook = tasks_hook(&mock, Some(5));

        hook.set_page(3).await;
        assert_eq!(mock.last_request().unwrap().query_value("page"), Some("3"));

        hook.update_filters(TaskFilters {
            completed: Some(true),
            search: Some("report".into()),
        })
        .await;

        let request = mock.last_request().unwrap();
        assert_eq!(request.query_value("page"), Some("0"));
        assert_eq!(request.query_value("completed"), Some("true"));
        assert_eq!(request.query_value("search"), Some("report"));
        assert_eq!(hook.state().snapshot().query.page, 0);
    }

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let mock = MockTransport::default();
        let original = task(3, "Write tests");
        mock.reply_json(200, &page_of(vec![task(1, "a"), original.clone()], 2));
        mock.reply_json(200, &Task { completed: true, ..original.clone() });
        mock.reply_json(200, &original);
        let hook = tasks_hook(&mock, Some(5));
        hook.fetch().await;

        let done = hook.toggle_completion(3, true).await.unwrap();
        assert!(done.completed);
        assert!(hook.state().snapshot().items[1].completed);
        assert_eq!(mock.last_request().unwrap().query_value("completed"), Some("true"));

        hook.toggle_completion(3, false).await.unwrap();
        let state = hook.state().snapshot();
        assert_eq!(state.items[1], original);
        assert_eq!(ids(&state.items), vec![1, 3]);
        assert_eq!(
            mock.last_request().unwrap().path,
            "/projects/5/tasks/3/completion"
        );
    }

    #[tokio::test]
    async fn test_missing_project_id_is_a_hard_failure() {
        let mock = MockTransport::default();
        let hook = tasks_hook(&mock, None);

        hook.fetch().await;
        assert!(!hook.state().snapshot().loading);

        let err = hook.toggle_completion(1, true).await.unwrap_err();
        assert_eq!(err, ApiError::MissingIdentifier("project id"));
        let err = hook.delete(1).await.unwrap_err();
        assert_eq!(err, ApiError::MissingIdentifier("project id"));

        assert!(mock.requests().is_empty());
        assert_eq!(hook.state().snapshot().error, None);
    }
}
