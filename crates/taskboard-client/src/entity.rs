//! Entity Hooks
//!
//! Fetch-on-mount detail state for a single project (with its progress)
//! or a single task. Read only: mutations go through the collection hooks.

use crate::api::{ProjectApi, TaskApi};
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::{Project, ProjectProgress, Task};
use crate::state::StateCell;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    pub entity: Option<E>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            entity: None,
            loading: true,
            error: None,
            generation: 0,
        }
    }
}

impl<E> EntityState<E> {
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Nothing to load; also invalidates any load still in flight.
    fn settle_empty(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    fn resolve(&mut self, token: u64, result: Result<E, String>) -> bool {
        if token != self.generation {
            return false;
        }
        match result {
            Ok(entity) => self.entity = Some(entity),
            Err(message) => self.error = Some(message),
        }
        self.loading = false;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub project: Project,
    pub progress: ProjectProgress,
}

fn describe(err: ApiError, fallback: &str) -> String {
    tracing::error!(error = %err, "{fallback}");
    err.user_message(fallback)
}

pub struct ProjectHook<T, C> {
    api: ProjectApi<T>,
    state: C,
}

impl<T, C: Clone> Clone for ProjectHook<T, C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Transport, C: StateCell<EntityState<ProjectOverview>>> ProjectHook<T, C> {
    pub fn new(api: ProjectApi<T>, state: C) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    /// Load project `id` and its progress side by side.
    pub async fn load(&self, id: Option<i64>) {
        let Some(id) = id else {
            self.state.update(EntityState::settle_empty);
            return;
        };

        let mut token = 0;
        self.state.update(|s| token = s.begin());
        let result = futures::try_join!(self.api.get(id), self.api.progress(id))
            .map(|(project, progress)| ProjectOverview { project, progress })
            .map_err(|err| describe(err, "Failed to fetch project"));
        self.state.update(|s| {
            s.resolve(token, result);
        });
    }
}

pub struct TaskHook<T, C> {
    api: TaskApi<T>,
    state: C,
}

impl<T, C: Clone> Clone for TaskHook<T, C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Transport, C: StateCell<EntityState<Task>>> TaskHook<T, C> {
    pub fn new(api: TaskApi<T>, state: C) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub async fn load(&self, project_id: Option<i64>, task_id: Option<i64>) {
        let (Some(project_id), Some(task_id)) = (project_id, task_id) else {
            self.state.update(EntityState::settle_empty);
            return;
        };

        let mut token = 0;
        self.state.update(|s| token = s.begin());
        let result = self
            .api
            .get(project_id, task_id)
            .await
            .map_err(|err| describe(err, "Failed to fetch task"));
        self.state.update(|s| {
            s.resolve(token, result);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::poll;

    use super::*;
    use crate::http::HttpClient;
    use crate::state::LocalState;
    use crate::testing::{project, task, MockTransport};

    fn http(mock: &MockTransport) -> Rc<HttpClient<MockTransport>> {
        Rc::new(HttpClient::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_project_loads_with_progress() {
        let mock = MockTransport::default();
        mock.reply_json(200, &project(4, "Launch"));
        mock.reply_json(200, &progress(4));
        let hook = ProjectHook::new(ProjectApi::new(http(&mock)), LocalState::new(EntityState::default()));

        hook.load(Some(4)).await;

        let state = hook.state().snapshot();
        let overview = state.entity.unwrap();
        assert_eq!(overview.project.title, "Launch");
        assert_eq!(overview.progress.progress_percentage, 25);
        assert!(!state.loading);

        let paths: Vec<_> = mock.requests().into_iter().map(|r| r.path).collect();
        assert!(paths.contains(&"/projects/4".to_string()));
        assert!(paths.contains(&"/projects/4/progress".to_string()));
    }

    #[tokio::test]
    async fn test_project_failure_reports_message() {
        let mock = MockTransport::default();
        mock.reply(404, r#"{"message":"Project not found"}"#);
        mock.reply(404, r#"{"message":"Project not found"}"#);
        let hook = ProjectHook::new(ProjectApi::new(http(&mock)), LocalState::new(EntityState::default()));

        hook.load(Some(9)).await;

        let state = hook.state().snapshot();
        assert_eq!(state.entity, None);
        assert_eq!(state.error.as_deref(), Some("Project not found"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_missing_ids_skip_the_network() {
        let mock = MockTransport::default();
        let hook = TaskHook::new(TaskApi::new(http(&mock)), LocalState::new(EntityState::default()));

        hook.load(Some(1), None).await;

        assert!(!hook.state().snapshot().loading);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_task_loads() {
        let mock = MockTransport::default();
        mock.reply_json(200, &task(8, "Review"));
        let hook = TaskHook::new(TaskApi::new(http(&mock)), LocalState::new(EntityState::default()));

        hook.load(Some(2), Some(8)).await;

        assert_eq!(hook.state().snapshot().entity.map(|t| t.title), Some("Review".into()));
        assert_eq!(mock.last_request().unwrap().path, "/projects/2/tasks/8");
    }

    fn progress(project_id: i64) -> ProjectProgress {
        ProjectProgress {
            project_id,
            total_tasks: 4,
            completed_tasks: 1,
            progress_percentage: 25,
        }
    }

    #[tokio::test]
    async fn test_slow_load_for_previous_project_is_discarded() {
        let mock = MockTransport::default();
        let first_project = mock.defer();
        let first_progress = mock.defer();
        mock.reply_json(200, &project(2, "Second"));
        mock.reply_json(200, &progress(2));
        let hook = ProjectHook::new(ProjectApi::new(http(&mock)), LocalState::new(EntityState::default()));

        let mut first = Box::pin(hook.load(Some(1)));
        assert!(poll!(&mut first).is_pending());
        hook.load(Some(2)).await;

        first_project.resolve_json(200, &project(1, "First"));
        first_progress.resolve_json(200, &progress(1));
        first.await;

        let state = hook.state().snapshot();
        assert_eq!(state.entity.map(|o| o.project.id), Some(2));
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_clearing_the_key_invalidates_load_in_flight() {
        let mock = MockTransport::default();
        let pending = mock.defer();
        let hook = TaskHook::new(TaskApi::new(http(&mock)), LocalState::new(EntityState::default()));

        let mut load = Box::pin(hook.load(Some(2), Some(8)));
        assert!(poll!(&mut load).is_pending());
        hook.load(Some(2), None).await;

        pending.resolve_json(200, &task(8, "Review"));
        load.await;

        let state = hook.state().snapshot();
        assert_eq!(state.entity, None);
        assert!(!state.loading);
        assert_eq!(mock.requests().len(), 1);
    }
}
