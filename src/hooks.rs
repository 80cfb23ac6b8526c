//! Reactive Hooks
//!
//! Copy handles over the client crate's stores and hooks. State lives in
//! signals so views track it; the controllers themselves hold `Rc`s and
//! stay in local `StoredValue`s.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use taskboard_client::api::{AuthApi, ProjectApi, ProjectTasks, TaskApi};
use taskboard_client::collection::{CollectionHook, CollectionSource, CollectionState, ProjectsState, TasksState};
use taskboard_client::entity::{EntityState, ProjectHook, ProjectOverview, TaskHook};
use taskboard_client::models::{LoginRequest, RegisterRequest, Task, TaskFilters};
use taskboard_client::session::{Navigation, SessionState, SessionStore};
use taskboard_client::transport::ReqwestTransport;
use taskboard_client::{ApiResult, StateCell};

use crate::context::{AppContext, Http};
use crate::storage::BrowserStorage;

/// [`StateCell`] over a reference-counted signal.
///
/// Reference counted so a response landing after its view unmounted
/// writes into a live (if unobserved) signal instead of a disposed one.
pub struct SignalCell<T>(ArcRwSignal<T>);

impl<T> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Send + Sync + 'static> SignalCell<T> {
    pub fn new(value: T) -> Self {
        Self(ArcRwSignal::new(value))
    }

    /// Arena handle for views
    pub fn signal(&self) -> RwSignal<T> {
        RwSignal::from(self.0.clone())
    }
}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f)
    }
}

// ========================
// Session
// ========================

type Session = SessionStore<SignalCell<SessionState>, BrowserStorage, ReqwestTransport>;

#[derive(Clone, Copy)]
pub struct SessionHandle {
    state: RwSignal<SessionState>,
    store: StoredValue<Session, LocalStorage>,
}

impl SessionHandle {
    pub fn new(cell: SignalCell<SessionState>, http: Rc<Http>) -> Self {
        Self {
            state: cell.signal(),
            store: StoredValue::new_local(SessionStore::new(AuthApi::new(http), cell, BrowserStorage)),
        }
    }

    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    pub fn email(&self) -> Option<String> {
        self.state.with(|s| s.identity().map(|i| i.email.clone()))
    }

    /// Restore a persisted session; later calls are no-ops.
    pub fn initialize(&self) {
        let store = self.store.get_value();
        spawn_local(async move { store.initialize().await });
    }

    pub async fn login(&self, credentials: LoginRequest) -> ApiResult<Navigation> {
        let store = self.store.get_value();
        store.login(&credentials).await
    }

    pub async fn register(&self, details: RegisterRequest) -> ApiResult<Navigation> {
        let store = self.store.get_value();
        store.register(&details).await
    }

    pub async fn logout(&self) -> Navigation {
        let store = self.store.get_value();
        store.logout().await
    }
}

// ========================
// Collections
// ========================

type StateOf<S> = CollectionState<<S as CollectionSource>::Item, <S as CollectionSource>::Filters>;
type HookOf<S> = CollectionHook<S, SignalCell<StateOf<S>>>;

pub struct CollectionHandle<S: CollectionSource + 'static> {
    state: RwSignal<StateOf<S>>,
    hook: StoredValue<HookOf<S>, LocalStorage>,
}

pub type ProjectsHandle = CollectionHandle<ProjectApi<ReqwestTransport>>;
pub type TasksHandle = CollectionHandle<ProjectTasks<ReqwestTransport>>;

impl<S: CollectionSource + 'static> Clone for CollectionHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: CollectionSource + 'static> Copy for CollectionHandle<S> {}

impl<S> CollectionHandle<S>
where
    S: CollectionSource + Clone + 'static,
    S::Item: Send + Sync + 'static,
    S::Filters: Send + Sync + 'static,
{
    fn new(source: S, initial: StateOf<S>) -> Self {
        let cell = SignalCell::new(initial);
        Self {
            state: cell.signal(),
            hook: StoredValue::new_local(CollectionHook::new(source, cell)),
        }
    }

    pub fn state(&self) -> RwSignal<StateOf<S>> {
        self.state
    }

    fn spawn<F, Fut>(&self, run: F)
    where
        F: FnOnce(HookOf<S>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let hook = self.hook.get_value();
        spawn_local(run(hook));
    }

    fn hook(&self) -> HookOf<S> {
        self.hook.get_value()
    }

    pub fn refresh(&self) {
        self.spawn(|hook| async move { hook.refresh().await });
    }

    pub fn set_page(&self, page: u32) {
        self.spawn(move |hook| async move { hook.set_page(page).await });
    }

    pub fn set_size(&self, size: u32) {
        self.spawn(move |hook| async move { hook.set_size(size).await });
    }

    pub fn update_filters(&self, filters: S::Filters) {
        self.spawn(move |hook| async move { hook.update_filters(filters).await });
    }

    pub async fn create(&self, draft: S::Draft) -> ApiResult<S::Item> {
        self.hook().create(&draft).await
    }

    pub async fn update(&self, id: i64, draft: S::Draft) -> ApiResult<S::Item> {
        self.hook().update(id, &draft).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.hook().delete(id).await
    }
}

impl TasksHandle {
    pub async fn toggle_completion(&self, task_id: i64, completed: bool) -> ApiResult<Task> {
        self.hook().toggle_completion(task_id, completed).await
    }
}

/// First page of projects, fetched on mount.
pub fn use_projects() -> ProjectsHandle {
    let ctx = expect_context::<AppContext>();
    let size = ctx.config().projects_page_size;
    let handle = CollectionHandle::new(ProjectApi::new(ctx.http()), ProjectsState::new(0, size, ()));
    handle.refresh();
    handle
}

/// First page of a project's tasks, fetched on mount.
pub fn use_tasks(project_id: Option<i64>) -> TasksHandle {
    let ctx = expect_context::<AppContext>();
    let size = ctx.config().tasks_page_size;
    let source = ProjectTasks::new(TaskApi::new(ctx.http()), project_id);
    let handle = CollectionHandle::new(source, TasksState::new(0, size, TaskFilters::default()));
    handle.refresh();
    handle
}

// ========================
// Entities
// ========================

type OverviewHook = ProjectHook<ReqwestTransport, SignalCell<EntityState<ProjectOverview>>>;

/// One project with its progress. Mutations happen elsewhere, so views call
/// [`ProjectOverviewHandle::reload`] after changing the project's tasks.
#[derive(Clone, Copy)]
pub struct ProjectOverviewHandle {
    state: RwSignal<EntityState<ProjectOverview>>,
    hook: StoredValue<OverviewHook, LocalStorage>,
    id: Option<i64>,
}

impl ProjectOverviewHandle {
    pub fn state(&self) -> RwSignal<EntityState<ProjectOverview>> {
        self.state
    }

    pub fn reload(&self) {
        let hook = self.hook.get_value();
        let id = self.id;
        spawn_local(async move { hook.load(id).await });
    }
}

pub fn use_project(id: Option<i64>) -> ProjectOverviewHandle {
    let ctx = expect_context::<AppContext>();
    let cell = SignalCell::new(EntityState::default());
    let handle = ProjectOverviewHandle {
        state: cell.signal(),
        hook: StoredValue::new_local(ProjectHook::new(ProjectApi::new(ctx.http()), cell)),
        id,
    };
    handle.reload();
    handle
}

/// Reloads whenever `task_id` changes; `None` leaves the state empty.
pub fn use_task(project_id: Option<i64>, task_id: Signal<Option<i64>>) -> RwSignal<EntityState<Task>> {
    let ctx = expect_context::<AppContext>();
    let cell = SignalCell::new(EntityState::default());
    let hook = StoredValue::new_local(TaskHook::new(TaskApi::new(ctx.http()), cell.clone()));
    Effect::new(move |_| {
        let task_id = task_id.get();
        let hook = hook.get_value();
        spawn_local(async move { hook.load(project_id, task_id).await });
    });
    cell.signal()
}
