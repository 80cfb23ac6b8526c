//! Tasks Page
//!
//! One project's tasks: header with the server-side progress, search and
//! completion filters, the task list, and the create/edit modal.

use chrono::Local;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::models::{Task, TaskFilters, TaskStats};

use super::{
    DeleteConfirmButton, ErrorBanner, FullPageError, LoadPhase, LoadingScreen, ModalMode, Pagination, ProgressBar, StatCard,
    TaskModal,
};
use crate::context::{AppContext, Route};
use crate::hooks::{use_project, use_tasks, ProjectOverviewHandle, TasksHandle};

const SEARCH_DEBOUNCE_MS: u32 = 300;

const COMPLETION_FILTERS: &[(Option<bool>, &str)] = &[(None, "All"), (Some(false), "Active"), (Some(true), "Completed")];

#[component]
pub fn TasksPage(project_id: i64) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let overview = use_project(Some(project_id));
    let tasks = use_tasks(Some(project_id));
    let state = tasks.state();
    let project = overview.state();

    let mode = RwSignal::new(ModalMode::<i64>::Closed);
    let search = RwSignal::new(String::new());
    let completed = RwSignal::new(None::<bool>);
    let search_ticket = StoredValue::new(0u64);

    let apply_filters = move || {
        let search = search.with_untracked(|s| Some(s.trim().to_string()).filter(|s| !s.is_empty()));
        tasks.update_filters(TaskFilters {
            completed: completed.get_untracked(),
            search,
        });
    };

    // Only the last keystroke within the window triggers a fetch.
    let on_search = move |ev: web_sys::Event| {
        search.set(event_target_value(&ev));
        search_ticket.update_value(|n| *n += 1);
        let ticket = search_ticket.get_value();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if search_ticket.try_get_value() == Some(ticket) {
                apply_filters();
            }
        });
    };

    let stats = Memo::new(move |_| state.with(|s| TaskStats::of(&s.items)));
    let header_progress = Signal::derive(move || {
        project.with(|p| p.entity.as_ref().map(|o| o.progress.progress_percentage)).unwrap_or(0)
    });

    // The page needs both the project and a first page of tasks.
    let phase = Memo::new(move |_| {
        let project_phase = project.with(|p| LoadPhase::of(p.entity.is_some(), p.loading, p.error.is_some()));
        let tasks_phase = state.with(|s| LoadPhase::of(s.loaded, s.loading, s.error.is_some()));
        match (project_phase, tasks_phase) {
            (LoadPhase::Failed, _) | (_, LoadPhase::Failed) => LoadPhase::Failed,
            (LoadPhase::Pending, _) | (_, LoadPhase::Pending) => LoadPhase::Pending,
            _ => LoadPhase::Ready,
        }
    });
    let blocking_error = Signal::derive(move || {
        project
            .with(|p| p.error.clone())
            .or_else(|| state.with(|s| s.error.clone()))
            .unwrap_or_default()
    });

    view! {
        <TaskModal project_id=project_id tasks=tasks overview=overview mode=mode />
        {move || match phase.get() {
            LoadPhase::Failed => view! {
                <FullPageError
                    message=blocking_error
                    on_retry=move |_| {
                        overview.reload();
                        tasks.refresh();
                    }
                />
            }
            .into_any(),
            LoadPhase::Pending => view! { <LoadingScreen label="Loading tasks..." /> }.into_any(),
            LoadPhase::Ready => view! {
                <div class="page tasks-page">
                    <header class="page-header">
                        <button class="icon-btn" title="Back to Projects" on:click=move |_| ctx.navigate(Route::Projects)>
                            "← Projects"
                        </button>
                        <div>
                            <h1>
                                {move || project.with(|p| p.entity.as_ref().map(|o| o.project.title.clone()))
                                    .unwrap_or_else(|| "Project Tasks".into())}
                            </h1>
                            <p class="subtitle">
                                {move || project.with(|p| p.entity.as_ref().and_then(|o| o.project.description.clone()))
                                    .unwrap_or_else(|| "Manage your project tasks efficiently".into())}
                            </p>
                        </div>
                        <button class="primary-btn" on:click=move |_| mode.set(ModalMode::Create)>"New Task"</button>
                    </header>

                    <div class="filters">
                        <input
                            type="search"
                            class="search-input"
                            placeholder="Search tasks..."
                            prop:value=move || search.get()
                            on:input=on_search
                        />
                        <Show when=move || state.with(|s| s.loading)>
                            <span class="inline-spinner"></span>
                        </Show>
                        <div class="filter-group">
                            {COMPLETION_FILTERS
                                .iter()
                                .map(|&(value, label)| view! {
                                    <button
                                        class=move || if completed.get() == value { "filter-btn active" } else { "filter-btn" }
                                        on:click=move |_| {
                                            completed.set(value);
                                            apply_filters();
                                        }
                                    >
                                        {label}
                                    </button>
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <section class="stats">
                        <StatCard label="Total Tasks" value=Signal::derive(move || stats.get().total.to_string()) />
                        <StatCard label="Active" value=Signal::derive(move || stats.get().active.to_string()) />
                        <StatCard label="Completed" value=Signal::derive(move || stats.get().completed.to_string()) />
                    </section>

                    <ProgressBar percentage=header_progress />

                    <ErrorBanner message=Signal::derive(move || state.with(|s| s.error.clone())) />

                    <Show
                        when=move || state.with(|s| !s.items.is_empty())
                        fallback=|| view! {
                            <div class="empty-state">
                                <h3>"No tasks found"</h3>
                                <p>"Create a task or adjust your filters"</p>
                            </div>
                        }
                    >
                        <ul class="task-list">
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|t| (t.id, t.title.clone(), t.description.clone(), t.due_date, t.completed)
                                let:task
                            >
                                <TaskCard task=task tasks=tasks overview=overview mode=mode />
                            </For>
                        </ul>
                    </Show>

                    <Pagination
                        page=Signal::derive(move || state.with(|s| s.query.page))
                        total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                        has_previous=Signal::derive(move || state.with(|s| s.has_previous()))
                        has_next=Signal::derive(move || state.with(|s| s.has_next()))
                        size=Signal::derive(move || state.with(|s| s.query.size))
                        on_page=move |page| tasks.set_page(page)
                        on_size=move |size| tasks.set_size(size)
                    />
                </div>
            }
            .into_any(),
        }}
    }
}

#[component]
fn TaskCard(task: Task, tasks: TasksHandle, overview: ProjectOverviewHandle, mode: RwSignal<ModalMode<i64>>) -> impl IntoView {
    let id = task.id;
    let done = task.completed;
    let overdue = task.is_overdue(Local::now().date_naive());

    let on_toggle = move |_: web_sys::MouseEvent| {
        spawn_local(async move {
            match tasks.toggle_completion(id, !done).await {
                Ok(_) => overview.reload(),
                Err(err) => tracing::warn!(id, error = %err, "toggle failed"),
            }
        });
    };
    let on_delete = move |_: ()| {
        spawn_local(async move {
            match tasks.delete(id).await {
                Ok(()) => overview.reload(),
                Err(err) => tracing::warn!(id, error = %err, "task delete failed"),
            }
        });
    };

    let class = match (done, overdue) {
        (true, _) => "task-card completed",
        (false, true) => "task-card overdue",
        (false, false) => "task-card",
    };

    view! {
        <li class=class>
            <button
                class=if done { "toggle checked" } else { "toggle" }
                title=if done { "Mark as active" } else { "Mark Complete" }
                on:click=on_toggle
            >
                {if done { "✓" } else { "" }}
            </button>
            <div class="task-body">
                <h3>{task.title}</h3>
                {task.description.map(|d| view! { <p class="task-description">{d}</p> })}
                {task.due_date.map(|due| view! {
                    <p class="task-due">
                        {due.format("%b %-d, %Y").to_string()}
                        {overdue.then(|| view! { <span class="badge overdue">"Overdue"</span> })}
                    </p>
                })}
            </div>
            <div class="card-actions">
                <button class="edit-btn" on:click=move |_| mode.set(ModalMode::Edit(id))>"Edit Task"</button>
                <DeleteConfirmButton label="Delete Task" on_confirm=on_delete />
            </div>
        </li>
    }
}
