//! Projects Page
//!
//! The signed-in landing view: header stats, a searchable grid of the
//! current page of projects, and the create/edit modal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::models::{Project, ProjectStats};

use super::{
    DeleteConfirmButton, ErrorBanner, FullPageError, LoadPhase, LoadingScreen, ModalMode, Pagination, ProgressBar, ProjectModal,
    StatCard,
};
use crate::context::{AppContext, Route};
use crate::hooks::{use_projects, ProjectsHandle};

#[component]
pub fn ProjectsPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let projects = use_projects();
    let state = projects.state();

    let mode = RwSignal::new(ModalMode::<Project>::Closed);
    let search = RwSignal::new(String::new());

    // Search narrows the loaded page only; the list endpoint has no filter.
    let visible = move || {
        let query = search.get();
        state.with(|s| s.items.iter().filter(|p| p.matches(&query)).cloned().collect::<Vec<_>>())
    };
    let stats = Memo::new(move |_| state.with(|s| ProjectStats::of(&s.items)));

    let phase = Memo::new(move |_| state.with(|s| LoadPhase::of(s.loaded, s.loading, s.error.is_some())));

    let logout = move |_: web_sys::MouseEvent| {
        spawn_local(async move {
            let nav = ctx.session.logout().await;
            ctx.follow(nav);
        });
    };

    view! {
        <ProjectModal projects=projects mode=mode />
        {move || match phase.get() {
            LoadPhase::Failed => view! {
                <FullPageError
                    message=Signal::derive(move || state.with(|s| s.error.clone().unwrap_or_default()))
                    on_retry=move |_| projects.refresh()
                />
            }
            .into_any(),
            LoadPhase::Pending => view! { <LoadingScreen label="Loading projects..." /> }.into_any(),
            LoadPhase::Ready => view! {
                <div class="page projects-page">
                    <header class="page-header">
                        <div>
                            <h1>"Your Projects"</h1>
                            <p class="subtitle">
                                {move || format!("Welcome back, {}", ctx.session.email().unwrap_or_else(|| "User".into()))}
                            </p>
                        </div>
                        <div class="header-actions">
                            <button class="primary-btn" on:click=move |_| mode.set(ModalMode::Create)>"New Project"</button>
                            <button class="icon-btn" title="Logout" on:click=logout>"Logout"</button>
                        </div>
                    </header>

                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search projects..."
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />

                    <section class="stats">
                        <StatCard label="Total Projects" value=Signal::derive(move || stats.get().total.to_string()) />
                        <StatCard label="In Progress" value=Signal::derive(move || stats.get().in_progress.to_string()) />
                        <StatCard label="Completed" value=Signal::derive(move || stats.get().completed.to_string()) />
                        <StatCard label="Total Tasks" value=Signal::derive(move || stats.get().total_tasks.to_string()) />
                    </section>

                    <ErrorBanner message=Signal::derive(move || state.with(|s| s.error.clone())) />

                    <Show
                        when=move || !visible().is_empty()
                        fallback=move || view! { <EmptyProjects projects=projects search=search mode=mode /> }
                    >
                        <div class="project-grid">
                            <For
                                each=visible
                                key=|p| (p.id, p.title.clone(), p.description.clone(), p.progress_percentage, p.total_tasks)
                                let:project
                            >
                                <ProjectCard project=project projects=projects mode=mode />
                            </For>
                        </div>
                    </Show>

                    <Pagination
                        page=Signal::derive(move || state.with(|s| s.query.page))
                        total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                        has_previous=Signal::derive(move || state.with(|s| s.has_previous()))
                        has_next=Signal::derive(move || state.with(|s| s.has_next()))
                        size=Signal::derive(move || state.with(|s| s.query.size))
                        on_page=move |page| projects.set_page(page)
                        on_size=move |size| projects.set_size(size)
                    />
                </div>
            }
            .into_any(),
        }}
    }
}

#[component]
fn EmptyProjects(projects: ProjectsHandle, search: RwSignal<String>, mode: RwSignal<ModalMode<Project>>) -> impl IntoView {
    let none_loaded = move || projects.state().with(|s| s.items.is_empty());
    view! {
        <div class="empty-state">
            <h3>"No projects found"</h3>
            <p>
                {move || if none_loaded() { "Create your first project to get started" } else { "Try adjusting your search" }}
            </p>
            <Show when=move || none_loaded() && search.with(String::is_empty)>
                <button class="primary-btn" on:click=move |_| mode.set(ModalMode::Create)>"Create Your First Project"</button>
            </Show>
        </div>
    }
}

#[component]
fn ProjectCard(project: Project, projects: ProjectsHandle, mode: RwSignal<ModalMode<Project>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let id = project.id;
    let percentage = project.progress_percentage;
    let editable = project.clone();
    let title = project.title.clone();

    let on_delete = move |_: ()| {
        spawn_local(async move {
            if let Err(err) = projects.delete(id).await {
                tracing::warn!(id, error = %err, "project delete failed");
            }
        });
    };

    view! {
        <article class="project-card" on:click=move |_| ctx.navigate(Route::Tasks(id))>
            <div class="card-header">
                <h3>{title}</h3>
                <div class="card-actions" on:click=|ev| ev.stop_propagation()>
                    <button
                        class="edit-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            mode.set(ModalMode::Edit(editable.clone()));
                        }
                    >
                        "Edit Project"
                    </button>
                    <DeleteConfirmButton label="Delete Project" on_confirm=on_delete />
                </div>
            </div>
            <p class="card-description">{project.description.unwrap_or_else(|| "No description".into())}</p>
            <ProgressBar percentage=percentage />
            <p class="card-footer">{format!("{} / {} tasks", project.completed_tasks, project.total_tasks)}</p>
        </article>
    }
}
