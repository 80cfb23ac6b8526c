//! Project Modal Component
//!
//! Create and edit form for a project, backed by the projects hook.

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::models::Project;
use taskboard_client::validation::{validate_project, FieldErrors};

use super::{ErrorBanner, FormField, ModalMode};
use crate::hooks::ProjectsHandle;

#[component]
pub fn ProjectModal(projects: ProjectsHandle, mode: RwSignal<ModalMode<Project>>) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let failure = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    // Reset the form every time the modal opens
    Effect::new(move |_| {
        let (t, d) = mode.with(|m| match m.editing() {
            Some(project) => (project.title.clone(), project.description.clone().unwrap_or_default()),
            None => (String::new(), String::new()),
        });
        title.set(t);
        description.set(d);
        errors.set(FieldErrors::default());
        failure.set(None);
    });

    let editing_id = move || mode.with(|m| m.editing().map(|p| p.id));
    let close = move || {
        if !submitting.get_untracked() {
            mode.set(ModalMode::Closed);
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match validate_project(&title.get_untracked(), &description.get_untracked()) {
            Ok(draft) => draft,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        let editing = mode.with_untracked(|m| m.editing().map(|p| p.id));
        submitting.set(true);
        failure.set(None);

        spawn_local(async move {
            let (result, fallback) = match editing {
                Some(id) => (projects.update(id, draft).await, "Failed to update project"),
                None => (projects.create(draft).await, "Failed to create project"),
            };
            submitting.set(false);
            match result {
                Ok(_) => mode.set(ModalMode::Closed),
                Err(err) => failure.set(Some(err.user_message(fallback))),
            }
        });
    };

    view! {
        <Show when=move || mode.with(ModalMode::is_open)>
            <div class="modal-backdrop" on:click=move |_| close()></div>
            <div class="modal" role="dialog">
                <div class="modal-header">
                    <h2>{move || if editing_id().is_some() { "Edit Project" } else { "Create New Project" }}</h2>
                    <button class="icon-btn" on:click=move |_| close()>"×"</button>
                </div>
                <form on:submit=on_submit novalidate>
                    <ErrorBanner message=failure />
                    <FormField
                        id="project-title"
                        label="Project Title *"
                        placeholder="Enter project title"
                        value=title
                        errors=errors
                        field="title"
                        disabled=submitting
                    />
                    <FormField
                        id="project-description"
                        label="Description (optional)"
                        placeholder="Enter project description"
                        multiline=true
                        value=description
                        errors=errors
                        field="description"
                        disabled=submitting
                    />
                    <div class="modal-actions">
                        <button type="button" class="secondary-btn" disabled=move || submitting.get() on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                            {move || match (submitting.get(), editing_id().is_some()) {
                                (true, true) => "Saving...",
                                (true, false) => "Creating...",
                                (false, true) => "Update Project",
                                (false, false) => "Create Project",
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
