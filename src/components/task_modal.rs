//! Task Modal Component
//!
//! Create and edit form for a task. Editing prefills from the task itself,
//! fetched fresh through the task entity hook.

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::validation::{validate_task, FieldErrors};

use super::{ErrorBanner, FormField, ModalMode};
use crate::hooks::{use_task, ProjectOverviewHandle, TasksHandle};

#[component]
pub fn TaskModal(
    project_id: i64,
    tasks: TasksHandle,
    overview: ProjectOverviewHandle,
    /// `Edit` carries the task id
    mode: RwSignal<ModalMode<i64>>,
) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let due_date = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let failure = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let editing_id = Signal::derive(move || mode.with(|m| m.editing().copied()));
    let task = use_task(Some(project_id), editing_id);

    Effect::new(move |_| {
        let loaded = editing_id
            .get()
            .and_then(|id| task.with(|s| s.entity.clone().filter(|t| t.id == id)));
        match loaded {
            Some(t) => {
                title.set(t.title);
                description.set(t.description.unwrap_or_default());
                due_date.set(t.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default());
            }
            None => {
                title.set(String::new());
                description.set(String::new());
                due_date.set(String::new());
            }
        }
        errors.set(FieldErrors::default());
        failure.set(None);
    });

    let prefilling = move || editing_id.get().is_some() && task.with(|s| s.loading);
    let busy = Signal::derive(move || submitting.get() || prefilling());
    let close = move || {
        if !submitting.get_untracked() {
            mode.set(ModalMode::Closed);
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match validate_task(&title.get_untracked(), &description.get_untracked(), &due_date.get_untracked()) {
            Ok(draft) => draft,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        let editing = editing_id.get_untracked();
        submitting.set(true);
        failure.set(None);

        spawn_local(async move {
            let (result, fallback) = match editing {
                Some(id) => (tasks.update(id, draft).await, "Failed to update task"),
                None => (tasks.create(draft).await, "Failed to create task"),
            };
            submitting.set(false);
            match result {
                Ok(_) => {
                    overview.reload();
                    mode.set(ModalMode::Closed);
                }
                Err(err) => failure.set(Some(err.user_message(fallback))),
            }
        });
    };

    view! {
        <Show when=move || mode.with(ModalMode::is_open)>
            <div class="modal-backdrop" on:click=move |_| close()></div>
            <div class="modal" role="dialog">
                <div class="modal-header">
                    <h2>{move || if editing_id.get().is_some() { "Edit Task" } else { "Create New Task" }}</h2>
                    <button class="icon-btn" disabled=move || submitting.get() on:click=move |_| close()>"×"</button>
                </div>
                <form on:submit=on_submit novalidate>
                    <ErrorBanner message=failure />
                    <ErrorBanner message=Signal::derive(move || {
                        if editing_id.get().is_some() { task.with(|s| s.error.clone()) } else { None }
                    }) />
                    <FormField
                        id="task-title"
                        label="Task Title *"
                        placeholder="Enter task title"
                        value=title
                        errors=errors
                        field="title"
                        disabled=busy
                    />
                    <FormField
                        id="task-description"
                        label="Description (optional)"
                        placeholder="Enter task description"
                        multiline=true
                        value=description
                        errors=errors
                        field="description"
                        disabled=busy
                    />
                    <FormField
                        id="task-due-date"
                        label="Due Date (optional)"
                        input_type="date"
                        value=due_date
                        errors=errors
                        field="due_date"
                        disabled=busy
                    />
                    <div class="modal-actions">
                        <button type="button" class="secondary-btn" disabled=move || submitting.get() on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary-btn" disabled=move || busy.get()>
                            {move || match (submitting.get(), editing_id.get().is_some()) {
                                (true, _) => "Saving...",
                                (false, true) => "Update Task",
                                (false, false) => "Create Task",
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
