//! Form Field Component
//!
//! Labelled input bound to a string signal, with its validation message.

use leptos::prelude::*;
use taskboard_client::validation::FieldErrors;

/// Labelled input or textarea
///
/// Editing the field clears its entry in `errors`.
#[component]
pub fn FormField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<FieldErrors>,
    /// Key of this field in `errors`
    field: &'static str,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(default = "")] placeholder: &'static str,
    #[prop(default = false)] multiline: bool,
) -> impl IntoView {
    let on_input = move |ev: web_sys::Event| {
        value.set(event_target_value(&ev));
        if errors.with_untracked(|e| e.get(field).is_some()) {
            errors.update(|e| e.clear(field));
        }
    };
    let message = move || errors.with(|e| e.get(field).map(str::to_string));

    let input = if multiline {
        view! {
            <textarea
                id=id
                rows="4"
                placeholder=placeholder
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:input=on_input
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id
                type=input_type
                placeholder=placeholder
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:input=on_input
            />
        }
        .into_any()
    };

    view! {
        <div class=move || if message().is_some() { "form-field has-error" } else { "form-field" }>
            <label for=id>{label}</label>
            {input}
            {move || message().map(|m| view! { <p class="field-error">{m}</p> })}
        </div>
    }
}
