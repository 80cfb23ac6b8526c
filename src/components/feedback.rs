//! Loading, error and progress display.

use leptos::prelude::*;

/// Inline error message; renders nothing while `message` is `None`.
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message
            .get()
            .map(|m| view! { <div class="error-banner" role="alert">{m}</div> })
    }
}

#[component]
pub fn LoadingScreen(#[prop(default = "Loading...")] label: &'static str) -> impl IntoView {
    view! {
        <div class="loading-screen">
            <div class="spinner"></div>
            <p>{label}</p>
        </div>
    }
}

/// Whole-page failure with a retry button, for loads that never succeeded.
#[component]
pub fn FullPageError(#[prop(into)] message: Signal<String>, #[prop(into)] on_retry: Callback<()>) -> impl IntoView {
    view! {
        <div class="full-page-error">
            <p>{move || message.get()}</p>
            <button class="primary-btn" on:click=move |_| on_retry.run(())>"Retry"</button>
        </div>
    }
}

fn progress_tone(percentage: u32) -> &'static str {
    match percentage {
        100.. => "progress-done",
        75..=99 => "progress-high",
        50..=74 => "progress-mid",
        25..=49 => "progress-low",
        _ => "progress-start",
    }
}

#[component]
pub fn ProgressBar(#[prop(into)] percentage: Signal<u32>) -> impl IntoView {
    view! {
        <div class="progress">
            <div class="progress-label">
                <span>"Progress"</span>
                <span>{move || format!("{}%", percentage.get())}</span>
            </div>
            <div class="progress-track">
                <div
                    class=move || format!("progress-fill {}", progress_tone(percentage.get()))
                    style:width=move || format!("{}%", percentage.get().min(100))
                ></div>
            </div>
        </div>
    }
}

/// One labelled figure in a page header.
#[component]
pub fn StatCard(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat-card">
            <p class="stat-label">{label}</p>
            <p class="stat-value">{move || value.get()}</p>
        </div>
    }
}
