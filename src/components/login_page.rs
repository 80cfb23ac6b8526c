//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::validation::{validate_login, FieldErrors};

use super::{ErrorBanner, FormField};
use crate::context::{AppContext, Route};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let general = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => credentials,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::default());
        general.set(None);
        submitting.set(true);

        spawn_local(async move {
            let result = ctx.session.login(credentials).await;
            submitting.set(false);
            match result {
                Ok(nav) => ctx.follow(nav),
                Err(err) => general.set(Some(err.user_message("Invalid email or password"))),
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Welcome Back"</h1>
                <p class="subtitle">"Sign in to continue to your dashboard"</p>

                <ErrorBanner message=general />

                <form on:submit=on_submit novalidate>
                    <FormField
                        id="email"
                        label="Email Address"
                        input_type="email"
                        placeholder="you@example.com"
                        value=email
                        errors=errors
                        field="email"
                        disabled=submitting
                    />
                    <FormField
                        id="password"
                        label="Password"
                        input_type="password"
                        placeholder="Enter your password"
                        value=password
                        errors=errors
                        field="password"
                        disabled=submitting
                    />
                    <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>

                <p class="auth-switch">
                    "Don't have an account? "
                    <a href="/register" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Route::Register);
                    }>"Create Account"</a>
                </p>
            </div>
        </div>
    }
}
