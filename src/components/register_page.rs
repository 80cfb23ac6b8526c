//! Register Page

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskboard_client::validation::{validate_registration, FieldErrors, RegistrationForm};

use super::{ErrorBanner, FormField};
use crate::context::{AppContext, Route};

/// Pause on the confirmation before moving on to login
const REDIRECT_DELAY_MS: u32 = 2_000;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let general = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let registered = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = RegistrationForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        let details = match validate_registration(&form) {
            Ok(details) => details,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::default());
        general.set(None);
        submitting.set(true);

        spawn_local(async move {
            let result = ctx.session.register(details).await;
            submitting.set(false);
            match result {
                Ok(nav) => {
                    registered.set(true);
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    // The user may have left already
                    if ctx.route.get_untracked() == Route::Register {
                        ctx.follow(nav);
                    }
                }
                Err(err) => general.set(Some(err.user_message("Registration failed. Please try again."))),
            }
        });
    };

    let go_to_login = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ctx.navigate(Route::Login);
    };

    view! {
        <div class="auth-page">
            <Show
                when=move || registered.get()
                fallback=move || view! {
                    <div class="auth-card">
                        <h1>"Create Account"</h1>
                        <p class="subtitle">"Start organising your projects"</p>

                        <ErrorBanner message=general />

                        <form on:submit=on_submit novalidate>
                            <FormField id="name" label="Full Name" placeholder="Your name"
                                value=name errors=errors field="name" disabled=submitting />
                            <FormField id="email" label="Email Address" input_type="email" placeholder="you@example.com"
                                value=email errors=errors field="email" disabled=submitting />
                            <FormField id="password" label="Password" input_type="password" placeholder="At least 6 characters"
                                value=password errors=errors field="password" disabled=submitting />
                            <FormField id="confirm_password" label="Confirm Password" input_type="password" placeholder="Repeat your password"
                                value=confirm_password errors=errors field="confirm_password" disabled=submitting />
                            <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Creating account..." } else { "Create Account" }}
                            </button>
                        </form>

                        <p class="auth-switch">
                            "Already have an account? "
                            <a href="/login" on:click=go_to_login>"Sign In Instead"</a>
                        </p>
                    </div>
                }
            >
                <div class="auth-card success">
                    <h2>"Registration Successful!"</h2>
                    <p>"Your account has been created. Redirecting to login..."</p>
                    <a href="/login" class="primary-btn" on:click=go_to_login>"Go to Login"</a>
                </div>
            </Show>
        </div>
    }
}
