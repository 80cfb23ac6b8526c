//! Taskboard Frontend App
//!
//! Installs the app context, restores the session and switches between
//! pages on the route signal.

use leptos::prelude::*;

use crate::components::{LoadingScreen, LoginPage, ProjectsPage, RegisterPage, TasksPage};
use crate::config;
use crate::context::{AppContext, Route};

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(config::load());
    provide_context(ctx);
    ctx.session.initialize();

    // Protected routes need a settled, authenticated session.
    Effect::new(move |_| {
        let route = ctx.route.get();
        let (resolving, authenticated) = ctx.session.state().with(|s| (s.is_resolving(), s.is_authenticated()));
        if route.is_protected() && !resolving && !authenticated {
            tracing::debug!(path = %route.path(), "not signed in, redirecting to login");
            ctx.redirect(Route::Login);
        }
    });

    view! {
        <div class="app-layout">
            {move || match ctx.route.get() {
                Route::Login => view! { <LoginPage /> }.into_any(),
                Route::Register => view! { <RegisterPage /> }.into_any(),
                route => view! { <Protected route=route /> }.into_any(),
            }}
        </div>
    }
}

/// Renders `route` once the session is known to be authenticated.
#[component]
fn Protected(route: Route) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let gate = Memo::new(move |_| ctx.session.state().with(|s| (s.is_resolving(), s.is_authenticated())));

    move || match gate.get() {
        (true, _) => view! { <LoadingScreen /> }.into_any(),
        // the redirect effect takes it from here
        (false, false) => ().into_any(),
        (false, true) => match route {
            Route::Tasks(project_id) => view! { <TasksPage project_id=project_id /> }.into_any(),
            _ => view! { <ProjectsPage /> }.into_any(),
        },
    }
}
