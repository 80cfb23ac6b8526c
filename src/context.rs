//! Application Context
//!
//! Shared state provided via Leptos Context API: the current route, the
//! session and the HTTP services every hook builds on.

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use taskboard_client::session::{end_session, Navigation, SessionState};
use taskboard_client::transport::ReqwestTransport;
use taskboard_client::{ClientConfig, HttpClient};

use crate::hooks::{SessionHandle, SignalCell};
use crate::storage::BrowserStorage;

pub type Http = HttpClient<ReqwestTransport>;

/// Client-side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Projects,
    Tasks(i64),
}

impl Route {
    /// `/`, `/dashboard` and anything unrecognised land on the project list.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["projects", id, "tasks"] => id.parse().map(Route::Tasks).unwrap_or(Route::Projects),
            _ => Route::Projects,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Projects => "/projects".into(),
            Route::Tasks(id) => format!("/projects/{id}/tasks"),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Projects | Route::Tasks(_))
    }

    fn current() -> Self {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|path| Self::from_path(&path))
            .unwrap_or(Route::Projects)
    }
}

impl From<Navigation> for Route {
    fn from(nav: Navigation) -> Self {
        match nav {
            Navigation::Dashboard => Route::Projects,
            Navigation::Login => Route::Login,
        }
    }
}

fn push_history(route: Route, replace: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let path = route.path();
    let result = if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(&path))
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(&path))
    };
    if result.is_err() {
        tracing::warn!(%path, "failed to update browser history");
    }
}

/// Non-Copy services, kept behind a local `StoredValue`.
pub struct Services {
    pub http: Rc<Http>,
    pub config: ClientConfig,
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current route
    pub route: RwSignal<Route>,
    /// Session store and its reactive state
    pub session: SessionHandle,
    services: StoredValue<Services, LocalStorage>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let route = RwSignal::new(Route::current());
        let session_state = SignalCell::new(SessionState::default());

        // Renewal failure anywhere drops the session and goes to login.
        let http = {
            let session_state = session_state.clone();
            Rc::new(
                HttpClient::new(ReqwestTransport::new(&config)).with_expiry_handler(move || {
                    tracing::info!("session expired");
                    end_session(&session_state, &BrowserStorage);
                    push_history(Route::Login, false);
                    route.set(Route::Login);
                }),
            )
        };

        let session = SessionHandle::new(session_state, http.clone());

        // Back/forward buttons. Lives as long as the app, so the handle is
        // never used to remove it.
        let _ = window_event_listener(leptos::ev::popstate, move |_| route.set(Route::current()));

        Self {
            route,
            session,
            services: StoredValue::new_local(Services { http, config }),
        }
    }

    pub fn http(&self) -> Rc<Http> {
        self.services.with_value(|s| s.http.clone())
    }

    pub fn config(&self) -> ClientConfig {
        self.services.with_value(|s| s.config.clone())
    }

    /// Go to `route`, adding a history entry
    pub fn navigate(&self, route: Route) {
        if self.route.get_untracked() == route {
            return;
        }
        push_history(route, false);
        self.route.set(route);
    }

    /// Go to `route` in place of the current entry (redirects)
    pub fn redirect(&self, route: Route) {
        push_history(route, true);
        self.route.set(route);
    }

    /// Follow a session operation's navigation outcome
    pub fn follow(&self, nav: Navigation) {
        self.navigate(nav.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(Route::from_path("/register/"), Route::Register);
        assert_eq!(Route::from_path("/projects/42/tasks"), Route::Tasks(42));
        assert_eq!(Route::from_path("/projects/abc/tasks"), Route::Projects);
        assert_eq!(Route::from_path("/dashboard"), Route::Projects);
        assert_eq!(Route::from_path("/"), Route::Projects);
        assert_eq!(Route::from_path("/nowhere"), Route::Projects);
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in [Route::Login, Route::Register, Route::Projects, Route::Tasks(7)] {
            assert_eq!(Route::from_path(&route.path()), route);
        }
    }

    #[test]
    fn test_only_app_routes_are_protected() {
        assert!(Route::Tasks(1).is_protected());
        assert!(Route::Projects.is_protected());
        assert!(!Route::Login.is_protected());
        assert!(!Route::Register.is_protected());
    }
}
