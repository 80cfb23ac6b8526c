//! UI Components
//!
//! Pages and the reusable pieces they are built from.

mod delete_confirm_button;
mod feedback;
mod form_field;
mod login_page;
mod pagination;
mod project_modal;
mod projects_page;
mod register_page;
mod task_modal;
mod tasks_page;

pub use delete_confirm_button::DeleteConfirmButton;
pub use feedback::{ErrorBanner, FullPageError, LoadingScreen, ProgressBar, StatCard};
pub use form_field::FormField;
pub use login_page::LoginPage;
pub use pagination::Pagination;
pub use project_modal::ProjectModal;
pub use projects_page::ProjectsPage;
pub use register_page::RegisterPage;
pub use task_modal::TaskModal;
pub use tasks_page::TasksPage;

/// Whether a page can show its content yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// First load still in flight
    Pending,
    /// First load failed; only a retry makes sense
    Failed,
    Ready,
}

impl LoadPhase {
    pub fn of(loaded: bool, loading: bool, failed: bool) -> Self {
        match (loaded, loading, failed) {
            (false, _, true) => LoadPhase::Failed,
            (false, true, false) => LoadPhase::Pending,
            _ => LoadPhase::Ready,
        }
    }
}

/// Open state of a create/edit modal
#[derive(Debug, Clone, PartialEq)]
pub enum ModalMode<T> {
    Closed,
    Create,
    Edit(T),
}

impl<T> ModalMode<T> {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalMode::Closed)
    }

    pub fn editing(&self) -> Option<&T> {
        match self {
            ModalMode::Edit(value) => Some(value),
            _ => None,
        }
    }
}
