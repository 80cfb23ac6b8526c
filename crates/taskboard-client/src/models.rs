//! Wire Models
//!
//! Data structures matching the backend's JSON payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anything a collection can match by identity.
pub trait Identified {
    fn id(&self) -> i64;
}

/// The only auth artifact kept on the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

/// Project data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub progress_percentage: u32,
}

impl Identified for Project {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Project {
    /// Case-insensitive match on title or description; a blank query matches all.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: i64,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub progress_percentage: u32,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

impl Identified for Task {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Task {
    /// Past its due date and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

// ========================
// Page Summaries
// ========================

/// Header figures for the projects page, computed over the loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectStats {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total_tasks: u32,
}

impl ProjectStats {
    pub fn of(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            match p.progress_percentage {
                100 => stats.completed += 1,
                0 => {}
                _ => stats.in_progress += 1,
            }
            stats.total_tasks += p.total_tasks;
            stats
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}

// ========================
// Request Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for both project create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for both task create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// `{message}` acknowledgement returned by auth and registration endpoints
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Task list filters; `None` means "don't filter on this"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilters {
    pub completed: Option<bool>,
    pub search: Option<String>,
}

impl TaskFilters {
    /// Query parameters for the list endpoint. Blank searches are dropped.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}
