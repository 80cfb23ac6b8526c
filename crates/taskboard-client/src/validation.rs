//! Form validation.
//!
//! Runs before any request is built. A failed check never reaches the
//! backend; the view shows the per-field messages inline instead.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{LoginRequest, ProjectRequest, RegisterRequest, TaskRequest};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Field name → message, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Forget one field's message, e.g. once the user edits it.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.insert("email", "Please enter a valid email");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result(|| LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn validate_registration(form: &RegistrationForm) -> Result<RegisterRequest, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required");
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.insert("name", format!("Name must be at least {MIN_NAME_LEN} characters"));
    }
    check_email(&mut errors, &form.email);
    check_password(&mut errors, &form.password);
    if form.confirm_password.is_empty() {
        errors.insert("confirm_password", "Please confirm your password");
    } else if form.password != form.confirm_password {
        errors.insert("confirm_password", "Passwords do not match");
    }

    errors.into_result(|| RegisterRequest {
        name: name.to_string(),
        email: form.email.clone(),
        password: form.password.clone(),
    })
}

pub fn validate_project(title: &str, description: &str) -> Result<ProjectRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    if title.trim().is_empty() {
        errors.insert("title", "Title is required");
    }
    errors.into_result(|| ProjectRequest {
        title: title.trim().to_string(),
        description: optional_text(description),
    })
}

/// `due_date` is what a date input yields: empty or `YYYY-MM-DD`.
pub fn validate_task(title: &str, description: &str, due_date: &str) -> Result<TaskRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    if title.trim().is_empty() {
        errors.insert("title", "Title is required");
    }

    let due_date = due_date.trim();
    let parsed = if due_date.is_empty() {
        None
    } else {
        match NaiveDate::parse_from_str(due_date, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert("due_date", "Please enter a valid date");
                None
            }
        }
    };

    errors.into_result(|| TaskRequest {
        title: title.trim().to_string(),
        description: optional_text(description),
        due_date: parsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_accepts_valid_credentials() {
        let request = validate_login("a@b.com", "secret1").unwrap();
        assert_eq!(request.email, "a@b.com");
    }

    #[test]
    fn test_login_messages() {
        let errors = validate_login("", "").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let errors = validate_login("a@b", "12345").unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email"));
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
    }

    #[test]
    fn test_registration_checks_confirmation() {
        let mut form = RegistrationForm {
            name: "  Ada ".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.get("name"), None);

        form.confirm_password = "secret1".into();
        let request = validate_registration(&form).unwrap();
        assert_eq!(request.name, "Ada");
    }

    #[test]
    fn test_registration_name_rules() {
        let form = RegistrationForm {
            name: "A".into(),
            ..RegistrationForm::default()
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("confirm_password"), Some("Please confirm your password"));
    }

    #[test]
    fn test_project_trims_and_drops_blank_description() {
        let request = validate_project("  Launch  ", "   ").unwrap();
        assert_eq!(request.title, "Launch");
        assert_eq!(request.description, None);

        let errors = validate_project("   ", "desc").unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn test_task_due_date() {
        let request = validate_task("Ship", "", "2025-06-30").unwrap();
        assert_eq!(request.due_date, NaiveDate::from_ymd_opt(2025, 6, 30));

        let request = validate_task("Ship", "", "").unwrap();
        assert_eq!(request.due_date, None);

        let errors = validate_task("Ship", "", "30/06/2025").unwrap_err();
        assert_eq!(errors.get("due_date"), Some("Please enter a valid date"));
    }

    #[test]
    fn test_clear_single_field() {
        let mut errors = validate_login("", "").unwrap_err();
        errors.clear("email");
        assert_eq!(errors.get("email"), None);
        assert!(!errors.is_empty());
    }
}
