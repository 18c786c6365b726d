//! Editor-side checks applied before an action is dispatched.
//!
//! The transition function accepts anything; these rules belong to the
//! editors that build actions, so they run in the HTTP layer only.

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::cv::actions::Action;
use crate::models::cv::{EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry};

pub const MAX_SUMMARY_CHARS: usize = 500;
pub const MAX_PROJECT_NAME_CHARS: usize = 50;
pub const MAX_PROJECT_DESCRIPTION_CHARS: usize = 200;
/// Earliest year an experience entry may start or end in.
pub const EARLIEST_YEAR: u16 = 1950;
/// How far into the future an experience end year may reach.
pub const MAX_YEARS_AHEAD: u16 = 10;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{}", describe(.errors))]
pub struct DraftValidationError {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trims and checks an action the way the section editors do before dispatch.
/// Index-only and unrecognized actions pass through untouched.
pub fn normalize_action(action: Action) -> Result<Action, DraftValidationError> {
    let mut errors = Vec::new();

    let action = match action {
        Action::SetPersonalInfo(info) => {
            let info = trim_personal_info(info);
            check_personal_info(&info, &mut errors);
            Action::SetPersonalInfo(info)
        }
        Action::AddSkill(skill) => {
            let skill = skill.trim().to_string();
            if skill.is_empty() {
                errors.push(field_error("skill", "Please enter a skill"));
            }
            Action::AddSkill(skill)
        }
        Action::AddEducation(entry) => {
            check_education(&entry, &mut errors);
            Action::AddEducation(entry)
        }
        Action::UpdateEducation { index, data } => {
            check_education(&data, &mut errors);
            Action::UpdateEducation { index, data }
        }
        Action::AddExperience(entry) => {
            check_experience(&entry, &mut errors);
            Action::AddExperience(entry)
        }
        Action::UpdateExperience { index, data } => {
            check_experience(&data, &mut errors);
            Action::UpdateExperience { index, data }
        }
        Action::AddProject(entry) => {
            check_project(&entry, &mut errors);
            Action::AddProject(entry)
        }
        Action::UpdateProject { index, data } => {
            check_project(&data, &mut errors);
            Action::UpdateProject { index, data }
        }
        other => other,
    };

    if errors.is_empty() {
        Ok(action)
    } else {
        Err(DraftValidationError { errors })
    }
}

fn trim_personal_info(info: PersonalInfo) -> PersonalInfo {
    PersonalInfo {
        full_name: info.full_name.trim().to_string(),
        email: info.email.trim().to_string(),
        phone: info.phone.trim().to_string(),
        address: info.address.trim().to_string(),
        summary: info.summary.trim().to_string(),
    }
}

fn check_personal_info(info: &PersonalInfo, errors: &mut Vec<FieldError>) {
    if info.full_name.is_empty() {
        errors.push(field_error("fullName", "Name is required"));
    }
    if !info.email.is_empty() && !is_valid_email(&info.email) {
        errors.push(field_error("email", "Please enter a valid email address"));
    }
    if !info.phone.is_empty() && !is_valid_phone(&info.phone) {
        errors.push(field_error("phone", "Please enter a valid phone number"));
    }
    if info.summary.chars().count() > MAX_SUMMARY_CHARS {
        errors.push(field_error(
            "summary",
            format!("Summary should be less than {MAX_SUMMARY_CHARS} characters"),
        ));
    }
}

fn check_education(entry: &EducationEntry, errors: &mut Vec<FieldError>) {
    require("school", &entry.school, errors);
    require("degree", &entry.degree, errors);
    check_year_order(Some(entry.start_year), entry.end_year, errors);
}

fn check_experience(entry: &ExperienceEntry, errors: &mut Vec<FieldError>) {
    require("company", &entry.company, errors);
    require("title", &entry.title, errors);

    let current_year = current_year();
    let latest_end = current_year.saturating_add(MAX_YEARS_AHEAD);
    check_year_range("startYear", entry.start_year, current_year, errors);
    check_year_range("endYear", entry.end_year, latest_end, errors);
    check_year_order(entry.start_year, entry.end_year, errors);
}

fn check_project(entry: &ProjectEntry, errors: &mut Vec<FieldError>) {
    require("name", &entry.name, errors);
    if entry.name.chars().count() > MAX_PROJECT_NAME_CHARS {
        errors.push(field_error(
            "name",
            format!("Project name must be {MAX_PROJECT_NAME_CHARS} characters or less"),
        ));
    }
    if entry.description.chars().count() > MAX_PROJECT_DESCRIPTION_CHARS {
        errors.push(field_error(
            "description",
            format!("Description must be {MAX_PROJECT_DESCRIPTION_CHARS} characters or less"),
        ));
    }
}

fn current_year() -> u16 {
    u16::try_from(Utc::now().year()).unwrap_or(u16::MAX)
}

fn check_year_range(
    field: &'static str,
    year: Option<u16>,
    latest: u16,
    errors: &mut Vec<FieldError>,
) {
    if let Some(year) = year {
        if !(EARLIEST_YEAR..=latest).contains(&year) {
            errors.push(field_error(
                field,
                format!("Must be between {EARLIEST_YEAR} and {latest}"),
            ));
        }
    }
}

fn require(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(field_error(field, format!("{field} is required")));
    }
}

fn check_year_order(start: Option<u16>, end: Option<u16>, errors: &mut Vec<FieldError>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(field_error(
                "endYear",
                format!("End year {end} is before start year {start}"),
            ));
        }
    }
}

fn field_error(field: &'static str, message: impl Into<String>) -> FieldError {
    FieldError {
        field,
        message: message.into(),
    }
}

/// Accepts `local@domain.tld` shapes: one `@`, no whitespace, and a dot inside
/// the domain with text on both sides.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, email: &str, phone: &str) -> PersonalInfo {
        PersonalInfo {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..PersonalInfo::default()
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@.com"));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("+1 (555) 010-9999"));
        assert!(!is_valid_phone("555-CALL-NOW"));
    }

    #[test]
    fn test_personal_info_requires_name() {
        let err = normalize_action(Action::SetPersonalInfo(info("   ", "", ""))).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "fullName");
    }

    #[test]
    fn test_personal_info_is_trimmed() {
        let action =
            normalize_action(Action::SetPersonalInfo(info(" Ada ", " ada@example.com ", "")))
                .unwrap();
        match action {
            Action::SetPersonalInfo(info) => {
                assert_eq!(info.full_name, "Ada");
                assert_eq!(info.email, "ada@example.com");
            }
            other => panic!("expected SetPersonalInfo, got {other:?}"),
        }
    }

    #[test]
    fn test_personal_info_collects_all_errors() {
        let err =
            normalize_action(Action::SetPersonalInfo(info("", "nope", "abc"))).unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["fullName", "email", "phone"]);
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_skill_is_trimmed_and_blank_rejected() {
        assert_eq!(
            normalize_action(Action::AddSkill("  Rust ".to_string())).unwrap(),
            Action::AddSkill("Rust".to_string())
        );
        assert!(normalize_action(Action::AddSkill("   ".to_string())).is_err());
    }

    #[test]
    fn test_education_year_order() {
        let entry = EducationEntry {
            school: "X Univ".to_string(),
            degree: "B.Sc".to_string(),
            start_year: 2022,
            end_year: Some(2018),
        };
        let err = normalize_action(Action::AddEducation(entry)).unwrap_err();
        assert_eq!(err.errors[0].field, "endYear");
    }

    #[test]
    fn test_update_project_requires_name() {
        let err = normalize_action(Action::UpdateProject {
            index: 0,
            data: ProjectEntry {
                name: String::new(),
                description: "desc".to_string(),
            },
        })
        .unwrap_err();
        assert_eq!(err.errors[0].field, "name");
    }

    #[test]
    fn test_summary_length_limit() {
        let mut within = info("Ada", "", "");
        within.summary = "a".repeat(MAX_SUMMARY_CHARS);
        assert!(normalize_action(Action::SetPersonalInfo(within)).is_ok());

        let mut over = info("Ada", "", "");
        over.summary = "a".repeat(MAX_SUMMARY_CHARS + 1);
        let err = normalize_action(Action::SetPersonalInfo(over)).unwrap_err();
        assert_eq!(err.errors[0].field, "summary");
    }

    #[test]
    fn test_project_length_limits() {
        let err = normalize_action(Action::AddProject(ProjectEntry {
            name: "n".repeat(MAX_PROJECT_NAME_CHARS + 1),
            description: "d".repeat(MAX_PROJECT_DESCRIPTION_CHARS + 1),
        }))
        .unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "description"]);

        assert!(normalize_action(Action::AddProject(ProjectEntry {
            name: "n".repeat(MAX_PROJECT_NAME_CHARS),
            description: "d".repeat(MAX_PROJECT_DESCRIPTION_CHARS),
        }))
        .is_ok());
    }

    #[test]
    fn test_experience_year_bounds() {
        let this_year = current_year();
        let entry = |start: Option<u16>, end: Option<u16>| ExperienceEntry {
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            start_year: start,
            end_year: end,
            description: None,
        };

        let err = normalize_action(Action::AddExperience(entry(Some(1949), None))).unwrap_err();
        assert_eq!(err.errors[0].field, "startYear");

        let err = normalize_action(Action::AddExperience(entry(Some(this_year + 1), None)))
            .unwrap_err();
        assert_eq!(err.errors[0].field, "startYear");

        let err = normalize_action(Action::AddExperience(entry(
            Some(this_year),
            Some(this_year + MAX_YEARS_AHEAD + 1),
        )))
        .unwrap_err();
        assert_eq!(err.errors[0].field, "endYear");

        assert!(normalize_action(Action::AddExperience(entry(
            Some(EARLIEST_YEAR),
            Some(this_year + MAX_YEARS_AHEAD),
        )))
        .is_ok());
    }

    #[test]
    fn test_index_actions_pass_through() {
        assert_eq!(
            normalize_action(Action::RemoveEducation(7)).unwrap(),
            Action::RemoveEducation(7)
        );
        let unknown = Action::Unrecognized {
            kind: "ADD_HOBBY".to_string(),
        };
        assert_eq!(normalize_action(unknown.clone()).unwrap(), unknown);
    }
}
