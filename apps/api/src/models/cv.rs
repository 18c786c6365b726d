use serde::{Deserialize, Serialize};

/// The in-progress resume. Owned by `CvStore`; consumers only ever see
/// shared read-only snapshots of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    /// Unique under case-insensitive comparison; first-inserted casing wins.
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub start_year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CvDocument {
    /// The all-empty skeleton the store starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Case-insensitive membership test used to keep `skills` unique.
    pub fn has_skill(&self, skill: &str) -> bool {
        let needle = skill.to_lowercase();
        self.skills.iter().any(|s| s.to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_skeleton_has_no_content() {
        let doc = CvDocument::empty();
        assert!(doc.personal_info.full_name.is_empty());
        assert!(doc.education.is_empty());
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
        assert!(doc.projects.is_empty());
    }

    #[test]
    fn test_has_skill_ignores_case() {
        let mut doc = CvDocument::empty();
        doc.skills.push("JavaScript".to_string());
        assert!(doc.has_skill("javascript"));
        assert!(doc.has_skill("JAVASCRIPT"));
        assert!(!doc.has_skill("Java"));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let mut doc = CvDocument::empty();
        doc.education.push(EducationEntry {
            school: "X Univ".to_string(),
            degree: "B.Sc".to_string(),
            start_year: 2018,
            end_year: None,
        });
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("personalInfo").is_some());
        assert_eq!(value["personalInfo"]["fullName"], "");
        assert_eq!(value["education"][0]["startYear"], 2018);
        assert!(value["education"][0].get("endYear").is_none());
    }

    #[test]
    fn test_personal_info_missing_fields_default_to_empty() {
        let info: PersonalInfo = serde_json::from_str(r#"{"fullName":"Ada"}"#).unwrap();
        assert_eq!(info.full_name, "Ada");
        assert!(info.email.is_empty());
        assert!(info.summary.is_empty());
    }
}
