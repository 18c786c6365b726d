//! Quick-add skill suggestions for the skills editor.

use serde::Serialize;

use crate::models::cv::CvDocument;

/// Suggested skills grouped the way the skills editor shows them.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    ("Programming", &["JavaScript", "Python", "Java", "C++", "Ruby"]),
    ("Web", &["React", "Angular", "Vue", "HTML5", "CSS3"]),
    ("Database", &["SQL", "MongoDB", "PostgreSQL", "Firebase"]),
    ("Tools", &["Git", "Docker", "AWS", "Jenkins", "Jira"]),
    ("Soft Skills", &["Leadership", "Communication", "Teamwork"]),
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkillSuggestions {
    pub category: &'static str,
    pub skills: Vec<&'static str>,
}

/// Every category with the skills the document does not list yet
/// (case-insensitive). Categories stay in place even when emptied.
pub fn suggest_skills(doc: &CvDocument) -> Vec<SkillSuggestions> {
    SKILL_CATEGORIES
        .iter()
        .map(|&(category, skills)| SkillSuggestions {
            category,
            skills: skills
                .iter()
                .copied()
                .filter(|skill| !doc.has_skill(skill))
                .collect(),
        })
        .collect()
}
