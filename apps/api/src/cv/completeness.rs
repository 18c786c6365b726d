use serde::{Deserialize, Serialize};

use crate::models::cv::CvDocument;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CvSection {
    PersonalInfo,
    Education,
    Experience,
    Skills,
    Projects,
}

/// Display order of the five scored sections.
pub const SECTIONS: [CvSection; 5] = [
    CvSection::PersonalInfo,
    CvSection::Education,
    CvSection::Experience,
    CvSection::Skills,
    CvSection::Projects,
];

impl CvSection {
    /// Number of entries the section holds. Personal info counts as one entry
    /// once a full name is present.
    pub fn entry_count(self, doc: &CvDocument) -> usize {
        match self {
            CvSection::PersonalInfo => usize::from(!doc.personal_info.full_name.is_empty()),
            CvSection::Education => doc.education.len(),
            CvSection::Experience => doc.experience.len(),
            CvSection::Skills => doc.skills.len(),
            CvSection::Projects => doc.projects.len(),
        }
    }

    pub fn is_populated(self, doc: &CvDocument) -> bool {
        self.entry_count(doc) > 0
    }

    fn recommendation(self) -> &'static str {
        match self {
            CvSection::PersonalInfo => "Add your full name to personal info",
            CvSection::Education => "Add at least one education entry",
            CvSection::Experience => "Add at least one experience entry",
            CvSection::Skills => "Add at least one skill",
            CvSection::Projects => "Add at least one project",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionStatus {
    pub section: CvSection,
    pub populated: bool,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub percent: u8,
    pub sections: Vec<SectionStatus>,
    pub missing_sections: Vec<CvSection>,
}

/// Share of the five sections that hold content, as a rounded percentage.
pub fn completeness(doc: &CvDocument) -> u8 {
    let populated = SECTIONS.iter().filter(|s| s.is_populated(doc)).count();
    ((populated as f64 / SECTIONS.len() as f64) * 100.0).round() as u8
}

/// True when any section holds content; export is only offered then.
pub fn has_content(doc: &CvDocument) -> bool {
    SECTIONS.iter().any(|s| s.is_populated(doc))
}

pub fn compute_completeness_report(doc: &CvDocument) -> CompletenessReport {
    let mut sections = Vec::with_capacity(SECTIONS.len());
    let mut missing_sections = Vec::new();

    for section in SECTIONS {
        let entry_count = section.entry_count(doc);
        let populated = entry_count > 0;
        if !populated {
            missing_sections.push(section);
        }
        sections.push(SectionStatus {
            section,
            populated,
            entry_count,
            recommendation: (!populated).then(|| section.recommendation().to_string()),
        });
    }

    CompletenessReport {
        percent: completeness(doc),
        sections,
        missing_sections,
    }
}
