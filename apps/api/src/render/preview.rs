//! Preview renderer: turns a document snapshot into ordered, printable sections.
//!
//! The same `RenderedCv` feeds the markdown preview and the export pipeline, so
//! what the user previews is what gets exported.

use serde::Serialize;

use crate::models::cv::CvDocument;

/// Title used when the document has no name yet.
pub const UNTITLED: &str = "Resume";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCv {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_line: Option<String>,
    pub sections: Vec<RenderedSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub heading: String,
    /// Lists render one bullet per line; paragraphs render lines as running text.
    pub bulleted: bool,
    pub lines: Vec<String>,
}

impl RenderedCv {
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\n", self.title);
        if let Some(contact) = &self.contact_line {
            md.push_str(contact);
            md.push_str("\n\n");
        }
        for section in &self.sections {
            md.push_str(&format!("## {}\n\n", section.heading));
            for line in &section.lines {
                if section.bulleted {
                    md.push_str("- ");
                }
                md.push_str(line);
                md.push('\n');
            }
            md.push('\n');
        }
        md
    }
}

pub fn render_preview(doc: &CvDocument) -> RenderedCv {
    let info = &doc.personal_info;
    let title = match info.full_name.trim() {
        "" => UNTITLED.to_string(),
        name => name.to_string(),
    };

    let contact: Vec<&str> = [&info.email, &info.phone, &info.address]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let contact_line = (!contact.is_empty()).then(|| contact.join(" | "));

    let mut sections = Vec::new();

    if !info.summary.trim().is_empty() {
        sections.push(RenderedSection {
            heading: "Summary".to_string(),
            bulleted: false,
            lines: vec![info.summary.trim().to_string()],
        });
    }

    if !doc.education.is_empty() {
        let lines = doc
            .education
            .iter()
            .map(|e| {
                let mut line = format!("{}, {}", e.degree, e.school);
                if let Some(years) = format_years(Some(e.start_year), e.end_year) {
                    line.push_str(&format!(" ({years})"));
                }
                line
            })
            .collect();
        sections.push(list("Education", lines));
    }

    if !doc.experience.is_empty() {
        let mut lines = Vec::new();
        for e in &doc.experience {
            let mut line = format!("{} at {}", e.title, e.company);
            if let Some(years) = format_years(e.start_year, e.end_year) {
                line.push_str(&format!(" ({years})"));
            }
            if let Some(description) = e.description.as_deref().map(str::trim) {
                if !description.is_empty() {
                    line.push_str(": ");
                    line.push_str(description);
                }
            }
            lines.push(line);
        }
        sections.push(list("Experience", lines));
    }

    if !doc.skills.is_empty() {
        sections.push(RenderedSection {
            heading: "Skills".to_string(),
            bulleted: false,
            lines: vec![doc.skills.join(", ")],
        });
    }

    if !doc.projects.is_empty() {
        let lines = doc
            .projects
            .iter()
            .map(|p| match p.description.trim() {
                "" => p.name.clone(),
                description => format!("{}: {}", p.name, description),
            })
            .collect();
        sections.push(list("Projects", lines));
    }

    RenderedCv {
        title,
        contact_line,
        sections,
    }
}

fn list(heading: &str, lines: Vec<String>) -> RenderedSection {
    RenderedSection {
        heading: heading.to_string(),
        bulleted: true,
        lines,
    }
}

fn format_years(start: Option<u16>, end: Option<u16>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(start), None) => Some(format!("{start} - Present")),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}
