//! Transition function: the only mutation path for `CvDocument`.
//!
//! # Invariants
//! - Total: every action yields a document, never an error or panic.
//! - Out-of-bounds remove/update is a no-op.
//! - `skills` stays unique under case-insensitive comparison.
//! - Replace actions are last-write-wins; no field merging happens here.

use tracing::warn;

use crate::cv::actions::Action;
use crate::models::cv::CvDocument;

/// Computes the next document from the current one and an action.
pub fn transition(mut doc: CvDocument, action: Action) -> CvDocument {
    match action {
        Action::SetPersonalInfo(info) => doc.personal_info = info,

        Action::AddEducation(entry) => doc.education.push(entry),
        Action::RemoveEducation(index) => remove_at(&mut doc.education, index),
        Action::UpdateEducation { index, data } => replace_at(&mut doc.education, index, data),

        Action::AddExperience(entry) => doc.experience.push(entry),
        Action::RemoveExperience(index) => remove_at(&mut doc.experience, index),
        Action::UpdateExperience { index, data } => {
            replace_at(&mut doc.experience, index, data)
        }

        Action::AddSkill(skill) => {
            if !doc.has_skill(&skill) {
                doc.skills.push(skill);
            }
        }
        Action::RemoveSkill(index) => remove_at(&mut doc.skills, index),

        Action::AddProject(entry) => doc.projects.push(entry),
        Action::RemoveProject(index) => remove_at(&mut doc.projects, index),
        Action::UpdateProject { index, data } => replace_at(&mut doc.projects, index, data),

        Action::Unrecognized { kind } => {
            warn!(kind = %kind, "Unknown action type, document left unchanged");
        }
    }
    doc
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) {
    if index < items.len() {
        items.remove(index);
    }
}

fn replace_at<T>(items: &mut [T], index: usize, data: T) {
    if let Some(slot) = items.get_mut(index) {
        *slot = data;
    }
}
