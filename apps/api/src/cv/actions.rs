//! Action vocabulary: the complete write contract of the CV store.
//!
//! Actions arrive on the wire as `{"type": "<KIND>", "payload": ...}` envelopes.
//! Known kinds decode into a statically shaped variant; any other kind decodes
//! into `Action::Unrecognized` so the store can absorb it as a logged no-op.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::cv::{EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry};

pub const SET_PERSONAL_INFO: &str = "SET_PERSONAL_INFO";
/// Older editors send this name for the same action.
pub const UPDATE_PERSONAL_INFO: &str = "UPDATE_PERSONAL_INFO";
pub const ADD_EDUCATION: &str = "ADD_EDUCATION";
pub const REMOVE_EDUCATION: &str = "REMOVE_EDUCATION";
pub const UPDATE_EDUCATION: &str = "UPDATE_EDUCATION";
pub const ADD_EXPERIENCE: &str = "ADD_EXPERIENCE";
pub const REMOVE_EXPERIENCE: &str = "REMOVE_EXPERIENCE";
pub const UPDATE_EXPERIENCE: &str = "UPDATE_EXPERIENCE";
pub const ADD_SKILL: &str = "ADD_SKILL";
pub const REMOVE_SKILL: &str = "REMOVE_SKILL";
pub const ADD_PROJECT: &str = "ADD_PROJECT";
pub const REMOVE_PROJECT: &str = "REMOVE_PROJECT";
pub const UPDATE_PROJECT: &str = "UPDATE_PROJECT";

/// A request to change the document in one specific way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetPersonalInfo(PersonalInfo),
    AddEducation(EducationEntry),
    RemoveEducation(usize),
    UpdateEducation { index: usize, data: EducationEntry },
    AddExperience(ExperienceEntry),
    RemoveExperience(usize),
    UpdateExperience { index: usize, data: ExperienceEntry },
    AddSkill(String),
    RemoveSkill(usize),
    AddProject(ProjectEntry),
    RemoveProject(usize),
    UpdateProject { index: usize, data: ProjectEntry },
    /// Any kind outside the vocabulary above. Applying it leaves the document unchanged.
    Unrecognized { kind: String },
}

impl Action {
    /// Wire name of the action kind.
    pub fn kind(&self) -> &str {
        match self {
            Action::SetPersonalInfo(_) => SET_PERSONAL_INFO,
            Action::AddEducation(_) => ADD_EDUCATION,
            Action::RemoveEducation(_) => REMOVE_EDUCATION,
            Action::UpdateEducation { .. } => UPDATE_EDUCATION,
            Action::AddExperience(_) => ADD_EXPERIENCE,
            Action::RemoveExperience(_) => REMOVE_EXPERIENCE,
            Action::UpdateExperience { .. } => UPDATE_EXPERIENCE,
            Action::AddSkill(_) => ADD_SKILL,
            Action::RemoveSkill(_) => REMOVE_SKILL,
            Action::AddProject(_) => ADD_PROJECT,
            Action::RemoveProject(_) => REMOVE_PROJECT,
            Action::UpdateProject { .. } => UPDATE_PROJECT,
            Action::Unrecognized { kind } => kind,
        }
    }
}

/// Untyped action as it travels over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum ActionDecodeError {
    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct IndexedUpdate<T> {
    index: i64,
    data: T,
}

impl TryFrom<ActionEnvelope> for Action {
    type Error = ActionDecodeError;

    fn try_from(envelope: ActionEnvelope) -> Result<Self, Self::Error> {
        let ActionEnvelope { kind, payload } = envelope;

        let action = match kind.as_str() {
            SET_PERSONAL_INFO | UPDATE_PERSONAL_INFO => {
                Action::SetPersonalInfo(decode(&kind, payload)?)
            }
            ADD_EDUCATION => Action::AddEducation(decode(&kind, payload)?),
            REMOVE_EDUCATION => Action::RemoveEducation(decode_position(&kind, payload)?),
            UPDATE_EDUCATION => {
                let update: IndexedUpdate<EducationEntry> = decode(&kind, payload)?;
                Action::UpdateEducation {
                    index: position(update.index),
                    data: update.data,
                }
            }
            ADD_EXPERIENCE => Action::AddExperience(decode(&kind, payload)?),
            REMOVE_EXPERIENCE => Action::RemoveExperience(decode_position(&kind, payload)?),
            UPDATE_EXPERIENCE => {
                let update: IndexedUpdate<ExperienceEntry> = decode(&kind, payload)?;
                Action::UpdateExperience {
                    index: position(update.index),
                    data: update.data,
                }
            }
            ADD_SKILL => Action::AddSkill(decode(&kind, payload)?),
            REMOVE_SKILL => Action::RemoveSkill(decode_position(&kind, payload)?),
            ADD_PROJECT => Action::AddProject(decode(&kind, payload)?),
            REMOVE_PROJECT => Action::RemoveProject(decode_position(&kind, payload)?),
            UPDATE_PROJECT => {
                let update: IndexedUpdate<ProjectEntry> = decode(&kind, payload)?;
                Action::UpdateProject {
                    index: position(update.index),
                    data: update.data,
                }
            }
            _ => Action::Unrecognized { kind },
        };

        Ok(action)
    }
}

fn decode<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T, ActionDecodeError> {
    serde_json::from_value(payload).map_err(|source| ActionDecodeError::InvalidPayload {
        kind: kind.to_string(),
        source,
    })
}

fn decode_position(kind: &str, payload: Value) -> Result<usize, ActionDecodeError> {
    decode::<i64>(kind, payload).map(position)
}

/// Negative positions never address an entry, so they map to an index that is
/// always out of bounds and the transition treats them as a no-op.
fn position(raw: i64) -> usize {
    usize::try_from(raw).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ActionEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_add_education() {
        let action = Action::try_from(envelope(json!({
            "type": "ADD_EDUCATION",
            "payload": {"school": "X Univ", "degree": "B.Sc", "startYear": 2018, "endYear": 2022}
        })))
        .unwrap();

        assert_eq!(
            action,
            Action::AddEducation(EducationEntry {
                school: "X Univ".to_string(),
                degree: "B.Sc".to_string(),
                start_year: 2018,
                end_year: Some(2022),
            })
        );
    }

    #[test]
    fn test_decode_update_personal_info_alias() {
        let action = Action::try_from(envelope(json!({
            "type": "UPDATE_PERSONAL_INFO",
            "payload": {"fullName": "Ada Lovelace", "email": "ada@example.com"}
        })))
        .unwrap();

        assert_eq!(action.kind(), SET_PERSONAL_INFO);
        match action {
            Action::SetPersonalInfo(info) => {
                assert_eq!(info.full_name, "Ada Lovelace");
                assert!(info.phone.is_empty());
            }
            other => panic!("expected SetPersonalInfo, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_indexed_update() {
        let action = Action::try_from(envelope(json!({
            "type": "UPDATE_PROJECT",
            "payload": {"index": 2, "data": {"name": "Catalyst", "description": "CV builder"}}
        })))
        .unwrap();

        assert!(matches!(action, Action::UpdateProject { index: 2, .. }));
    }

    #[test]
    fn test_negative_index_maps_out_of_bounds() {
        let action = Action::try_from(envelope(json!({
            "type": "REMOVE_SKILL",
            "payload": -1
        })))
        .unwrap();

        assert_eq!(action, Action::RemoveSkill(usize::MAX));
    }

    #[test]
    fn test_unknown_kind_decodes_to_unrecognized() {
        let action = Action::try_from(envelope(json!({
            "type": "ADD_HOBBY",
            "payload": "chess"
        })))
        .unwrap();

        assert_eq!(
            action,
            Action::Unrecognized {
                kind: "ADD_HOBBY".to_string()
            }
        );
        assert_eq!(action.kind(), "ADD_HOBBY");
    }

    #[test]
    fn test_known_kind_with_bad_payload_is_an_error() {
        let err = Action::try_from(envelope(json!({
            "type": "REMOVE_EDUCATION",
            "payload": "first"
        })))
        .unwrap_err();

        assert!(err.to_string().contains("REMOVE_EDUCATION"));
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let env = envelope(json!({"type": "NOOP"}));
        assert!(env.payload.is_null());
        assert!(matches!(
            Action::try_from(env).unwrap(),
            Action::Unrecognized { .. }
        ));
    }
}
