use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::cv::actions::{Action, ActionEnvelope};
use crate::cv::completeness::{compute_completeness_report, CompletenessReport, CvSection};
use crate::cv::skills::{suggest_skills, SkillSuggestions};
use crate::cv::validation::normalize_action;
use crate::errors::AppError;
use crate::models::cv::CvDocument;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CvResponse {
    pub document: CvDocument,
    pub completeness: CompletenessReport,
}

impl CvResponse {
    fn from_document(doc: &CvDocument) -> Self {
        CvResponse {
            document: doc.clone(),
            completeness: compute_completeness_report(doc),
        }
    }
}

#[derive(Serialize)]
pub struct DraftAccepted {
    pub editor: CvSection,
    pub kind: String,
    pub commits_after_ms: u128,
}

/// GET /api/v1/cv
pub async fn handle_get_cv(State(state): State<AppState>) -> Json<CvResponse> {
    let snapshot = state.store.snapshot();
    Json(CvResponse::from_document(&snapshot))
}

/// GET /api/v1/cv/completeness
pub async fn handle_completeness(State(state): State<AppState>) -> Json<CompletenessReport> {
    Json(compute_completeness_report(&state.store.snapshot()))
}

/// GET /api/v1/cv/skills/suggestions
pub async fn handle_skill_suggestions(
    State(state): State<AppState>,
) -> Json<Vec<SkillSuggestions>> {
    Json(suggest_skills(&state.store.snapshot()))
}

/// POST /api/v1/cv/actions
/// Unknown kinds are accepted and leave the document unchanged.
pub async fn handle_dispatch(
    State(state): State<AppState>,
    Json(envelope): Json<ActionEnvelope>,
) -> Result<Json<CvResponse>, AppError> {
    let action = normalize_action(Action::try_from(envelope)?)?;
    let snapshot = state.store.dispatch(action);
    Ok(Json(CvResponse::from_document(&snapshot)))
}

/// PUT /api/v1/cv/drafts/:editor
/// Schedules the action behind the editor's debounce window. An edit that
/// fails validation cancels the editor's pending commit.
pub async fn handle_draft(
    State(state): State<AppState>,
    Path(editor): Path<CvSection>,
    Json(envelope): Json<ActionEnvelope>,
) -> Result<(StatusCode, Json<DraftAccepted>), AppError> {
    let debouncer = state.drafts.for_editor(editor);

    // A rejected edit still supersedes whatever the editor had pending.
    let action = match Action::try_from(envelope)
        .map_err(AppError::from)
        .and_then(|action| normalize_action(action).map_err(AppError::from))
    {
        Ok(action) => action,
        Err(e) => {
            debouncer.cancel();
            return Err(e);
        }
    };
    let kind = action.kind().to_string();

    debug!(?editor, kind = %kind, superseded = debouncer.is_pending(), "Draft scheduled");
    debouncer.schedule(action);

    Ok((
        StatusCode::ACCEPTED,
        Json(DraftAccepted {
            editor,
            kind,
            commits_after_ms: state.config.draft_debounce.as_millis(),
        }),
    ))
}
