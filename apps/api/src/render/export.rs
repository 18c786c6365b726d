//! Export: fixed artifact settings, the single in-flight guard, and the
//! pluggable pipeline that turns a rendered snapshot into bytes.
//!
//! # Invariants
//! - At most one export runs at a time; a second request is rejected, never queued.
//! - The in-flight flag is released on every exit path (the permit clears it on drop).
//! - An export always renders the snapshot that was current when it started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::cv::completeness::has_content;
use crate::cv::store::CvStore;
use crate::errors::AppError;
use crate::render::preview::{render_preview, RenderedCv, UNTITLED};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFormat {
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
}

/// Artifact parameters. Fixed; not exposed to configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportSettings {
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub margin_in: f32,
    /// JPEG quality for pipelines that rasterize the preview.
    pub image_quality: f32,
    /// Canvas scale factor for pipelines that rasterize the preview.
    pub render_scale: f32,
}

pub const EXPORT_SETTINGS: ExportSettings = ExportSettings {
    page_format: PageFormat::A4,
    orientation: Orientation::Portrait,
    margin_in: 0.5,
    image_quality: 0.95,
    render_scale: 3.0,
};

const POINTS_PER_INCH: f32 = 72.0;

impl ExportSettings {
    /// Page size in PDF points (width, height) after orientation.
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = match self.page_format {
            PageFormat::A4 => (595.28, 841.89),
        };
        match self.orientation {
            Orientation::Portrait => (w, h),
        }
    }

    pub fn margin_pt(&self) -> f32 {
        self.margin_in * POINTS_PER_INCH
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error while writing artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Backend that produces the binary artifact. Carried in `AppState` as
/// `Arc<dyn ExportPipeline>` so the built-in PDF writer can be swapped.
#[async_trait]
pub trait ExportPipeline: Send + Sync {
    async fn export(&self, cv: &RenderedCv, settings: &ExportSettings)
        -> Result<Bytes, ExportError>;
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub job_id: Uuid,
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// `CV_<fullName-or-"Resume">_<YYYY-MM-DD>.pdf`
pub fn export_filename(full_name: &str, date: NaiveDate) -> String {
    let name = match full_name.trim() {
        "" => UNTITLED,
        name => name,
    };
    format!("CV_{}_{}.pdf", name, date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportStatus {
    pub in_flight: bool,
    pub last_export_at: Option<DateTime<Utc>>,
}

/// Owns the single in-flight flag and the time of the last successful export.
#[derive(Debug, Default)]
pub struct ExportCoordinator {
    in_flight: AtomicBool,
    last_export_at: Mutex<Option<DateTime<Utc>>>,
}

impl ExportCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the in-flight flag, or returns `None` if an export is running.
    pub fn try_begin(&self) -> Option<ExportPermit<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit { coordinator: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn last_export_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_export_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> ExportStatus {
        ExportStatus {
            in_flight: self.is_in_flight(),
            last_export_at: self.last_export_at(),
        }
    }
}

/// Scoped hold on the in-flight flag.
pub struct ExportPermit<'a> {
    coordinator: &'a ExportCoordinator,
}

impl ExportPermit<'_> {
    /// Records a successful export; the flag is released when the permit drops.
    pub fn complete(self, at: DateTime<Utc>) {
        *self
            .coordinator
            .last_export_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(at);
    }
}

impl Drop for ExportPermit<'_> {
    fn drop(&mut self) {
        self.coordinator.in_flight.store(false, Ordering::Release);
    }
}

/// Renders the current snapshot and runs it through `pipeline` under the
/// in-flight guard.
pub async fn run_export(
    store: &CvStore,
    coordinator: &ExportCoordinator,
    pipeline: &dyn ExportPipeline,
) -> Result<ExportArtifact, AppError> {
    let snapshot = store.snapshot();
    if !has_content(&snapshot) {
        return Err(AppError::Validation(
            "Nothing to export yet: add content to at least one section".to_string(),
        ));
    }

    let permit = coordinator.try_begin().ok_or_else(|| {
        AppError::Conflict("An export is already in progress".to_string())
    })?;

    let job_id = Uuid::new_v4();
    let filename = export_filename(&snapshot.personal_info.full_name, Utc::now().date_naive());
    info!(%job_id, %filename, "Starting export");

    let rendered = render_preview(&snapshot);
    let bytes = match pipeline.export(&rendered, &EXPORT_SETTINGS).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(%job_id, "Export failed: {e}");
            return Err(AppError::Export(e));
        }
    };

    permit.complete(Utc::now());
    info!(%job_id, size = bytes.len(), "Export finished");

    Ok(ExportArtifact {
        job_id,
        filename,
        content_type: PDF_CONTENT_TYPE,
        bytes,
    })
}
