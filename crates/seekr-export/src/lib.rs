//! PDF export of one owner's applications and interviews.
//!
//! The whole history is read and the document fully rendered before a
//! [`Report`] exists, so a failure never leaves a half-written download
//! behind. Once built, the report hands its bytes out in fixed-size chunks.

pub mod layout;
pub mod pdf;

use std::io;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use seekr_db::{ApplicationsRepository, RepoError};
use seekr_types::models::{ApplicationDetails, OwnerId};

use crate::layout::ReportLayout;

/// Bytes handed to the consumer per write.
pub const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to read the report data: {0}")]
    Read(#[from] RepoError),

    #[error("Failed to render the report: {0}")]
    Render(String),
}

#[derive(Clone)]
pub struct ExportPipeline {
    applications: ApplicationsRepository,
}

impl ExportPipeline {
    pub fn new(applications: ApplicationsRepository) -> Self {
        Self { applications }
    }

    /// Reads the owner's history, then lays out and renders it on the
    /// blocking pool.
    pub async fn generate_report(&self, owner: &OwnerId) -> Result<Report, ExportError> {
        let history = self.applications.get_application_history(owner).await?;

        let generated_at = Utc::now();
        let report = tokio::task::spawn_blocking(move || render_report(&history, generated_at))
            .await
            .map_err(|e| ExportError::Render(format!("render task failed: {}", e)))
            .and_then(|rendered| rendered);

        match &report {
            Ok(report) => info!(
                "Rendered report for {}: {} pages, {} bytes",
                owner,
                report.page_count(),
                report.len()
            ),
            Err(e) => warn!("Rendering report for {} failed: {}", owner, e),
        }
        report
    }
}

/// Lays out and renders `history` into a finished report. CPU-bound.
pub fn render_report(
    history: &[ApplicationDetails],
    generated_at: DateTime<Utc>,
) -> Result<Report, ExportError> {
    let layout = ReportLayout::build(history, generated_at);
    let bytes = pdf::render(&layout).map_err(|e| ExportError::Render(e.to_string()))?;

    Ok(Report {
        bytes: Bytes::from(bytes),
        page_count: layout.page_count(),
        file_name: format!("export-{}.pdf", generated_at.timestamp_millis()),
    })
}

/// A fully rendered report, ready to be written out.
#[derive(Debug, Clone)]
pub struct Report {
    bytes: Bytes,
    page_count: usize,
    file_name: String,
}

impl Report {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Suggested download name, `export-<unix millis>.pdf`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    /// Zero-copy views of consecutive `CHUNK_SIZE` slices.
    pub fn chunks(&self) -> impl Iterator<Item = Bytes> + '_ {
        (0..self.bytes.len())
            .step_by(CHUNK_SIZE)
            .map(|start| self.bytes.slice(start..(start + CHUNK_SIZE).min(self.bytes.len())))
    }

    /// The document as a stream of chunks, for streaming response bodies.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
        async_stream::stream! {
            for chunk in self.chunks() {
                yield Ok(chunk);
            }
        }
    }

    /// Writes the document into `sink` one chunk at a time, then flushes.
    pub async fn write_to<W>(&self, sink: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for chunk in self.chunks() {
            sink.write_all(&chunk).await?;
        }
        sink.flush().await
    }
}
