//! Minutes-of-Meeting document rendering
//!
//! Pure byte-stream renderers: the same document and date always produce
//! identical output. The template is the full MOM layout (heading, agenda,
//! date, transcript, summary, static action items); the older two-section
//! layout is deprecated.

mod docx;
mod pdf;

pub use docx::render_docx;
pub use pdf::render_pdf;

use chrono::NaiveDate;
use thiserror::Error;

/// Document heading.
pub const MOM_HEADING: &str = "Minutes of Meeting (MOM)";

/// Fixed agenda line.
pub const MOM_AGENDA: &str = "Audio Transcription and Summarization";

/// Static action-item list appended to every document.
pub const ACTION_ITEMS: [&str; 3] = [
    "1. Review the transcription and summary.",
    "2. Identify key points for follow-up.",
    "3. Distribute the MOM to participants.",
];

/// MIME type of the rendered Word document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type of the rendered PDF.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write document container: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),
}

/// Output encoding for the rendered minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DownloadFormat {
    /// Word-compatible document
    Docx,
    /// PDF document
    Pdf,
}

impl DownloadFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Docx => DOCX_MIME,
            Self::Pdf => PDF_MIME,
        }
    }
}

/// Structured minutes document, immutable once rendered.
#[derive(Debug, Clone)]
pub struct MomDocument {
    pub date: NaiveDate,
    pub transcript: String,
    pub summary: String,
}

impl MomDocument {
    pub fn new(transcript: impl Into<String>, summary: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            date,
            transcript: transcript.into(),
            summary: summary.into(),
        }
    }

    /// Render into the requested encoding.
    pub fn render(&self, format: DownloadFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            DownloadFormat::Docx => render_docx(self),
            DownloadFormat::Pdf => Ok(render_pdf(self)),
        }
    }
}

/// Artifact name offered for download, derived from the document date.
pub fn artifact_file_name(format: DownloadFormat, date: NaiveDate) -> String {
    format!("mom_{}.{}", date.format("%Y-%m-%d"), format.extension())
}
