#![warn(missing_docs)]
//! # plagcheck-core
//!
//! ## Purpose
//! Defines the request-side data model shared across the `plagcheck`
//! workspace.
//!
//! ## Responsibilities
//! - Validate candidate documents before any network call is made.
//! - Hold the detection configuration (threshold, search switches, chapter
//!   range) and keep its cross-field rules consistent.
//! - Assemble the outbound detection request as ordered form fields.
//!
//! ## Data flow
//! Caller builds a [`FileCandidate`] -> [`validate_candidate`] ->
//! [`SelectedFile`] is combined with [`DetectionConfig`] in
//! [`DetectionRequest::new`] -> transport encodes [`DetectionRequest::form_fields`].
//!
//! ## Ownership and lifetimes
//! Selected files own their byte buffer so a request can be rebuilt for every
//! run without borrowing from the caller's file handle.
//!
//! ## Error model
//! Validation failures return [`CoreError`] variants; nothing here performs
//! I/O.
//!
//! ## Example
//! ```rust
//! use plagcheck_core::{DetectionConfig, FileCandidate, PDF_MIME, validate_candidate};
//!
//! let candidate = FileCandidate::new("thesis.pdf", PDF_MIME, 2_300_000);
//! assert!(validate_candidate(&candidate).is_ok());
//! assert_eq!(DetectionConfig::default().threshold(), 0.75);
//! ```

use thiserror::Error;

/// The only MIME type accepted for document uploads.
pub const PDF_MIME: &str = "application/pdf";

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Lowest selectable similarity threshold, in hundredths.
pub const THRESHOLD_MIN_HUNDREDTHS: u8 = 50;

/// Highest selectable similarity threshold, in hundredths.
pub const THRESHOLD_MAX_HUNDREDTHS: u8 = 100;

/// Threshold slider step, in hundredths.
pub const THRESHOLD_STEP_HUNDREDTHS: u8 = 5;

/// First selectable chapter.
pub const MIN_CHAPTER: u8 = 1;

/// Last selectable chapter.
pub const MAX_CHAPTER: u8 = 10;

/// Minimum trimmed length accepted for raw-text detection.
pub const MIN_TEXT_CHARS: usize = 50;

/// File attributes known before the body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Display file name.
    pub name: String,
    /// Detected MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileCandidate {
    /// Creates a candidate from its attributes.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }
}

/// Checks a candidate against upload rules.
///
/// MIME type is checked before size, so a large non-PDF reports
/// [`CoreError::InvalidFileType`].
///
/// # Errors
/// Returns [`CoreError::InvalidFileType`] unless MIME is exactly
/// [`PDF_MIME`], then [`CoreError::FileTooLarge`] above [`MAX_FILE_BYTES`].
pub fn validate_candidate(candidate: &FileCandidate) -> Result<(), CoreError> {
    if candidate.mime != PDF_MIME {
        return Err(CoreError::InvalidFileType {
            mime: candidate.mime.clone(),
        });
    }

    if candidate.size > MAX_FILE_BYTES {
        return Err(CoreError::FileTooLarge {
            size: candidate.size,
            limit: MAX_FILE_BYTES,
        });
    }

    Ok(())
}

/// A validated document ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    size: u64,
    bytes: Vec<u8>,
}

impl SelectedFile {
    /// Validates the candidate and attaches its contents.
    ///
    /// # Errors
    /// Propagates [`validate_candidate`] failures. Returns
    /// [`CoreError::SizeMismatch`] when `bytes` disagrees with the declared
    /// size.
    pub fn new(candidate: FileCandidate, bytes: Vec<u8>) -> Result<Self, CoreError> {
        validate_candidate(&candidate)?;
        if bytes.len() as u64 != candidate.size {
            return Err(CoreError::SizeMismatch {
                declared: candidate.size,
                actual: bytes.len() as u64,
            });
        }

        Ok(Self {
            name: candidate.name,
            size: candidate.size,
            bytes,
        })
    }

    /// File name sent with the multipart part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Size in KiB, as shown next to the selection.
    pub fn size_kib(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// User-adjustable detection settings.
///
/// Settings outlive individual runs: reset keeps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    threshold_hundredths: u8,
    use_search: bool,
    use_local_corpus: bool,
    extract_abstract: bool,
    chapters_only: bool,
    start_chapter: u8,
    end_chapter: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_hundredths: 75,
            use_search: true,
            use_local_corpus: true,
            extract_abstract: false,
            chapters_only: false,
            start_chapter: 1,
            end_chapter: 5,
        }
    }
}

impl DetectionConfig {
    /// Current threshold in [0.50, 1.00].
    pub fn threshold(&self) -> f64 {
        f64::from(self.threshold_hundredths) / 100.0
    }

    /// Sets the threshold, snapping to the nearest 0.05 step.
    ///
    /// # Errors
    /// Returns [`CoreError::ThresholdOutOfRange`] for non-finite values or
    /// values outside [0.50, 1.00].
    pub fn set_threshold(&mut self, value: f64) -> Result<(), CoreError> {
        let min = f64::from(THRESHOLD_MIN_HUNDREDTHS) / 100.0;
        let max = f64::from(THRESHOLD_MAX_HUNDREDTHS) / 100.0;
        if !(min..=max).contains(&value) {
            return Err(CoreError::ThresholdOutOfRange(value));
        }

        let step = f64::from(THRESHOLD_STEP_HUNDREDTHS);
        let snapped = ((value * 100.0 / step).round() * step)
            .clamp(f64::from(THRESHOLD_MIN_HUNDREDTHS), f64::from(THRESHOLD_MAX_HUNDREDTHS));
        self.threshold_hundredths = snapped as u8;
        Ok(())
    }

    /// Whether live web search is requested.
    pub fn use_search(&self) -> bool {
        self.use_search
    }

    /// Toggles live web search.
    pub fn set_use_search(&mut self, enabled: bool) {
        self.use_search = enabled;
    }

    /// Whether the server-side local corpus is consulted.
    pub fn use_local_corpus(&self) -> bool {
        self.use_local_corpus
    }

    /// Toggles the local corpus.
    pub fn set_use_local_corpus(&mut self, enabled: bool) {
        self.use_local_corpus = enabled;
    }

    /// Whether only the abstract is analyzed.
    pub fn extract_abstract(&self) -> bool {
        self.extract_abstract
    }

    /// Toggles abstract-only analysis.
    ///
    /// # Errors
    /// Returns [`CoreError::AbstractWithChapters`] when enabling while chapter
    /// filtering is active.
    pub fn set_extract_abstract(&mut self, enabled: bool) -> Result<(), CoreError> {
        if enabled && self.chapters_only {
            return Err(CoreError::AbstractWithChapters);
        }
        self.extract_abstract = enabled;
        Ok(())
    }

    /// Whether chapter filtering is active.
    pub fn chapters_only(&self) -> bool {
        self.chapters_only
    }

    /// Toggles chapter filtering. Enabling it switches abstract-only off.
    pub fn set_chapters_only(&mut self, enabled: bool) {
        self.chapters_only = enabled;
        if enabled {
            self.extract_abstract = false;
        }
    }

    /// Inclusive chapter range.
    pub fn chapter_range(&self) -> (u8, u8) {
        (self.start_chapter, self.end_chapter)
    }

    /// Sets the first analyzed chapter. A later end chapter is kept, an
    /// earlier one is raised to match.
    ///
    /// # Errors
    /// Returns [`CoreError::ChapterOutOfRange`] outside 1..=10.
    pub fn set_start_chapter(&mut self, chapter: u8) -> Result<(), CoreError> {
        if !(MIN_CHAPTER..=MAX_CHAPTER).contains(&chapter) {
            return Err(CoreError::ChapterOutOfRange {
                chapter,
                min: MIN_CHAPTER,
            });
        }
        self.start_chapter = chapter;
        self.end_chapter = self.end_chapter.max(chapter);
        Ok(())
    }

    /// Sets the last analyzed chapter.
    ///
    /// # Errors
    /// Returns [`CoreError::ChapterOutOfRange`] outside `start_chapter..=10`.
    pub fn set_end_chapter(&mut self, chapter: u8) -> Result<(), CoreError> {
        if !(self.start_chapter..=MAX_CHAPTER).contains(&chapter) {
            return Err(CoreError::ChapterOutOfRange {
                chapter,
                min: self.start_chapter,
            });
        }
        self.end_chapter = chapter;
        Ok(())
    }
}

/// Outbound detection request, built fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRequest {
    /// Document to analyze.
    pub file: SelectedFile,
    /// Configuration snapshot at submission time.
    pub config: DetectionConfig,
}

impl DetectionRequest {
    /// Snapshots the configuration next to the selected file.
    pub fn new(file: SelectedFile, config: &DetectionConfig) -> Self {
        Self {
            file,
            config: config.clone(),
        }
    }

    /// Text form fields in wire order; the `file` part is sent separately.
    ///
    /// Chapter bounds are always included; the server ignores them unless
    /// `chapters_only` is `true`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let config = &self.config;
        vec![
            ("threshold", config.threshold().to_string()),
            ("use_search", config.use_search.to_string()),
            ("use_local_corpus", config.use_local_corpus.to_string()),
            ("extract_abstract", config.extract_abstract.to_string()),
            ("chapters_only", config.chapters_only.to_string()),
            ("start_chapter", config.start_chapter.to_string()),
            ("end_chapter", config.end_chapter.to_string()),
        ]
    }
}

/// Outbound raw-text detection request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDetectionRequest {
    text: String,
    threshold: f64,
    use_search: bool,
}

impl TextDetectionRequest {
    /// Validates text length and snapshots threshold/search settings.
    ///
    /// # Errors
    /// Returns [`CoreError::TextTooShort`] when the trimmed text is shorter
    /// than [`MIN_TEXT_CHARS`] characters.
    pub fn new(text: impl Into<String>, config: &DetectionConfig) -> Result<Self, CoreError> {
        let text = text.into();
        let chars = text.trim().chars().count();
        if chars < MIN_TEXT_CHARS {
            return Err(CoreError::TextTooShort {
                chars,
                min: MIN_TEXT_CHARS,
            });
        }

        Ok(Self {
            text,
            threshold: config.threshold(),
            use_search: config.use_search,
        })
    }

    /// Text form fields in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("threshold", self.threshold.to_string()),
            ("use_search", self.use_search.to_string()),
        ]
    }

    /// Submitted text length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// File name for a downloaded CSV report.
pub fn report_filename(task_id: &str) -> String {
    format!("laporan_plagiarisme_{task_id}.csv")
}

/// Request-side validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Document is not a PDF.
    #[error("only PDF files are supported (got {mime})")]
    InvalidFileType {
        /// Rejected MIME type.
        mime: String,
    },
    /// Document exceeds the upload limit.
    #[error("file is {size} bytes; the maximum is {limit} bytes (10 MB)")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Upload limit.
        limit: u64,
    },
    /// File contents do not match the declared size.
    #[error("file size changed while reading: declared {declared}, read {actual}")]
    SizeMismatch {
        /// Size reported before reading.
        declared: u64,
        /// Bytes actually read.
        actual: u64,
    },
    /// Threshold outside [0.50, 1.00].
    #[error("threshold {0} is outside 0.50..=1.00")]
    ThresholdOutOfRange(f64),
    /// Chapter outside its allowed range.
    #[error("chapter {chapter} is outside {min}..=10")]
    ChapterOutOfRange {
        /// Rejected chapter.
        chapter: u8,
        /// Lowest allowed chapter.
        min: u8,
    },
    /// Abstract-only analysis cannot be combined with chapter filtering.
    #[error("abstract-only analysis cannot be combined with chapter filtering")]
    AbstractWithChapters,
    /// Detection was requested before any document was selected.
    #[error("select a PDF file first")]
    NoFileSelected,
    /// Raw text too short for detection.
    #[error("text has {chars} characters; at least {min} are required")]
    TextTooShort {
        /// Trimmed character count.
        chars: usize,
        /// Required minimum.
        min: usize,
    },
}
