use crate::config::AppConfig;
use crate::error::Error;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

const SUBJECT_PREFIX: &str = "sub-";
const SESSION_PREFIX: &str = "ses-";

/// One entry of the input file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub relative_path: String,
    /// Set when the entry came from a directory picker.
    pub webkit_relative_path: Option<String>,
}

impl FileEntry {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            webkit_relative_path: None,
        }
    }

    pub fn from_directory_selection(relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        Self {
            webkit_relative_path: Some(relative_path.clone()),
            relative_path,
        }
    }
}

/// Decides which paths belong to the dataset layout and which are auxiliary
/// data that must stay out of the comparison. Errors propagate to the caller
/// of the check untouched.
pub trait LayoutClassifier {
    fn is_recognized(&self, path: &str) -> Result<bool, Error>;
    fn is_auxiliary(&self, path: &str) -> Result<bool, Error>;
}

/// Glob-driven classifier built from the configured include/exclude patterns.
#[derive(Debug, Clone)]
pub struct GlobClassifier {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl GlobClassifier {
    pub fn new(include_globs: &[String], exclude_globs: &[String]) -> Result<Self, Error> {
        Ok(Self {
            include: compile_patterns(include_globs)?,
            exclude: compile_patterns(exclude_globs)?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.include_patterns, &config.exclude_patterns)
    }
}

fn compile_patterns(globs: &[String]) -> Result<Vec<Pattern>, Error> {
    globs
        .iter()
        .map(|glob| {
            Pattern::new(glob).map_err(|e| {
                error!("Invalid glob pattern '{}': {}", glob, e);
                Error::from(e)
            })
        })
        .collect()
}

impl LayoutClassifier for GlobClassifier {
    fn is_recognized(&self, path: &str) -> Result<bool, Error> {
        Ok(self.include.iter().any(|pattern| pattern.matches(path)))
    }

    fn is_auxiliary(&self, path: &str) -> Result<bool, Error> {
        Ok(self.exclude.iter().any(|pattern| pattern.matches(path)))
    }
}

/// A `sub-<label>` token as it appears in the path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session a file belongs to. Files outside any `ses-*` directory share the
/// implicit session, which sorts before every named one and never equals one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionLabel {
    Implicit,
    Named(String),
}

impl SessionLabel {
    pub fn is_named(&self) -> bool {
        matches!(self, SessionLabel::Named(_))
    }

    /// Label text; the implicit session is shown as `default_label`.
    pub fn display_with<'a>(&'a self, default_label: &'a str) -> &'a str {
        match self {
            SessionLabel::Implicit => default_label,
            SessionLabel::Named(token) => token,
        }
    }
}

/// An eligible path with its identifiers pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    pub path: String,
    pub subject: SubjectId,
    pub session: SessionLabel,
    /// Byte offset just past the subject token.
    pub subject_end: usize,
}

/// Finds the first `sub-` token that is followed by a `/`, returning it and
/// the offset where it ends.
pub fn extract_subject(path: &str) -> Option<(&str, usize)> {
    let mut search_from = 0;
    while let Some(found) = path[search_from..].find(SUBJECT_PREFIX) {
        let start = search_from + found;
        let label_start = start + SUBJECT_PREFIX.len();
        if let Some(len) = path[label_start..].find('/') {
            let end = label_start + len;
            return Some((&path[start..end], end));
        }
        search_from = label_start;
    }
    None
}

/// Reads the session token from the segment right after the subject token.
/// `subject_end` must point at the `/` closing the subject token.
pub fn extract_session(path: &str, subject_end: usize) -> Option<&str> {
    let rest = path.get(subject_end..)?.strip_prefix('/')?;
    let (segment, _) = rest.split_once('/')?;
    if segment.starts_with(SESSION_PREFIX) {
        Some(segment)
    } else {
        None
    }
}

/// Eligibility rules plus identifier extraction for one entry.
///
/// Returns `Ok(None)` for anything outside the check's scope: empty entries,
/// entries missing the directory-selection marker when it is required,
/// unrecognized or auxiliary paths, paths without a subject token and
/// sentinel subjects.
pub fn classify<C: LayoutClassifier + ?Sized>(
    entry: &FileEntry,
    classifier: &C,
    config: &AppConfig,
) -> Result<Option<ClassifiedPath>, Error> {
    let path = entry.relative_path.as_str();
    if path.is_empty() {
        return Ok(None);
    }
    if config.require_directory_selection && entry.webkit_relative_path.is_none() {
        debug!("Skipping {}: not part of a directory selection", path);
        return Ok(None);
    }
    if !classifier.is_recognized(path)? || classifier.is_auxiliary(path)? {
        debug!("Skipping {}: outside the dataset layout", path);
        return Ok(None);
    }

    let Some((subject, subject_end)) = extract_subject(path) else {
        debug!("Skipping {}: no subject token", path);
        return Ok(None);
    };
    if config.sentinel_subjects.iter().any(|s| s == subject) {
        debug!("Skipping {}: sentinel subject {}", path, subject);
        return Ok(None);
    }

    let session = match extract_session(path, subject_end) {
        Some(token) => SessionLabel::Named(token.to_string()),
        None => SessionLabel::Implicit,
    };

    Ok(Some(ClassifiedPath {
        path: path.to_string(),
        subject: SubjectId(subject.to_string()),
        session,
        subject_end,
    }))
}
