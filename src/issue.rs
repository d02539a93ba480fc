use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Issue classification. The numeric codes are fixed for compatibility with
/// downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueCode {
    /// A file present for some subjects is missing for this one.
    InconsistentSubjects,
    /// A whole session directory is missing for a subject.
    MissingSession,
}

impl IssueCode {
    pub fn code(self) -> u32 {
        match self {
            IssueCode::InconsistentSubjects => 38,
            IssueCode::MissingSession => 97,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            IssueCode::InconsistentSubjects => "INCONSISTENT_SUBJECTS",
            IssueCode::MissingSession => "MISSING_SESSION",
        }
    }

    pub fn severity(self) -> Severity {
        Severity::Warning
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            38 => Some(IssueCode::InconsistentSubjects),
            97 => Some(IssueCode::MissingSession),
            _ => None,
        }
    }
}

impl Serialize for IssueCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFile {
    pub relative_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webkit_relative_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl IssueFile {
    /// Descriptor for a concrete (missing) file path.
    pub fn for_path(path: &str) -> Self {
        let name = match path.rfind('/') {
            Some(idx) => &path[idx + 1..],
            None => path,
        };
        Self {
            relative_path: path.to_string(),
            webkit_relative_path: Some(path.to_string()),
            name: Some(name.to_string()),
            path: Some(path.to_string()),
        }
    }

    /// Descriptor carrying only a relative path, used for directories.
    pub fn relative_only(path: &str) -> Self {
        Self {
            relative_path: path.to_string(),
            webkit_relative_path: None,
            name: None,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<IssueFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Issue {
    pub fn missing_file(subject: &str, path: &str) -> Self {
        Self {
            code: IssueCode::InconsistentSubjects,
            file: Some(IssueFile::for_path(path)),
            reason: Some(format!(
                "This file is missing for subject {}, but is present for at least one other subject.",
                subject
            )),
            evidence: None,
        }
    }

    pub fn missing_session(subject: &str, session: &str) -> Self {
        Self {
            code: IssueCode::MissingSession,
            file: Some(IssueFile::relative_only(&format!("/{}/{}", subject, session))),
            reason: None,
            evidence: Some(format!("Subject: {}; Missing session: {}", subject, session)),
        }
    }

    /// Path the issue points at, if any.
    pub fn path(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.relative_path.as_str())
    }

    /// Reason or evidence, whichever is set.
    pub fn message(&self) -> &str {
        self.reason
            .as_deref()
            .or(self.evidence.as_deref())
            .unwrap_or_default()
    }
}
