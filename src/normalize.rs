//! Subject/session independent file names.
//!
//! Two files from different subjects compare equal once their subject and
//! session tokens are replaced by placeholders. The placeholders are kept as
//! structured segments, so rendering a name back for a given subject never
//! re-scans text that was substituted earlier.

use crate::classify::{ClassifiedPath, SessionLabel, SubjectId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Literal(String),
    Subject,
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedName {
    session_scoped: bool,
    segments: Vec<Segment>,
}

impl NormalizedName {
    /// Builds the name from everything after the first subject token.
    pub fn from_classified(classified: &ClassifiedPath) -> Self {
        let remainder = &classified.path[classified.subject_end..];
        let session = match &classified.session {
            SessionLabel::Named(token) => Some(token.as_str()),
            SessionLabel::Implicit => None,
        };
        Self::parse(remainder, classified.subject.as_str(), session)
    }

    pub fn parse(remainder: &str, subject: &str, session: Option<&str>) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = remainder;

        while !rest.is_empty() {
            let placeholder = if token_at(rest, subject) {
                Some((Segment::Subject, subject.len()))
            } else {
                session
                    .filter(|token| token_at(rest, token))
                    .map(|token| (Segment::Session, token.len()))
            };

            match placeholder {
                Some((segment, len)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[len..];
                }
                None => {
                    // Advance one whole char to stay on a UTF-8 boundary.
                    let ch = rest.chars().next().unwrap_or_default();
                    literal.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            session_scoped: session.is_some(),
            segments,
        }
    }

    /// True when the name was observed inside a `ses-*` directory.
    pub fn is_session_scoped(&self) -> bool {
        self.session_scoped
    }

    /// Whether this name is expected under the given session.
    pub fn applies_to(&self, session: &SessionLabel) -> bool {
        self.session_scoped == session.is_named()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Concrete path remainder for a subject/session, placeholders filled in.
    pub fn render(&self, subject: &SubjectId, session: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Subject => out.push_str(subject.as_str()),
                Segment::Session => out.push_str(session),
            }
        }
        out
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Subject => f.write_str("<sub>")?,
                Segment::Session => f.write_str("<ses>")?,
            }
        }
        Ok(())
    }
}

/// `token` starts `text` and is not the prefix of a longer label.
fn token_at(text: &str, token: &str) -> bool {
    if token.is_empty() || !text.starts_with(token) {
        return false;
    }
    !text[token.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replaces_subject_and_session_tokens() {
        let name = NormalizedName::parse(
            "/ses-1/anat/sub-01_ses-1_T1w.nii",
            "sub-01",
            Some("ses-1"),
        );
        assert_eq!(name.to_string(), "/<ses>/anat/<sub>_<ses>_T1w.nii");
        assert!(name.is_session_scoped());
    }

    #[test]
    fn test_same_kind_of_file_normalizes_equal_across_subjects() {
        let a = NormalizedName::parse("/ses-1/anat/sub-01_ses-1_T1w.nii", "sub-01", Some("ses-1"));
        let b = NormalizedName::parse("/ses-2/anat/sub-02_ses-2_T1w.nii", "sub-02", Some("ses-2"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_inside_longer_label_is_literal() {
        let name = NormalizedName::parse("/anat/sub-1_acq-sub-10_T1w.nii", "sub-1", None);
        assert_eq!(name.to_string(), "/anat/<sub>_acq-sub-10_T1w.nii");
    }

    #[test]
    fn test_render_does_not_rescan_substituted_text() {
        // The session label also appears literally in the file name.
        let name = NormalizedName::parse("/ses-a/func/sub-x_ses-a_task-ses-b.nii", "sub-x", Some("ses-a"));
        let rendered = name.render(&SubjectId::new("sub-y"), "ses-b");
        assert_eq!(rendered, "/ses-b/func/sub-y_ses-b_task-ses-b.nii");
    }

    #[test]
    fn test_sessionless_names_do_not_apply_to_named_sessions() {
        let name = NormalizedName::parse("/anat/sub-01_T1w.nii", "sub-01", None);
        assert!(name.applies_to(&SessionLabel::Implicit));
        assert!(!name.applies_to(&SessionLabel::Named("ses-1".to_string())));
    }
}
