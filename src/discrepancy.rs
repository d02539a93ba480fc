use crate::classify::SessionLabel;
use crate::expected::ExpectedSets;
use crate::group::DatasetGroups;
use crate::issue::Issue;
use crate::normalize::NormalizedName;
use ahash::AHashSet;
use tracing::debug;

/// Diffs every subject against the expected sets.
///
/// Subjects are visited in ascending order, and each one against every
/// dataset-wide session label. A named session the subject lacks entirely
/// yields one missing-session issue and no per-file issues. Otherwise every
/// applicable expected name absent from the subject's files yields one
/// missing-file issue. The implicit session is never reported as missing;
/// a subject without one is diffed against an empty list.
pub fn report_discrepancies(
    groups: &DatasetGroups,
    expected: &ExpectedSets,
    default_session_label: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for subject in groups.subjects() {
        for session in &expected.session_labels {
            let label = session.display_with(default_session_label);
            let actual: &[NormalizedName] = match (groups.files(subject, session), session) {
                (Some(names), _) => names,
                (None, SessionLabel::Named(_)) => {
                    debug!("{} is missing session {}", subject, label);
                    issues.push(Issue::missing_session(subject.as_str(), label));
                    continue;
                }
                (None, SessionLabel::Implicit) => &[],
            };

            let present: AHashSet<&NormalizedName> = actual.iter().collect();
            for name in expected.files_for(session) {
                if present.contains(name) {
                    continue;
                }
                let missing = format!("/{}{}", subject, name.render(subject, label));
                debug!("{} is missing {}", subject, missing);
                issues.push(Issue::missing_file(subject.as_str(), &missing));
            }
        }
    }

    issues
}
