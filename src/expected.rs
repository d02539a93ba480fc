use crate::classify::SessionLabel;
use crate::group::DatasetGroups;
use crate::normalize::NormalizedName;
use ahash::AHashSet;
use std::collections::BTreeSet;

/// Dataset-wide reference every subject is compared against.
#[derive(Debug, Default)]
pub struct ExpectedSets {
    /// Every session label seen under any subject, ascending.
    pub session_labels: BTreeSet<SessionLabel>,
    /// Every distinct normalized name seen under any subject and session.
    pub files: AHashSet<NormalizedName>,
}

impl ExpectedSets {
    /// Expected names applicable to `session`, ordered by their display form.
    pub fn files_for(&self, session: &SessionLabel) -> Vec<&NormalizedName> {
        let mut names: Vec<(String, &NormalizedName)> = self
            .files
            .iter()
            .filter(|name| name.applies_to(session))
            .map(|name| (name.to_string(), name))
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));
        names.into_iter().map(|(_, name)| name).collect()
    }
}

/// Full outer union of sessions and names over all subjects.
pub fn build_expected_sets(groups: &DatasetGroups) -> ExpectedSets {
    let mut expected = ExpectedSets::default();
    for (_, session, names) in groups.iter() {
        expected.session_labels.insert(session.clone());
        expected.files.extend(names.iter().cloned());
    }
    expected
}
