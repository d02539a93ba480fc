use crate::classify::{classify, FileEntry, LayoutClassifier, SessionLabel, SubjectId};
use crate::config::AppConfig;
use crate::error::Error;
use crate::normalize::NormalizedName;
use std::collections::BTreeMap;
use tracing::debug;

/// subject → session → normalized names, in the order they were seen.
///
/// Built once by [`group_files`] and only read afterwards. Duplicate names
/// are kept; the diff only tests membership.
#[derive(Debug, Default)]
pub struct DatasetGroups {
    subjects: BTreeMap<SubjectId, BTreeMap<SessionLabel, Vec<NormalizedName>>>,
}

impl DatasetGroups {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Subjects in ascending order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.subjects.keys()
    }

    pub fn sessions_of(
        &self,
        subject: &SubjectId,
    ) -> Option<&BTreeMap<SessionLabel, Vec<NormalizedName>>> {
        self.subjects.get(subject)
    }

    /// Names recorded for a subject at a session, `None` when the subject has
    /// no entry for that session at all.
    pub fn files(&self, subject: &SubjectId, session: &SessionLabel) -> Option<&[NormalizedName]> {
        self.subjects
            .get(subject)?
            .get(session)
            .map(|names| names.as_slice())
    }

    /// Every (subject, session, names) triple, subjects then sessions ascending.
    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, &SessionLabel, &[NormalizedName])> {
        self.subjects.iter().flat_map(|(subject, sessions)| {
            sessions
                .iter()
                .map(move |(session, names)| (subject, session, names.as_slice()))
        })
    }

    fn push(&mut self, subject: SubjectId, session: SessionLabel, name: NormalizedName) {
        self.subjects
            .entry(subject)
            .or_default()
            .entry(session)
            .or_default()
            .push(name);
    }
}

/// Classifies every entry and groups the eligible ones.
pub fn group_files<C: LayoutClassifier + ?Sized>(
    files: &[FileEntry],
    classifier: &C,
    config: &AppConfig,
) -> Result<DatasetGroups, Error> {
    let mut groups = DatasetGroups::default();
    let mut eligible = 0usize;

    for entry in files {
        let Some(classified) = classify(entry, classifier, config)? else {
            continue;
        };
        let name = NormalizedName::from_classified(&classified);
        groups.push(classified.subject, classified.session, name);
        eligible += 1;
    }

    debug!(
        "Grouped {} of {} files into {} subjects",
        eligible,
        files.len(),
        groups.subject_count()
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::GlobClassifier;

    fn group(paths: &[&str]) -> DatasetGroups {
        let config = AppConfig::default();
        let classifier = GlobClassifier::from_config(&config).unwrap();
        let files: Vec<FileEntry> = paths.iter().map(|p| FileEntry::new(*p)).collect();
        group_files(&files, &classifier, &config).unwrap()
    }

    #[test]
    fn test_group_by_subject_and_session() {
        let groups = group(&[
            "/sub-01/ses-1/anat/sub-01_ses-1_T1w.nii",
            "/sub-01/ses-2/anat/sub-01_ses-2_T1w.nii",
            "/sub-02/ses-1/anat/sub-02_ses-1_T1w.nii",
        ]);
        assert_eq!(groups.subject_count(), 2);

        let sub01 = SubjectId::new("sub-01");
        let sessions = groups.sessions_of(&sub01).unwrap();
        assert_eq!(sessions.len(), 2);

        let names = groups
            .files(&sub01, &SessionLabel::Named("ses-2".to_string()))
            .unwrap();
        assert_eq!(names[0].to_string(), "/<ses>/anat/<sub>_<ses>_T1w.nii");
    }

    #[test]
    fn test_sessionless_files_use_implicit_session() {
        let groups = group(&["/sub-01/anat/sub-01_T1w.nii", "/sub-01/sub-01_scans.tsv"]);
        let names = groups
            .files(&SubjectId::new("sub-01"), &SessionLabel::Implicit)
            .unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[1].to_string(), "/<sub>_scans.tsv");
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let groups = group(&["/sub-01/anat/sub-01_T1w.nii", "/sub-01/anat/sub-01_T1w.nii"]);
        let names = groups
            .files(&SubjectId::new("sub-01"), &SessionLabel::Implicit)
            .unwrap();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_ineligible_paths_are_skipped() {
        let groups = group(&[
            "/participants.tsv",
            "/dataset_description.json",
            "/stimuli/sub-01/face.png",
            "/sub-emptyroom/meg/sub-emptyroom_meg.fif",
            "",
        ]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_iter_is_ordered() {
        let groups = group(&[
            "/sub-02/anat/sub-02_T1w.nii",
            "/sub-01/ses-b/anat/sub-01_ses-b_T1w.nii",
            "/sub-01/ses-a/anat/sub-01_ses-a_T1w.nii",
        ]);
        let order: Vec<(String, String)> = groups
            .iter()
            .map(|(sub, ses, _)| (sub.to_string(), ses.display_with("1").to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("sub-01".to_string(), "ses-a".to_string()),
                ("sub-01".to_string(), "ses-b".to_string()),
                ("sub-02".to_string(), "1".to_string()),
            ]
        );
    }
}
