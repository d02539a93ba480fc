use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

use session_check::report::{write_report, IssueSummary, OutputFormat};
use session_check::{AppConfig, IssueCode, ProgressReporter, SessionCheck, SilentReporter};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

/// Create a dataset tree with known gaps.
/// Layout:
///   dataset_description.json
///   participants.tsv
///   stimuli/sub-01/face.png           (auxiliary, ignored)
///   .git/HEAD                         (hidden, ignored)
///   sub-01/ses-1/anat/sub-01_ses-1_T1w.nii
///   sub-01/ses-1/func/sub-01_ses-1_task-rest_bold.nii
///   sub-01/ses-2/anat/sub-01_ses-2_T1w.nii
///   sub-01/ses-2/func/sub-01_ses-2_task-rest_bold.nii
///   sub-02/ses-1/anat/sub-02_ses-1_T1w.nii   ← no func in ses-1
///   sub-02/ses-2/anat/sub-02_ses-2_T1w.nii
///   sub-02/ses-2/func/sub-02_ses-2_task-rest_bold.nii
///   sub-03/ses-1/anat/sub-03_ses-1_T1w.nii   ← no ses-2 at all
///   sub-03/ses-1/func/sub-03_ses-1_task-rest_bold.nii
///   sub-emptyroom/ses-1/meg/sub-emptyroom_ses-1_meg.fif
fn create_test_dataset(root: &Path) {
    for file in [
        "dataset_description.json",
        "participants.tsv",
        "stimuli/sub-01/face.png",
        ".git/HEAD",
        "sub-01/ses-1/anat/sub-01_ses-1_T1w.nii",
        "sub-01/ses-1/func/sub-01_ses-1_task-rest_bold.nii",
        "sub-01/ses-2/anat/sub-01_ses-2_T1w.nii",
        "sub-01/ses-2/func/sub-01_ses-2_task-rest_bold.nii",
        "sub-02/ses-1/anat/sub-02_ses-1_T1w.nii",
        "sub-02/ses-2/anat/sub-02_ses-2_T1w.nii",
        "sub-02/ses-2/func/sub-02_ses-2_task-rest_bold.nii",
        "sub-03/ses-1/anat/sub-03_ses-1_T1w.nii",
        "sub-03/ses-1/func/sub-03_ses-1_task-rest_bold.nii",
        "sub-emptyroom/ses-1/meg/sub-emptyroom_ses-1_meg.fif",
    ] {
        touch(root, file);
    }
}

#[derive(Default)]
struct CountingReporter {
    scans: AtomicUsize,
    checks: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {
        self.scans.fetch_add(1, Ordering::SeqCst);
    }

    fn on_check_complete(&self, subjects: usize, _issues: usize, _duration_secs: f64) {
        assert_eq!(subjects, 3);
        self.checks.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_full_check_pipeline() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("dataset");
    create_test_dataset(&root);

    let engine = SessionCheck::new(AppConfig::default());
    let reporter = CountingReporter::default();
    let result = engine.run(&root, &reporter).unwrap();

    // .git is pruned during the walk; everything else is listed.
    assert_eq!(result.total_files, 13);
    assert_eq!(result.subjects, 3);
    assert_eq!(reporter.scans.load(Ordering::SeqCst), 1);
    assert_eq!(reporter.checks.load(Ordering::SeqCst), 1);

    let found: Vec<(u32, &str)> = result
        .issues
        .iter()
        .map(|i| (i.code.code(), i.path().unwrap()))
        .collect();
    assert_eq!(
        found,
        vec![
            (38, "/sub-02/ses-1/func/sub-02_ses-1_task-rest_bold.nii"),
            (97, "/sub-03/ses-2"),
        ]
    );
}

#[test]
fn test_extra_exclude_pattern() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("dataset");
    create_test_dataset(&root);
    // Only sub-01 has physio recordings, kept out via an exclude glob.
    touch(&root, "sub-01/ses-1/func/sub-01_ses-1_task-rest_physio.tsv.gz");

    let mut config = AppConfig::default();
    config.exclude_patterns.push("**/*_physio.tsv.gz".to_string());
    let result = SessionCheck::new(config).run(&root, &SilentReporter).unwrap();

    let summary = IssueSummary::from_issues(&result.issues);
    assert_eq!(summary.count(IssueCode::InconsistentSubjects), 1);
    assert_eq!(summary.count(IssueCode::MissingSession), 1);
}

#[test]
fn test_complete_dataset_reports_nothing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    for subject in ["sub-a", "sub-b", "sub-c"] {
        touch(root, &format!("{0}/anat/{0}_T1w.nii", subject));
        touch(root, &format!("{0}/{0}_scans.tsv", subject));
    }

    let result = SessionCheck::new(AppConfig::default())
        .run(root, &SilentReporter)
        .unwrap();
    assert!(result.issues.is_empty());

    let mut out = Vec::new();
    write_report(&result.issues, OutputFormat::Json, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
}
