use crate::classify::{FileEntry, GlobClassifier, LayoutClassifier};
use crate::config::AppConfig;
use crate::discrepancy::report_discrepancies;
use crate::error::Error;
use crate::expected::build_expected_sets;
use crate::group::group_files;
use crate::issue::Issue;
use crate::progress::ProgressReporter;
use crate::scanner;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Cross-subject completeness check over a flat file listing.
///
/// Pure function of its input: classify and group the entries, derive the
/// dataset-wide expected sessions and names, then diff every subject
/// against them. Only classifier failures are returned as errors.
pub fn check_sessions<C: LayoutClassifier + ?Sized>(
    files: &[FileEntry],
    classifier: &C,
    config: &AppConfig,
) -> Result<Vec<Issue>, Error> {
    checked(files, classifier, config).map(|(_, issues)| issues)
}

/// Subject count alongside the issues.
fn checked<C: LayoutClassifier + ?Sized>(
    files: &[FileEntry],
    classifier: &C,
    config: &AppConfig,
) -> Result<(usize, Vec<Issue>), Error> {
    let groups = group_files(files, classifier, config)?;
    if groups.is_empty() {
        return Ok((0, Vec::new()));
    }

    let expected = build_expected_sets(&groups);
    debug!(
        "{} subjects, {} session labels, {} expected files",
        groups.subject_count(),
        expected.session_labels.len(),
        expected.files.len(),
    );

    let issues = report_discrepancies(&groups, &expected, &config.default_session_label);
    Ok((groups.subject_count(), issues))
}

pub struct SessionCheck {
    config: AppConfig,
}

#[derive(Debug)]
pub struct CheckResult {
    pub scan_duration: Duration,
    pub check_duration: Duration,
    pub total_files: usize,
    pub subjects: usize,
    pub issues: Vec<Issue>,
}

impl SessionCheck {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Walk `root` and check it with the configured glob classifier.
    pub fn run(&self, root: &Path, reporter: &dyn ProgressReporter) -> Result<CheckResult, Error> {
        let classifier = GlobClassifier::from_config(&self.config)?;
        self.run_with(root, &classifier, reporter)
    }

    pub fn run_with(
        &self,
        root: &Path,
        classifier: &dyn LayoutClassifier,
        reporter: &dyn ProgressReporter,
    ) -> Result<CheckResult, Error> {
        info!("Listing files under {}", root.display());
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let files = scanner::list_dataset_files(root, &self.config.ignore_patterns, reporter)?;
        let scan_duration = scan_start.elapsed();
        reporter.on_scan_complete(files.len(), scan_duration.as_secs_f64());

        info!("Checking {} files for missing sessions and files...", files.len());
        let check_start = Instant::now();
        let (subjects, issues) = checked(&files, classifier, &self.config)?;
        let check_duration = check_start.elapsed();
        reporter.on_check_complete(subjects, issues.len(), check_duration.as_secs_f64());
        debug!(
            "Check completed in {:.2}s: {} issues",
            check_duration.as_secs_f64(),
            issues.len()
        );

        Ok(CheckResult {
            scan_duration,
            check_duration,
            total_files: files.len(),
            subjects,
            issues,
        })
    }
}
