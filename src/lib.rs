pub mod classify;
pub mod config;
pub mod discrepancy;
pub mod engine;
pub mod error;
pub mod expected;
pub mod group;
pub mod issue;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod scanner;

pub use classify::{FileEntry, GlobClassifier, LayoutClassifier};
pub use crate::config::AppConfig;
pub use engine::{check_sessions, CheckResult, SessionCheck};
pub use error::Error;
pub use issue::{Issue, IssueCode, IssueFile};
pub use progress::{ProgressReporter, SilentReporter};
