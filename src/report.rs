use crate::error::Error;
use crate::issue::{Issue, IssueCode};
use colored::*;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Issue counts per code.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IssueSummary {
    pub by_code: BTreeMap<IssueCode, usize>,
}

impl IssueSummary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            *summary.by_code.entry(issue.code).or_default() += 1;
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.by_code.values().sum()
    }

    pub fn count(&self, code: IssueCode) -> usize {
        self.by_code.get(&code).copied().unwrap_or(0)
    }
}

pub fn write_report<W: Write>(
    issues: &[Issue],
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), Error> {
    match format {
        OutputFormat::Text => write_text(issues, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, issues)?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(issues, writer),
    }
}

fn write_text<W: Write>(issues: &[Issue], writer: &mut W) -> Result<(), Error> {
    for issue in issues {
        writeln!(
            writer,
            "{} {} {}: {}",
            format!("[{}]", issue.code.code()).yellow(),
            issue.code.key().bold(),
            issue.path().unwrap_or_default().cyan(),
            issue.message(),
        )?;
    }

    let summary = IssueSummary::from_issues(issues);
    if summary.total() == 0 {
        writeln!(writer, "{}", "No session consistency issues found.".green())?;
    } else {
        writeln!(
            writer,
            "{} issues: {} missing files, {} missing sessions",
            format!("{}", summary.total()).red(),
            summary.count(IssueCode::InconsistentSubjects),
            summary.count(IssueCode::MissingSession),
        )?;
    }
    Ok(())
}

fn write_csv<W: Write>(issues: &[Issue], writer: &mut W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["code", "key", "severity", "path", "message"])?;
    for issue in issues {
        csv_writer.write_record([
            issue.code.code().to_string().as_str(),
            issue.code.key(),
            issue.code.severity().to_string().as_str(),
            issue.path().unwrap_or_default(),
            issue.message(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
