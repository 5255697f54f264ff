//! Output formatting for travel briefings
//!
//! Human output is the summary under a banner. JSON and YAML emit a small
//! document with the destination, summary and trace file location.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::pipeline::TravelReport;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    destination: &'a str,
    summary: &'a str,
    trace_file: String,
}

/// Output formatter for travel reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &TravelReport, trace_path: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(report, trace_path),
            OutputFormat::Yaml => self.format_yaml(report, trace_path),
            OutputFormat::Human => Ok(self.format_human(report, trace_path)),
        }
    }

    fn document<'a>(report: &'a TravelReport, trace_path: &Path) -> ReportDocument<'a> {
        ReportDocument {
            destination: &report.destination,
            summary: &report.summary,
            trace_file: trace_path.display().to_string(),
        }
    }

    fn format_json(&self, report: &TravelReport, trace_path: &Path) -> Result<String> {
        serde_json::to_string_pretty(&Self::document(report, trace_path))
            .context("Failed to serialize travel report to JSON")
    }

    fn format_yaml(&self, report: &TravelReport, trace_path: &Path) -> Result<String> {
        serde_yaml::to_string(&Self::document(report, trace_path))
            .context("Failed to serialize travel report to YAML")
    }

    fn format_human(&self, report: &TravelReport, trace_path: &Path) -> String {
        format!(
            "\n=== Travel Assistant Result ===\n\n{}\n\nSaved raw agent output to: {}",
            report.summary.trim_end(),
            trace_path.display()
        )
    }
}
