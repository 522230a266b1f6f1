use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ingest::FileReader;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::report::AnalysisReport;
use crate::state::AppState;

/// Privacy policy analyzer. Serves the HTTP API unless a command is given.
#[derive(Parser, Debug)]
#[command(name = "privacy-analyzer")]
#[command(version)]
#[command(about = "Analyze privacy policies over HTTP or from local files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Analyze a policy file, or every .txt/.html file in a directory, and print JSON reports
    Analyze {
        /// File or directory to analyze
        path: PathBuf,
    },
}

#[derive(Serialize)]
pub struct FileReport {
    pub source: String,
    pub report: AnalysisReport,
}

/// Analyze a local policy file, or every supported file in a directory.
pub async fn analyze_path(state: &AppState, path: &Path) -> Result<Vec<FileReport>> {
    let documents = if path.is_dir() {
        FileReader::read_directory(path).await?
    } else {
        let text = FileReader::read_file(path).await?;
        vec![(path.to_string_lossy().to_string(), text)]
    };

    let mut reports = Vec::with_capacity(documents.len());
    for (source, text) in documents {
        let run = state
            .analyzer
            .analyze_text(&text)
            .await
            .with_context(|| format!("Failed to analyze {source}"))?;
        state.metrics.record_analysis(&run);

        reports.push(FileReport {
            source,
            report: AnalysisReport::from_run(None, run),
        });
    }

    Ok(reports)
}
