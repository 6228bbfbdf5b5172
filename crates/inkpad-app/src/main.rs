// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inkpad — headless signing
//
// Entry point. Initialises logging, loads a document into an editor session,
// replays a recorded input script over it and writes the export next to it.

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use inkpad_core::error::Result;
use inkpad_core::human_errors::humanize_error;
use inkpad_core::{DocumentType, EditorConfig};
use inkpad_document::BasicRenderer;
use inkpad_engine::EditorSession;

use services::output::write_artifact;
use services::replay::{parse_script, replay};

/// Inkpad headless signer.
///
/// Loads a document, replays a recorded input script over it and writes the
/// signed export into the output directory.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "inkpad", about = "Inkpad headless signing over images and PDFs")]
struct Options {
    /// Editor configuration (JSON). Defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Document to sign (PDF or image). Without one a standalone mark is exported.
    #[arg(long, value_name = "FILE")]
    document: Option<PathBuf>,

    /// Input script (JSON list of steps) to replay.
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Directory the export is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse();

    tracing::info!("Inkpad starting");

    match run(options).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "signing failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(options: Options) -> Result<PathBuf> {
    let config = match &options.config {
        Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };

    let mut session = EditorSession::new(config, BasicRenderer::new());

    if let Some(path) = &options.document {
        let bytes = tokio::fs::read(path).await?;
        session.load_document(bytes, declared_mime(path)).await?;
    }

    if let Some(path) = &options.events {
        let steps = parse_script(&tokio::fs::read_to_string(path).await?)?;
        let summary = replay(&mut session, steps).await?;
        tracing::info!(
            steps = summary.steps_run,
            redraws = summary.redraws,
            dismissed = summary.dismissed,
            "script replayed"
        );
    }

    let artifact = session.export().await?;
    write_artifact(&options.out, &artifact)
}

/// MIME type implied by the file extension, if it is one we know.
fn declared_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    DocumentType::from_extension(ext).map(|kind| kind.mime_type())
}
