use agent_hooks::{
    FileResumeStore, GeminiConfig, GeminiModel, ModelBackend, ResumeRunner, ResumeStore, Session,
    TracingSink, llm_auditor,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::{
    io::{self, BufRead},
    sync::Arc,
};
use tracing::{info, warn};

mod cli;
mod config;
mod telemetry;

use crate::cli::{Cli, Command};
use crate::config::{Settings, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::new().context("failed to load configuration")?;
    if let Some(level) = cli.log {
        settings.logging.level = level;
    }
    telemetry::init(&settings.logging)?;

    let model = build_model(&settings)?;
    let sink = Arc::new(TracingSink);

    match cli.command {
        Command::Resume {
            session_id,
            user_id,
        } => {
            let info = read_input(io::stdin().lock())?;
            if info.is_empty() {
                println!("No candidate information provided.");
                return Ok(());
            }

            let store = open_store(&settings.storage);
            let runner = ResumeRunner::new(model, store, sink);
            let state = user_id.map(|user_id| json!({ "user_id": user_id }));
            let (response, session_id) = runner.run(&info, session_id, state).await?;

            println!("Session: {session_id}\n");
            println!("{}", response.text());
        },
        Command::Audit => {
            let text = read_input(io::stdin().lock())?;
            if text.is_empty() {
                println!("Nothing to audit.");
                return Ok(());
            }

            let auditor = llm_auditor(model, sink);
            let mut session = Session::default();
            let response = auditor.run(&mut session, text).await?;
            println!("{}", response.text());
        },
    }

    Ok(())
}

fn build_model(settings: &Settings) -> Result<Arc<dyn ModelBackend>> {
    let config = GeminiConfig::new(&settings.model.name, &settings.model.api_key)
        .with_base_url(&settings.model.base_url)
        .with_timeout(settings.model.timeout());
    let model = GeminiModel::new(config).context("set GOOGLE_API_KEY or model.api_key")?;
    info!(model = %settings.model.name, "Using Gemini backend");
    Ok(Arc::new(model))
}

/// Storage problems disable memory instead of aborting the run.
fn open_store(storage: &StorageConfig) -> Option<Arc<dyn ResumeStore>> {
    if !storage.enabled {
        return None;
    }
    match FileResumeStore::new(&storage.resume_dir) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(dir = %storage.resume_dir.display(), error = %e, "Resume memory disabled");
            None
        },
    }
}

/// Reads lines until the first empty line or EOF, trimmed.
///
/// Whitespace-only lines do not end the input.
fn read_input(reader: impl BufRead) -> Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}
