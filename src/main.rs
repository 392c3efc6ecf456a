use anyhow::{bail, Context, Result};
use clap::Parser;
use housing_estimator::client::{HttpPredictionClient, PredictionClient};
use housing_estimator::config::{Args, Config};
use housing_estimator::form::{form_from_json, PropertyForm, SubmitOutcome};
use housing_estimator::render;
use housing_estimator::session::{RequestOutcome, Session};
use housing_estimator::shell::Shell;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging; stderr keeps logs out of the panels
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(Args::parse())?;
    let client = Arc::new(HttpPredictionClient::with_config(config.client.clone())?);

    match (&config.input, config.edit) {
        (Some(path), false) => estimate_once(client.as_ref(), path).await,
        (Some(path), true) => {
            let form = load_form(path).await?;
            Shell::with_form(client, form).run().await?;
            Ok(ExitCode::SUCCESS)
        }
        (None, _) => {
            Shell::new(client).run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn load_form(path: &Path) -> Result<PropertyForm> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    info!("📄 Loaded property from {}", path.display());
    form_from_json(&json)
}

/// Validate the file, request one estimate and print the panel
async fn estimate_once(client: &dyn PredictionClient, path: &Path) -> Result<ExitCode> {
    let mut form = load_form(path).await?;

    let attributes = match form.submit(false) {
        SubmitOutcome::Ready(attributes) => attributes,
        SubmitOutcome::Invalid(errors) => {
            error!("{} has {} invalid field(s)", path.display(), errors.len());
            eprint!("{}", render::render_field_errors(errors.iter()));
            return Ok(ExitCode::FAILURE);
        }
        SubmitOutcome::Blocked => bail!("A prediction is already in flight"),
    };

    let mut session = Session::new();
    let succeeded = matches!(
        session.run(client, attributes).await,
        RequestOutcome::Success(_)
    );
    print!("{}", render::render_outcome(&session));

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
