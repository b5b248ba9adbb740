use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use docforge_app_core::ports::AuthRepo;
use docforge_app_core::AuthFileStore;
use docforge_client::{default_engine, ChannelSignal, ServiceEndpoint};
use docforge_core::{
    AuthContext, GenerationOutcome, GenerationRequest, ProgressEvent, RepoTarget,
};

pub fn cmd_login(token: String, user_id: String) -> Result<()> {
    let ctx = AuthContext::new(token, user_id);
    if !ctx.is_complete() {
        anyhow::bail!("Token and user id must be non-empty");
    }
    AuthFileStore::new().save(&ctx)?;
    println!(":: Logged in as {}", ctx.user_id);
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    AuthFileStore::new().clear()?;
    println!(":: Logged out");
    Ok(())
}

pub fn cmd_whoami() -> Result<()> {
    match AuthFileStore::new().load()? {
        Some(ctx) => println!(":: Logged in as {}", ctx.user_id),
        None => println!(":: Not logged in"),
    }
    Ok(())
}

pub fn load_auth() -> Result<AuthContext> {
    AuthFileStore::new()
        .load()?
        .context("Not logged in. Run `docforge login` first")
}

/// Run one generation session end to end: submit, render progress, write
/// the documentation payload. Returns the terminal outcome so the caller
/// decides the exit status.
pub async fn cmd_generate(
    auth: AuthContext,
    owner: String,
    repo: String,
    include_tests: bool,
    out: Option<Utf8PathBuf>,
    service_url: &str,
) -> Result<GenerationOutcome> {
    let target = RepoTarget::new(owner, repo);
    println!(":: Generating documentation for {}", target.slug());

    let endpoint = ServiceEndpoint::parse(service_url)?;
    let client = docforge_transport::default_http_client()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;
    let engine = default_engine(client, endpoint);

    let request = GenerationRequest::new(target.clone(), auth, include_tests);
    let mut handle = engine.submit(request).await?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(docforge_config::UI_TICK_MILLIS));

    let mut latest = ProgressEvent::default();
    loop {
        match handle.channel.recv().await {
            Some(ChannelSignal::Frame(frame)) => {
                latest.absorb(&frame);
                pb.set_position(docforge_config::clamp_percent(latest.percent) as u64);
                let msg = match &latest.current_file {
                    Some(file) => format!("{} ({file})", latest.message),
                    None => latest.message.clone(),
                };
                pb.set_message(msg);
            }
            Some(ChannelSignal::Error(e)) => {
                pb.set_message(format!("progress stream lost ({e}); still waiting"));
                break;
            }
            Some(ChannelSignal::Ended) | None => break,
        }
    }

    let outcome = handle.outcome().await;
    match &outcome {
        GenerationOutcome::Success(doc) => {
            pb.finish_with_message("Generation complete.");
            let json = serde_json::to_string_pretty(doc)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {path}"))?;
                    println!(":: Saved documentation to {path}");
                }
                None => println!("{json}"),
            }
        }
        GenerationOutcome::PaymentRequired => {
            pb.abandon_with_message("Out of credits.");
        }
        GenerationOutcome::Failure(reason) => {
            pb.abandon_with_message(format!("Generation failed: {reason}"));
        }
    }

    Ok(outcome)
}
