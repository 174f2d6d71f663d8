//! CLI entry point for the promotion planner.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use promo_planner::config::{
    FileConfig, VerbositySetting, load_default_file_config, resolve_webhook,
};
use promo_planner::fetch::WEBHOOK_ENV_VAR;
use promo_planner::fetch::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, READ_TIMEOUT_SECS,
};
use promo_planner::{
    DEFAULT_CACHE_TTL, FetchError, PayloadCache, PayloadSource, PromoPlanner, RawPayload,
    RegionReport, RetryPolicy, StaticSource, WebhookClient, extract_year_month,
};
use tracing::{debug, info};

mod cli;
mod output;

use cli::{Args, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = load_default_file_config();
    let file_config = loaded
        .as_ref()
        .ok()
        .and_then(|loaded| loaded.config.clone())
        .unwrap_or_default();

    init_tracing(&args, file_config.verbosity);
    let loaded = loaded?;
    debug!(?args, config_path = ?loaded.path, from_file = loaded.loaded_from_file(), "CLI arguments parsed");

    let today = chrono::Local::now().format("%Y-%m").to_string();
    let target_ym = extract_year_month(args.month.as_deref().unwrap_or_default(), &today);
    let region = args.region.or(file_config.region).unwrap_or_default();
    info!(target_ym = %target_ym, region = %region, "planning promotions");

    let source = build_source(&args, &file_config)?;
    let cache_ttl = file_config
        .cache_ttl_secs
        .map_or(DEFAULT_CACHE_TTL, Duration::from_secs);
    let planner = PromoPlanner::with_cache(source, Arc::new(PayloadCache::new(cache_ttl)));

    let canonical = planner
        .load(&target_ym)
        .await
        .with_context(|| format!("데이터 수집 실패 ({target_ym})"))?;
    let report = RegionReport::build(&canonical, &target_ym, region.as_str());

    match args.format {
        OutputFormat::Text => {
            print!("{}", output::render_text(&report));
            if args.raw {
                println!("\n== 🔎 Raw JSON ==");
                println!("{}", serde_json::to_string_pretty(&canonical.raw)?);
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&report)?;
            if args.raw
                && let Some(object) = value.as_object_mut()
            {
                object.insert(
                    "raw".to_string(),
                    serde_json::Value::Object(canonical.raw.clone()),
                );
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Installs the subscriber. Priority: RUST_LOG > -q > -v > config verbosity > info.
fn init_tracing(args: &Args, configured: Option<VerbositySetting>) {
    let default_level = if args.quiet {
        "error"
    } else {
        match (args.verbose, configured) {
            (0, Some(VerbositySetting::Quiet)) => "error",
            (0, Some(VerbositySetting::Verbose)) | (1, _) => "debug",
            (0, Some(VerbositySetting::Debug)) => "trace",
            (0, _) => "info",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_source(args: &Args, file_config: &FileConfig) -> Result<Arc<dyn PayloadSource>> {
    if let Some(path) = &args.input {
        let text = read_input(path)?;
        info!(bytes = text.len(), "using payload from input");
        return Ok(Arc::new(StaticSource::new(RawPayload::from(text))));
    }

    let env_webhook = env::var(WEBHOOK_ENV_VAR).ok();
    let webhook = resolve_webhook(
        args.webhook.as_deref(),
        env_webhook.as_deref(),
        Some(file_config),
    )
    .ok_or(FetchError::MissingWebhook)?;

    let max_retries = args
        .max_retries
        .or(file_config.max_retries)
        .map_or(DEFAULT_MAX_RETRIES, u32::from);
    let client = WebhookClient::with_settings(
        &webhook,
        Duration::from_secs(file_config.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS)),
        Duration::from_secs(file_config.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS)),
        RetryPolicy::with_max_retries(max_retries),
    )?;
    Ok(Arc::new(client))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read payload from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file '{}'", path.display()))
}
