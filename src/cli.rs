//! Command-line surface: run the launch resolution chain headlessly,
//! inspect persisted state, or wipe it.

use crate::attribution::HttpMetricsClient;
use crate::config::Config;
use crate::launch::{
    AppIdentity, LaunchCoordinator, LaunchDecision, LaunchDeps, LaunchTiming, TokioDelay,
};
use crate::permissions::{PermissionResolver, StaticPrompt};
use crate::records::{ChickenRoster, EggLog, ReminderBook};
use crate::remote_config::HttpFlagSource;
use crate::store::{JsonFileStore, LaunchStateStore};
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

/// `countbook` - ChickenCountbook's launch resolution, without the shell.
#[derive(Parser, Debug)]
#[command(name = "countbook")]
#[command(version = "0.1.0")]
#[command(about = "Launch attribution and flock records for ChickenCountbook.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one cold-start resolution and print the decision
    Resolve {
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show persisted launch state and record counts
    Status,

    /// Clear persisted state (everything unless narrowed by flags)
    Reset {
        /// Clear only the launch keys (feature flag + saved destination)
        #[arg(long)]
        launch: bool,

        /// Clear only flock records (chickens, eggs, reminders)
        #[arg(long)]
        records: bool,
    },
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Resolve { json } => resolve(&config, json).await,
        Commands::Status => {
            println!("{}", render_status(&config));
            Ok(())
        }
        Commands::Reset { launch, records } => reset(&config, launch, records),
    }
}

async fn resolve(config: &Config, json: bool) -> Result<()> {
    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::open(config.state_path()));
    let timer = Arc::new(TokioDelay);
    let prompt = Arc::new(StaticPrompt::new(config.permissions.clone()));
    let permissions = Arc::new(PermissionResolver::new(
        prompt,
        timer.clone(),
        Duration::from_millis(config.timing.tracking_retry_ms),
    ));

    let coordinator = LaunchCoordinator::new(LaunchDeps {
        store: LaunchStateStore::new(store),
        flags: Arc::new(HttpFlagSource::new(
            &config.remote_config.endpoint,
            config.remote_config.http_timeout_secs,
        )),
        flag_key: config.remote_config.flag_key.clone(),
        permissions,
        metrics: Arc::new(HttpMetricsClient::new(
            &config.attribution.metrics_url,
            &config.attribution.salt,
            config.attribution.http_timeout_secs,
        )),
        timer,
        identity: AppIdentity::from_config(config),
        timing: LaunchTiming::from_config(&config.timing),
    });

    let decision = coordinator.run().await;

    if json {
        let value = match &decision {
            LaunchDecision::WebView(url) => json!({
                "decision": "web_view",
                "url": url.as_str(),
            }),
            LaunchDecision::App => json!({ "decision": "app" }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match &decision {
            LaunchDecision::WebView(url) => println!("web view: {url}"),
            LaunchDecision::App => println!("app"),
        }
    }
    Ok(())
}

fn render_status(config: &Config) -> String {
    let kv: Arc<JsonFileStore> = Arc::new(JsonFileStore::open(config.state_path()));
    let launch = LaunchStateStore::new(kv.clone());
    let roster = ChickenRoster::open(kv.clone());
    let eggs = EggLog::open(kv.clone());
    let reminders = ReminderBook::open(kv);

    let mut out = String::new();
    let _ = writeln!(out, "State file: {}", config.state_path().display());
    let _ = writeln!(
        out,
        "Feature flag: {}",
        match launch.feature_enabled() {
            Some(true) => "enabled",
            Some(false) => "disabled",
            None => "not yet fetched",
        }
    );
    let _ = writeln!(
        out,
        "Saved destination: {}",
        launch.saved_destination().as_deref().unwrap_or("none")
    );
    let _ = writeln!(out, "Chickens: {}", roster.chickens().len());
    let _ = writeln!(
        out,
        "Eggs logged: {} across {} entries",
        eggs.total_quantity(),
        eggs.entries().len()
    );
    let _ = write!(
        out,
        "Reminders: {} pending of {}",
        reminders.pending_count(),
        reminders.reminders().len()
    );
    out
}

fn reset(config: &Config, launch: bool, records: bool) -> Result<()> {
    // no flags means wipe everything
    let all = !launch && !records;
    let kv: Arc<JsonFileStore> = Arc::new(JsonFileStore::open(config.state_path()));

    if launch || all {
        LaunchStateStore::new(kv.clone()).clear()?;
        println!("Cleared launch state");
    }
    if records || all {
        ChickenRoster::open(kv.clone()).clear()?;
        EggLog::open(kv.clone()).clear()?;
        ReminderBook::open(kv).clear()?;
        println!("Cleared flock records");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_resolve_with_json() {
        let cli = Cli::try_parse_from(["countbook", "resolve", "--json"]).expect("parse");
        match cli.command {
            Commands::Resolve { json } => assert!(json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_reset_flags() {
        let cli = Cli::try_parse_from(["countbook", "reset", "--launch"]).expect("parse");
        match cli.command {
            Commands::Reset { launch, records } => {
                assert!(launch);
                assert!(!records);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_subcommands() {
        assert!(Cli::try_parse_from(["countbook", "migrate"]).is_err());
    }

    #[test]
    fn status_renders_empty_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            workspace_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let rendered = render_status(&config);
        assert!(rendered.contains("Feature flag: not yet fetched"));
        assert!(rendered.contains("Saved destination: none"));
        assert!(rendered.contains("Chickens: 0"));
    }
}
