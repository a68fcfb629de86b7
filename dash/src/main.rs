//! lepdash - Entry Point
//!
//! Watches deployments of a Lepton workspace from the terminal.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use colored::Colorize;
use secrecy::SecretString;
use tracing::{error, info};

use lepdash::app::options::{AppOptions, Mode, WorkspaceOptions};
use lepdash::app::run::run;
use lepdash::filesys::file::File;
use lepdash::logs::{init_logging, LogOptions};
use lepdash::storage::layout::StorageLayout;
use lepdash::storage::settings::Settings;
use lepdash::utils::version_info;
use lepdash::workers::refresher;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("{e}"),
        }
        return;
    }

    let layout = StorageLayout::default();
    let settings_file = match cli_args.get("settings") {
        Some(path) => File::new(path),
        None => layout.settings_file(),
    };
    let settings = match Settings::load(&settings_file).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}: {e}", "Unable to read settings".red(), settings_file.path().display());
            std::process::exit(1);
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level,
        log_dir: Some(layout.logs_dir()),
        json_format: settings.log_json,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let mode = match select_mode(&cli_args) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{}", message.red());
            std::process::exit(2);
        }
    };

    if !settings.workspace.is_configured() {
        eprintln!(
            "{} set workspace.id and workspace.url in {}",
            "No workspace configured:".red(),
            settings_file.path().display()
        );
        std::process::exit(1);
    }

    let interval = cli_args
        .get("interval")
        .and_then(|v| v.parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| settings.refresh_interval());

    let options = AppOptions {
        workspace: WorkspaceOptions {
            id: settings.workspace.id.clone(),
            url: settings.workspace.url.clone(),
            token: settings.workspace.token.as_ref().map(|t| {
                use secrecy::ExposeSecret;
                SecretString::from(t.expose_secret().to_string())
            }),
        },
        mode,
        request_timeout: settings.request_timeout(),
        refresher: refresher::Options {
            interval,
            initial_delay: interval,
        },
        ..Default::default()
    };

    info!("Running lepdash {} with options: {:?}", version.version, options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Session failed: {e}");
        eprintln!("{} {}", "Error:".red(), e.message());
        std::process::exit(1);
    }
}

fn select_mode(cli_args: &HashMap<String, String>) -> Result<Mode, String> {
    let deployment = cli_args.get("deployment").cloned();
    let replica = cli_args.get("replica").cloned();

    if cli_args.contains_key("logs") {
        return match (deployment, replica) {
            (Some(deployment_id), Some(replica_id)) => Ok(Mode::TailLog {
                deployment_id,
                replica_id,
            }),
            _ => Err("--logs needs --deployment=<id> and --replica=<id>".to_string()),
        };
    }

    if cli_args.contains_key("list") {
        return Ok(Mode::ListDeployments);
    }

    match deployment {
        Some(deployment_id) => Ok(Mode::WatchReplicas {
            deployment_id,
            expand: cli_args
                .get("expand")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }),
        None => Ok(Mode::ListDeployments),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
