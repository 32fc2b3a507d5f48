mod api;
mod cli_messages;
mod commands;
mod config;
mod consts;
mod environment;
mod events;
mod logging;
mod notify;
mod panels;
mod polling;
mod session;
mod ui;

use crate::commands::{CommandError, UpstreamAction};
use crate::config::{Config, get_config_path};
use crate::environment::{ApiPrefix, Environment};
use crate::panels::Panel;
use crate::session::setup::Credentials;
use crate::session::{SessionData, run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal dashboard for the goaway DNS server
struct Args {
    /// Base URL of the goaway server, e.g. http://192.168.1.2:8080
    #[arg(long, global = true, env = "GOAWAY_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Path prefix the server serves its API under
    #[arg(long, global = true, value_enum)]
    api_prefix: Option<ApiPrefix>,

    /// Username to log in with
    #[arg(long, global = true, env = "GOAWAY_USERNAME")]
    username: Option<String>,

    /// Password to log in with
    #[arg(long, global = true, env = "GOAWAY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive dashboard (default)
    Dashboard {
        /// Disable background colors
        #[arg(long, default_value = "false")]
        no_background_color: bool,
    },
    /// Print the metrics line and notifications until Ctrl+C
    Watch,
    /// Fetch one panel and print it
    Show {
        #[arg(value_enum)]
        panel: Panel,
    },
    /// Add domains to the custom blocklist
    Block {
        #[arg(required = true, value_name = "DOMAIN")]
        domains: Vec<String>,
    },
    /// Add, remove or prefer an upstream resolver
    Upstream {
        #[arg(value_enum)]
        action: UpstreamAction,
        /// Upstream address, e.g. 1.1.1.1:53
        upstream: String,
    },
    /// Save --api-url and --api-prefix to the config file
    Configure,
    /// Delete the config file
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Dashboard {
        no_background_color: false,
    });

    // The TUI owns the terminal; everything else logs to stderr.
    if !matches!(command, Command::Dashboard { .. }) {
        logging::init_console_logger();
    }

    let config_path = get_config_path()?;
    match command {
        Command::Configure => {
            return configure(&config_path, args.api_url, args.api_prefix);
        }
        Command::Reset => {
            println!("Clearing dashboard configuration...");
            Config::clear(&config_path)?;
            print_cmd_success!("Configuration removed", "{}", config_path.display());
            return Ok(());
        }
        _ => {}
    }

    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            print_cmd_warn!("Ignoring config file", "{}", e);
            Config::default()
        }
    };
    let environment =
        match Environment::resolve([args.api_url.as_deref(), config.api_url.as_deref()]) {
            Ok(environment) => environment,
            Err(e) => {
                print_cmd_error!("Cannot start", e.to_string().as_str());
                return Err(e.into());
            }
        };
    let prefix = args.api_prefix.unwrap_or(config.api_prefix);
    let credentials = Credentials::from_parts(args.username.clone(), args.password);

    let mut session = match setup_session(environment, prefix, args.username, credentials).await {
        Ok(session) => session,
        Err(e) => {
            print_cmd_error!("Failed to start session", e.to_string().as_str());
            return Err(e);
        }
    };

    match command {
        Command::Dashboard {
            no_background_color,
        } => run_tui_mode(session, !no_background_color).await,
        Command::Watch => run_headless_mode(session).await,
        Command::Show { panel } => {
            let outcome = commands::show(session.api.as_ref(), panel).await;
            finish(&mut session, outcome.map(|lines| lines.join("\n")), false)
        }
        Command::Block { domains } => {
            let outcome = commands::block(session.api.as_ref(), &domains).await;
            finish(&mut session, outcome, true)
        }
        Command::Upstream { action, upstream } => {
            let outcome = commands::upstream(session.api.as_ref(), action, &upstream).await;
            finish(&mut session, outcome, true)
        }
        Command::Configure | Command::Reset => Ok(()),
    }
}

/// Prints queued notifications, then the command's outcome.
fn finish(
    session: &mut SessionData,
    outcome: Result<String, CommandError>,
    mutation: bool,
) -> Result<(), Box<dyn Error>> {
    for event in session.drain_notifications() {
        cli_messages::print_notification(&event);
    }
    match outcome {
        Ok(output) if mutation => {
            print_cmd_success!(&output, "");
            Ok(())
        }
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            print_cmd_error!("Request failed", e.to_string().as_str());
            Err(e.into())
        }
    }
}

fn configure(
    config_path: &Path,
    api_url: Option<String>,
    api_prefix: Option<ApiPrefix>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default(config_path).unwrap_or_default();
    if let Some(api_url) = api_url {
        api_url.parse::<Environment>()?;
        config.api_url = Some(api_url.trim_end_matches('/').to_string());
    }
    if let Some(api_prefix) = api_prefix {
        config.api_prefix = api_prefix;
    }
    config
        .save(config_path)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    print_cmd_success!("Configuration saved", "{}", config_path.display());
    Ok(())
}
