use anyhow::Result;
use capivara::{AuthResponse, AuthService, Config, SessionState, SignupForm};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Demonstration signup/login flow backed by a local key-value store.
#[derive(Parser, Debug)]
#[command(name = "capivara", version, about)]
struct Cli {
    /// Config file (default: <config dir>/capivara/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the simulated latency, in milliseconds
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(flatten)]
    Auth(AuthCommand),
}

/// Commands that run against the configured store.
#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password confirmation (must equal --password)
        #[arg(long)]
        confirm_password: String,
    },
    /// Log in; the account email becomes the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the session token
    Logout,
    /// Show whether a session token is present
    Status,
    /// Open the protected dashboard (fails without a session)
    Dashboard,
    /// List seed and registered accounts
    Users,
    /// Remove registered accounts and the session token
    Reset,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the JSON Schema of the config file
    Schema,
    /// Write the default configuration to the config path
    Init,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("capivara=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ms) = cli.latency_ms {
        config.auth.latency_ms = ms;
    }

    match cli.command {
        Commands::Config { action } => run_config(&action, &config, cli.config),
        Commands::Auth(command) => run_auth(command, &config.build_service()?, cli.json).await,
    }
}

async fn run_auth(command: AuthCommand, service: &AuthService, json: bool) -> Result<ExitCode> {
    let code = match command {
        AuthCommand::Signup {
            username,
            email,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                username,
                email,
                password,
                confirm_password,
            };
            report(&service.signup(&form).await, json)?
        }
        AuthCommand::Login { username, password } => {
            report(&service.authenticate(&username, &password).await, json)?
        }
        AuthCommand::Logout => {
            service.logout();
            println!("Logged out");
            ExitCode::SUCCESS
        }
        AuthCommand::Status => match service.session_state() {
            SessionState::Authenticated(token) => {
                println!("Authenticated as {token}");
                ExitCode::SUCCESS
            }
            SessionState::Anonymous => {
                println!("Anonymous");
                ExitCode::FAILURE
            }
        },
        AuthCommand::Dashboard => match service.require_session() {
            Ok(token) => {
                // Same placeholder wait the dashboard shows while "loading"
                tokio::time::sleep(service.latency() + service.latency() / 2).await;
                println!("Dashboard");
                println!("Logged in as {token}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}; redirecting to login");
                ExitCode::FAILURE
            }
        },
        AuthCommand::Users => {
            let users = service.all_registered_users();
            if json {
                let listed: Vec<_> = users
                    .iter()
                    .map(|u| serde_json::json!({ "username": u.username, "email": u.email }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for u in &users {
                    println!("{:<20} {}", u.username, u.email);
                }
            }
            ExitCode::SUCCESS
        }
        AuthCommand::Reset => {
            service.clear_auth_data();
            println!("Auth data cleared");
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn report(response: &AuthResponse, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else if response.success {
        println!("{}", response.message);
    } else {
        eprintln!("{}", response.message);
    }
    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_config(action: &ConfigAction, config: &Config, path: Option<PathBuf>) -> Result<ExitCode> {
    match action {
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Schema => println!("{}", Config::json_schema()?),
        ConfigAction::Init => {
            let Some(path) = path.or_else(capivara::config::default_config_path) else {
                anyhow::bail!("No config path given and no home directory found");
            };
            Config::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_subcommand_parses_to_config_variant() {
        let cli = Cli::try_parse_from(["capivara", "config", "schema"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Schema
            }
        ));
    }

    #[test]
    fn auth_subcommands_parse_at_top_level() {
        let cli =
            Cli::try_parse_from(["capivara", "login", "--username", "a", "--password", "b"])
                .unwrap();
        match cli.command {
            Commands::Auth(AuthCommand::Login { username, password }) => {
                assert_eq!(username, "a");
                assert_eq!(password, "b");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["capivara", "--json", "status"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Auth(AuthCommand::Status)));
    }
}
