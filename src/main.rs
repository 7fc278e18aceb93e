use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, ValueEnum};
use manila_cli::api::auth::{Credentials, PasswordAuth};
use manila_cli::api::client::ShareClient;
use manila_cli::api::http::HttpOptions;
use manila_cli::api::version::ApiVersion;
use manila_cli::commands::{self, Commands};
use manila_cli::config::{pick, Config};
use manila_cli::output::{render, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Command-line client for shared file systems
#[derive(Parser, Debug)]
#[command(name = "manila", version = manila_cli::VERSION, about, long_about = None)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct ConnectionArgs {
    /// Keystone v3 URL
    #[arg(long, env = "OS_AUTH_URL", global = true)]
    os_auth_url: Option<String>,

    #[arg(long, env = "OS_USERNAME", global = true)]
    os_username: Option<String>,

    #[arg(long, env = "OS_PASSWORD", global = true, hide_env_values = true)]
    os_password: Option<String>,

    #[arg(long, env = "OS_PROJECT_NAME", global = true)]
    os_project_name: Option<String>,

    #[arg(long, env = "OS_USER_DOMAIN_NAME", global = true)]
    os_user_domain_name: Option<String>,

    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME", global = true)]
    os_project_domain_name: Option<String>,

    #[arg(long, env = "OS_REGION_NAME", global = true)]
    os_region_name: Option<String>,

    /// Pre-issued token; requires --os-share-endpoint
    #[arg(long, env = "OS_AUTH_TOKEN", global = true, hide_env_values = true)]
    os_auth_token: Option<String>,

    /// Share API endpoint, skipping the service catalog
    #[arg(long, env = "OS_SHARE_ENDPOINT", global = true)]
    os_share_endpoint: Option<String>,

    /// Requested API microversion, e.g. 2.36
    #[arg(long, env = "OS_SHARE_API_VERSION", global = true)]
    os_share_api_version: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// RUST_LOG wins over --log-level when set
fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("manila started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

/// Token auth when a token is given, Keystone password auth otherwise
fn build_credentials(args: &ConnectionArgs, config: &Config) -> Result<Credentials> {
    let endpoint = pick(&args.os_share_endpoint, &config.endpoint);

    if let Some(token) = &args.os_auth_token {
        let Some(endpoint) = endpoint else {
            bail!("--os-auth-token requires --os-share-endpoint (or OS_SHARE_ENDPOINT)");
        };
        return Ok(Credentials::Token {
            token: token.clone(),
            endpoint,
        });
    }

    let auth_url = pick(&args.os_auth_url, &config.auth_url)
        .context("Missing auth URL: set --os-auth-url or OS_AUTH_URL")?;
    let username = pick(&args.os_username, &config.username)
        .context("Missing user name: set --os-username or OS_USERNAME")?;
    let password = args
        .os_password
        .clone()
        .context("Missing password: set --os-password or OS_PASSWORD")?;
    let project_name = pick(&args.os_project_name, &config.project_name)
        .context("Missing project: set --os-project-name or OS_PROJECT_NAME")?;

    Ok(Credentials::Password(PasswordAuth {
        auth_url,
        username,
        password,
        project_name,
        user_domain_name: args
            .os_user_domain_name
            .clone()
            .unwrap_or_else(|| config.effective_user_domain()),
        project_domain_name: args
            .os_project_domain_name
            .clone()
            .unwrap_or_else(|| config.effective_project_domain()),
        region_name: pick(&args.os_region_name, &config.region_name),
        endpoint_override: endpoint,
    }))
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let credentials = build_credentials(&args.connection, &config)?;
    tracing::debug!("Credentials: {:?}", credentials);

    let requested_version = pick(&args.connection.os_share_api_version, &config.api_version)
        .map(|v| v.parse::<ApiVersion>())
        .transpose()?;

    let options = HttpOptions {
        timeout: Duration::from_secs(config.effective_timeout_secs()),
        insecure: args.connection.insecure || config.insecure.unwrap_or(false),
    };

    let client = ShareClient::connect(&credentials, requested_version, &options).await?;
    let output = commands::run(args.command, &client).await?;

    print!("{}", render(&output, args.format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level, args.log_file.as_ref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Command failed: {err:?}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
