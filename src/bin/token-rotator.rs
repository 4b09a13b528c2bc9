use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use token_rotator::config::settings::{
    CredentialsConfig, GithubConfig, LogFormat, RotatorConfig, SecretManagerConfig, ServerConfig,
    StatusPolicy,
};
use token_rotator::rotation::handler::RotationHandler;
use token_rotator::server;
use token_rotator::trigger::strip_line_break;
use token_rotator::utils::constants::{
    DEFAULT_GITHUB_ACCEPT, DEFAULT_GITHUB_API_URL, DEFAULT_METADATA_TOKEN_URL,
    DEFAULT_SECRET_MANAGER_URL,
};
use token_rotator::utils::logging;
use token_rotator::utils::logging::LogLevel;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project holding the admin-token and registration-token secrets
    #[arg(long, env = "project_id")]
    project_id: String,
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,
    #[arg(long, env = "GITHUB_ACCEPT", default_value = DEFAULT_GITHUB_ACCEPT)]
    github_accept: String,
    /// Fail the rotation when the registration endpoint answers non-2xx
    #[arg(long, env = "REJECT_NON_SUCCESS")]
    reject_non_success: bool,
    #[arg(long, env = "SECRET_MANAGER_URL", default_value = DEFAULT_SECRET_MANAGER_URL)]
    secret_manager_url: String,
    /// Static bearer token for Secret Manager; the metadata server is asked when absent
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    #[arg(long, env = "METADATA_TOKEN_URL", default_value = DEFAULT_METADATA_TOKEN_URL)]
    metadata_token_url: String,
    #[arg(long, env = "SECRET_PAGE_SIZE")]
    page_size: Option<u32>,
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT" , value_enum)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rotate once; the organization is read from stdin when not given
    Rotate {
        org: Option<String>,
    },
    /// Serve a Pub/Sub push endpoint
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

impl Args {
    fn rotator_config(&self) -> RotatorConfig {
        let credentials = match &self.access_token {
            Some(token) => CredentialsConfig::Static(token.to_owned()),
            None => CredentialsConfig::Metadata {
                url: self.metadata_token_url.to_owned(),
            },
        };

        RotatorConfig {
            project_id: self.project_id.to_owned(),
            github: GithubConfig {
                api_url: self.github_api_url.to_owned(),
                accept: self.github_accept.to_owned(),
                status_policy: StatusPolicy::from_flag(self.reject_non_success),
            },
            secret_manager: SecretManagerConfig {
                url: self.secret_manager_url.to_owned(),
                credentials,
                page_size: self.page_size,
            },
            http_timeout_secs: self.http_timeout_secs,
        }
    }
}

async fn read_stdin_payload() -> Result<String> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("failed to read organization from stdin")?;
    Ok(strip_line_break(&raw).to_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read flags and env, start logging
    // -------------------------------

    let args = Args::parse();
    logging::run(args.log_level, args.log_format);

    // -------------------------------
    // 2. Build the handler from explicit configuration
    // -------------------------------

    let handler = RotationHandler::new(args.rotator_config())?;

    // -------------------------------
    // 3. Rotate once, or serve pushes
    // -------------------------------

    match args.command {
        Command::Rotate { org } => {
            let raw_org = match org {
                Some(org) => org,
                None => read_stdin_payload().await?,
            };
            let report = handler
                .rotate(&raw_org)
                .await
                .inspect_err(|e| error!("rotation aborted: {:#}", e))?;
            info!(org = %report.org, version = %report.new_version, "done");
        }
        Command::Serve { host, port } => {
            info!("Service starting...");
            server::server::start(&ServerConfig { host, port }, Arc::new(handler)).await?;
        }
    }

    Ok(())
}
