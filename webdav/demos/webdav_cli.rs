// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! WebDAV client validation tool.
//!
//! A standalone CLI for trying the client against real WebDAV servers, and
//! example code for the `WebDavClient` API.

use std::error::Error;
use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use davlite::{Credentials, StatusPolicy, WebDavClient, WebDavConfig, WebDavError};
use tracing_subscriber::EnvFilter;

/// WebDAV client validation tool.
#[derive(Parser)]
#[command(name = "webdav_cli")]
#[command(about = "WebDAV client validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Remote collection root URL
    #[arg(long)]
    root: Option<String>,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Fail on non-2xx responses instead of printing the status
    #[arg(long)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List a folder
    Ls {
        /// Folder relative to the root, e.g. "/docs/"
        #[arg(default_value = "")]
        folder: String,
    },
    /// Print a remote file to stdout
    Get {
        /// Remote file name
        remote: String,
    },
    /// Upload a local file
    Put {
        /// Local file path
        local: PathBuf,
        /// Remote file name
        remote: String,
    },
    /// Delete a remote file
    Rm {
        /// Remote file name
        remote: String,
    },
    /// Create a remote folder
    Mkdir {
        /// Remote folder name
        remote: String,
    },
    /// Show properties of a remote file
    Stat {
        /// Remote file name
        remote: String,
    },
}

impl Cli {
    fn build_config(&self) -> Result<WebDavConfig, Box<dyn Error>> {
        let root = self
            .root
            .clone()
            .or_else(|| std::env::var("DAVLITE_ROOT").ok())
            .ok_or_else(|| {
                "DAVLITE_ROOT must be provided via --root or DAVLITE_ROOT env var".to_string()
            })?;

        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("DAVLITE_USERNAME").ok())
            .unwrap_or_default();

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("DAVLITE_PASSWORD").ok())
            .unwrap_or_default();

        Ok(WebDavConfig {
            timeout_secs: self.timeout,
            status_policy: if self.strict {
                StatusPolicy::RequireSuccess
            } else {
                StatusPolicy::Permissive
            },
            ..WebDavConfig::new(root, Credentials::new(username, password))
        })
    }
}

fn print_status(client: &WebDavClient) {
    match client.last_response().and_then(|head| head.status) {
        Some(status) if (200..300).contains(&status) => {
            println!("{} {status}", "✓".green());
        }
        Some(status) => println!("{} {status}", "⚠".yellow()),
        None => println!("{} no status", "⚠".yellow()),
    }
}

async fn run(client: &mut WebDavClient, command: Commands) -> Result<(), WebDavError> {
    match command {
        Commands::Ls { folder } => {
            let entries = client.list(&folder).await?;
            if entries.is_empty() {
                println!("Empty folder");
            }
            for entry in entries {
                if entry.ends_with('/') {
                    println!("{}", entry.blue().bold());
                } else {
                    println!("{entry}");
                }
            }
        }
        Commands::Get { remote } => {
            let body = client.get(&remote).await?;
            std::io::stdout().write_all(&body)?;
        }
        Commands::Put { local, remote } => {
            client.upload(&local, &remote).await?;
            print_status(client);
        }
        Commands::Rm { remote } => {
            client.delete(&remote).await?;
            print_status(client);
        }
        Commands::Mkdir { remote } => {
            client.mkdir(&remote).await?;
            print_status(client);
        }
        Commands::Stat { remote } => {
            let props = client.prop(&remote).await?;
            println!("{:<10} {}", "href".bold(), props.href);
            println!("{:<10} {}", "modified".bold(), props.modified);
            println!("{:<10} {}", "length".bold(), props.length);
            println!("{:<10} {}", "type".bold(), props.content_type);
        }
    }
    Ok(())
}

/// Formats an error with a hint for the common failure kinds.
fn format_error(err: &WebDavError) -> String {
    let hint = match err {
        WebDavError::Initialization {
            status: Some(401), ..
        } => "Authentication failed".to_string(),
        WebDavError::Transport { code: Some(code), .. } => {
            format!("Network error (os error {code}) - check the root URL and connection")
        }
        _ => err.to_string(),
    };
    format!("{} {hint}", "Error:".red().bold())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Priority: existing environment variables (highest) -> .env.local -> .env (lowest).
    // dotenvy never overrides a variable that is already set, so load order is priority order.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.build_config()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async move {
        let mut client = WebDavClient::with_config(config).await?;
        run(&mut client, cli.command).await
    });

    if let Err(e) = result {
        std::io::stdout().flush().ok();
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
