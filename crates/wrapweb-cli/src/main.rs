mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wrapweb",
    about = "Wrap registry service: serve wraps and regenerate them from merged pull requests",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// YAML config file (missing file means defaults)
        #[arg(long, env = "WRAPWEB_CONFIG", default_value = "wrapweb.yaml")]
        config: PathBuf,
        /// Address to listen on, overriding the config file
        #[arg(long)]
        bind: Option<String>,
        /// Webhook HMAC secret, overriding the config file
        #[arg(long, env = wrapweb_core::config::SECRET_KEY_ENV, hide_env_values = true)]
        secret_key: Option<String>,
    },

    /// Print the X-Hub-Signature value for a payload
    Sign {
        /// Webhook HMAC secret
        #[arg(long, env = wrapweb_core::config::SECRET_KEY_ENV, hide_env_values = true)]
        secret_key: String,
        /// Payload file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Atomically publish a version into the wrap database
    Publish {
        /// SQLite database path
        #[arg(long, env = wrapweb_core::command::DATABASE_ENV)]
        database: PathBuf,
        #[arg(long)]
        project: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        revision: u64,
        /// Wrap descriptor file
        #[arg(long)]
        wrap: PathBuf,
        /// Zip archive file
        #[arg(long)]
        zip: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve {
            config,
            bind,
            secret_key,
        } => cmd::serve::run(&config, bind, secret_key),
        Commands::Sign { secret_key, file } => cmd::sign::run(&secret_key, file.as_deref()),
        Commands::Publish {
            database,
            project,
            branch,
            revision,
            wrap,
            zip,
        } => cmd::publish::run(&cmd::publish::PublishArgs {
            database,
            project,
            branch,
            revision,
            wrap,
            zip,
        }),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
