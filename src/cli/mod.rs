use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod serve;
pub mod settings;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8065")]
        port: String,
    },
    /// Print the effective plugin settings
    Settings {
        /// Settings file, defaults to MEETSCHED_SETTINGS_PATH or ./settings.json
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Settings { path }) => {
            settings::run(path)?;
        }
        None => {}
    }

    Ok(())
}
