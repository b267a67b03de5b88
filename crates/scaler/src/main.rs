//! Scaler CLI - resize images to a fixed width and bundle them for download.
//!
//! Every image is scaled to the target width (2048px by default) with its
//! aspect ratio and format preserved. One result is saved as
//! `resized-<name>`, several are bundled into `resized-images.zip`.
//!
//! # Usage
//!
//! ```bash
//! # Resize a single image into the current directory
//! scaler resize photo.jpg
//!
//! # Resize a directory into ./out as one archive
//! scaler resize ./photos/ --out-dir out --zip
//!
//! # Smaller output, with a manifest of what was written
//! scaler resize a.png b.webp --width 1024 --manifest resized.json
//!
//! # View configuration
//! scaler config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Scaler - resize images to a fixed width and bundle them for download.
#[derive(Parser, Debug)]
#[command(name = "scaler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize images and save them as single files or a zip archive
    Resize(cli::resize::ResizeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match scaler_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `scaler config path`."
            );
            scaler_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Scaler v{}", scaler_core::VERSION);

    match cli.command {
        Commands::Resize(args) => cli::resize::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resize_flags() {
        let cli = Cli::parse_from([
            "scaler", "resize", "a.png", "b.jpg", "--width", "1024", "--zip", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Resize(args) => {
                assert_eq!(args.inputs.len(), 2);
                assert_eq!(args.width, Some(1024));
                assert!(args.zip);
                assert!(!args.no_zip);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_zip_flags_conflict() {
        let result = Cli::try_parse_from(["scaler", "resize", "a.png", "--zip", "--no-zip"]);
        assert!(result.is_err());
    }
}
