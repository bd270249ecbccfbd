//! bt-rename CLI
//!
//! A command-line tool for renaming downloaded episodes and subtitles using AI and TMDB.

use bt_rename::cli::{
    args::{Cli, Commands},
    commands::{apply, rename, rename::RenameOptions, undo},
};
use bt_rename::models::config::AppConfig;
use bt_rename::preflight;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug);

    let config = AppConfig::load();

    // Run the appropriate command
    match cli.command {
        Commands::Rename {
            dirs,
            dry_run,
            search,
            require_subtitles,
            yes,
            max_depth,
        } => {
            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks(&config)?;
            }

            let options = RenameOptions {
                dirs,
                dry_run,
                search,
                require_subtitles,
                yes,
                max_depth,
            };
            rename::rename(options, &config).await?;
        }

        Commands::Apply { plan_file } => {
            apply::apply(&plan_file)?;
        }

        Commands::Undo { plan_file, dry_run } => {
            undo::undo(&plan_file, dry_run)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("bt_rename=debug")
    } else {
        EnvFilter::new("bt_rename=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
fn run_preflight_checks(config: &AppConfig) -> anyhow::Result<()> {
    use colored::Colorize;

    eprintln!("{}", "Running preflight checks...".bold());

    let results = preflight::run_preflight_checks(config);
    preflight::print_results(&results);

    eprintln!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
