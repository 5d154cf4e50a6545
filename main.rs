mod classify;
mod cli;
mod config;
mod error;
mod fetch;
mod ingest;
mod merge;
mod mirror;
mod packs;
mod scheme;
mod scripts;
mod staging;
mod unpack;
mod version;

use std::fs::{self, OpenOptions};

use log::{error, LevelFilter};

use cli::CliArgs;
use config::Config;
use error::Result;
use fetch::Fetcher;
use staging::Staging;
use version::Version;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.show_version {
        Version::print();
        return;
    }

    if !args.is_valid() {
        args.print_usage();
        std::process::exit(1);
    }

    let config = Config::from_args(&args);
    init_logging(&config);

    // Per-source errors are logged where they happen and never abort the
    // run; only setup failures land here.
    if let Err(e) = run(&config).await {
        eprintln!("Error: {}", e);
    }
}

async fn run(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.target_dir)?;
    let staging = Staging::new()?;
    let fetcher = Fetcher::new();

    println!("Target directory: {}", config.target_dir.display());
    println!("Staging directory: {}\n", staging.path().display());

    if config.run_mirror {
        if let Err(e) = mirror::run(&fetcher, &staging, config).await {
            error!("runtime mirror stage failed: {}", e);
        }
    }

    if config.run_scripts {
        if let Err(e) = scripts::run(&fetcher, &staging, config).await {
            error!("vim.org scripts stage failed: {}", e);
        }
    }

    if config.run_packs {
        if let Err(e) = packs::run(&fetcher, &staging, config).await {
            error!("compilations stage failed: {}", e);
        }
    }

    if config.run_resolve {
        match merge::resolve_pass(&config.target_dir) {
            Ok(removed) => println!("Resolve pass removed {} stale variants", removed),
            Err(e) => error!("resolve pass failed: {}", e),
        }
    }

    println!("\nProcessing complete!");
    Ok(())
}

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Warning: could not open log file {}: {}", path.display(), e),
        }
    }
    builder.init();
}
