//! DownThemAll! extension packager CLI

use clap::Parser;
use colored::*;
use dtapack::{build_package, load_config, BuildConfig, BuildOptions, Mode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtapack")]
#[command(about = "Build reproducible DownThemAll! packages for every browser target", long_about = None)]
#[command(version)]
struct Cli {
    /// Release channel to build (development, beta, release, nightly)
    #[arg(short, long, default_value = "development")]
    mode: Mode,

    /// Project root containing manifest.json
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// JSON5 build configuration overriding the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not run the asset build commands before packaging
    #[arg(long)]
    skip_scripts: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => fail("Invalid configuration!", &anyhow::Error::new(e)),
        },
        None => BuildConfig::default(),
    };

    let options = BuildOptions {
        mode: cli.mode,
        run_scripts: !cli.skip_scripts,
    };

    println!("{}", format!("DownThemAll! packager ({})", options.mode).bold().blue());
    println!("{}", "=".repeat(50).blue());

    match build_package(&cli.root, &config, &options) {
        Ok(summary) => {
            println!();
            println!("{}", "✅ Packaging completed successfully!".green().bold());
            println!("  - Files audited: {}", summary.audited_files);
            for output in &summary.outputs {
                println!(
                    "  - {} {} ({} entries)",
                    output.target.tag().bold(),
                    output.path.display(),
                    output.entries
                );
            }
        }
        Err(e) => fail("Packaging failed!", &e),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn fail(headline: &str, error: &anyhow::Error) -> ! {
    eprintln!("{}", format!("❌ {}", headline).red().bold());
    eprintln!("{}", format!("Error: {:#}", error).red());
    std::process::exit(1);
}
