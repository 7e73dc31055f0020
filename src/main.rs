use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use zipclean::config::Config;
use zipclean::constants;
use zipclean::{logging, self_test, FsGuideStore, Pipeline, ZipCleaner, ZipReferenceSet};

#[derive(Parser)]
#[command(name = "zipclean")]
#[command(about = "Remove zip codes from all US postal addresses found in travel guides")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Root directory that contains all the guides
    #[arg(required_unless_present = "test")]
    path: Option<PathBuf>,

    /// Filename of the guides to clean [default: result.json]
    #[arg(short, long)]
    guide_name: Option<String>,

    /// Minimum number of occurrences for a zip code to be removed [default: 1]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    frequency: Option<u32>,

    /// Enable debug messages in the log file
    #[arg(short, long)]
    message_debug: bool,

    /// Path to the event log file [default: logs/zipclean.log]
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// File of reference zip codes (JSON array or one per line) instead of the bundled database
    #[arg(short, long)]
    zip_file: Option<PathBuf>,

    /// TOML configuration file [default: ./zipclean.toml when present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the current version and quit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Run the built-in self-test and exit
    #[arg(short, long)]
    test: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(guide_name) = &self.guide_name {
            config.guide_name = guide_name.clone();
        }
        if let Some(frequency) = self.frequency {
            config.frequency = frequency as usize;
        }
        if self.message_debug {
            config.debug = true;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        if let Some(zip_file) = &self.zip_file {
            config.zip_file = Some(zip_file.clone());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.test {
        let failures = self_test::run()?;
        if failures.is_empty() {
            println!("✅ zipclean {} self-test passed", constants::VERSION);
            return Ok(());
        }
        for failure in &failures {
            eprintln!("❌ {}", failure);
        }
        std::process::exit(1);
    }

    // Load environment variables
    dotenv::dotenv().ok();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let _log_guard = logging::init_logging(&config.log_file, config.debug)?;

    let Some(root) = cli.path.as_deref() else {
        anyhow::bail!("a root path is required");
    };

    let reference = match &config.zip_file {
        Some(path) => Arc::new(ZipReferenceSet::from_file(path)?),
        None => ZipReferenceSet::bundled()?,
    };
    let cleaner = ZipCleaner::new(reference, config.frequency)?;
    info!(
        "Using {} reference zip codes at frequency threshold {}",
        cleaner.reference().len(),
        cleaner.frequency_threshold()
    );
    let store = FsGuideStore::new(root, config.guide_name.clone());

    let result = match Pipeline::run(root, &store, &cleaner) {
        Ok(result) => result,
        Err(e) => {
            error!("zipcode cleaning failed: {}", e);
            return Err(e).with_context(|| format!("could not clean guides under {}", root.display()));
        }
    };

    if result.no_guides_found {
        eprintln!(
            "there was no guide with filename {} found under {} so no zipcode cleaning was performed",
            store.guide_name(),
            store.root().display()
        );
        return Ok(());
    }

    println!("\n📊 Zipcode cleaning results for {}:", result.root);
    println!("   Guides found: {}", result.total_guides);
    println!("   Cleaned: {}", result.cleaned_guides);
    println!("   Without addresses: {}", result.missing_structure);
    println!("   Zip codes removed: {}", result.tokens_removed);
    println!("   Errors: {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for error in &result.errors {
            println!("   - {}", error);
        }
    }

    Ok(())
}
