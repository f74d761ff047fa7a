//! Super Console Launcher
//!
//! Command-line frontend: scans the ROM library, prints the catalog and the
//! recent/favorites lists, and launches games through their emulator.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use supercon_config::SuperconConfig;
use supercon_emulator::EmulatorLauncher;
use supercon_library::{
    CatalogEntry, CoverResolver, Ledger, LedgerRecord, RomScanner, ScanConfig, ScanResult,
    find_entry, group_by_platform,
};

#[derive(Parser)]
#[command(name = "supercon-launcher")]
#[command(about = "Browse and launch console games", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./supercon.toml)
    #[arg(short, long, global = true, env = "SUPERCON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the ROM directory and print the catalog
    Scan {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recently played games
    Recent,

    /// Show favorite games
    Favorites,

    /// Launch a game and record it as played
    Play {
        /// Platform directory name (e.g. "SNES")
        platform: String,

        /// Game title as shown by `scan`
        title: String,

        /// Wait for the emulator to exit
        #[arg(short, long)]
        wait: bool,
    },

    /// Add or remove a game from favorites
    Favorite {
        /// Platform directory name
        platform: String,

        /// Game title as shown by `scan`
        title: String,
    },
}

/// Everything a command needs, built once at startup
struct App {
    config: SuperconConfig,
    scanner: RomScanner,
    ledger: Ledger,
}

impl App {
    fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => SuperconConfig::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => SuperconConfig::load_default().context("Failed to load configuration")?,
        };

        let covers = CoverResolver::new(&config.paths.default_cover)
            .context("Placeholder cover is required")?;
        let scanner = RomScanner::with_config(ScanConfig::from_config(&config), covers);
        let ledger = Ledger::from_config(&config);

        Ok(Self {
            config,
            scanner,
            ledger,
        })
    }

    fn scan(&self) -> ScanResult {
        let result = self
            .scanner
            .scan(&self.config.paths.roms, &self.config.paths.covers);

        for issue in &result.issues {
            warn!("{}", issue);
        }
        result
    }

    /// Scan and find one game
    fn find(&self, platform: &str, title: &str) -> Result<CatalogEntry> {
        let result = self.scan();
        match find_entry(&result.entries, platform, title) {
            Some(entry) => Ok(entry.clone()),
            None => bail!("No game titled \"{}\" on platform {}", title, platform),
        }
    }

    fn print_scan(&self, json: bool) -> Result<()> {
        let result = self.scan();

        if json {
            println!("{}", serde_json::to_string_pretty(&result.entries)?);
        } else {
            for (platform, games) in group_by_platform(&result.entries) {
                println!("{} ({})", platform, games.len());
                for game in games {
                    println!("  {}", game.title);
                }
            }
            println!(
                "{} games on {} platforms",
                result.entries.len(),
                result.platforms_scanned
            );
        }

        for issue in &result.issues {
            eprintln!("warning: {}", issue);
        }
        Ok(())
    }

    fn play(&self, platform: &str, title: &str, wait: bool) -> Result<()> {
        let entry = self.find(platform, title)?;
        let launcher = EmulatorLauncher::from_config(&self.config);

        let (platform, rom_path) = entry.launch_target();
        let mut launched = launcher
            .launch(platform, rom_path)
            .with_context(|| format!("Failed to launch {}", entry.title))?;
        println!("Launching {}...", entry.title);

        if let Err(e) = self.ledger.record_play(&entry) {
            warn!("Failed to update recent list: {}", e);
        }

        if wait {
            let status = launched.child.wait()?;
            info!("{} exited with {}", launched.emulator, status);
        } else {
            info!("{} running as PID {}", launched.emulator, launched.pid);
        }

        Ok(())
    }

    fn toggle_favorite(&self, platform: &str, title: &str) -> Result<()> {
        let entry = self.find(platform, title)?;

        let favorited = self
            .ledger
            .toggle_favorite(&entry)
            .context("Failed to update favorites")?;

        if favorited {
            println!("Added {} to favorites", entry.title);
        } else {
            println!("Removed {} from favorites", entry.title);
        }
        Ok(())
    }
}

fn print_records(heading: &str, records: &[LedgerRecord]) {
    if records.is_empty() {
        println!("No {}", heading.to_lowercase());
        return;
    }

    println!("{}", heading);
    for record in records {
        println!("  [{}] {}", record.platform, record.title);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::new(cli.config)?;

    match cli.command {
        Commands::Scan { json } => app.print_scan(json)?,
        Commands::Recent => print_records("Recently played", &app.ledger.list_recent()),
        Commands::Favorites => print_records("Favorites", &app.ledger.list_favorites()),
        Commands::Play {
            platform,
            title,
            wait,
        } => app.play(&platform, &title, wait)?,
        Commands::Favorite { platform, title } => app.toggle_favorite(&platform, &title)?,
    }

    Ok(())
}
