use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use keystore::KeyStore;
use keystore::cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let dir = cli.dir.unwrap_or_else(keystore::default_store_path);
    let store = KeyStore::open(&dir).context(format!("Failed to open store at {}", dir.display()))?;

    info!("keystore opened at {}", dir.display());

    match cli.command {
        Command::Get { key } => match store.get_raw(&key)? {
            Some(content) => println!("{}", content),
            None => {
                eprintln!("{} No record for key: {}", "✗".red(), key);
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            let parsed: serde_json::Value =
                serde_json::from_str(&value).context("Value must be a valid JSON literal")?;
            store.set(&key, &parsed)?;
            println!("{} Stored: {}", "✓".green(), key.cyan());
        }
        Command::Rm { key } => {
            if store.remove(&key)? {
                println!("{} Removed: {}", "✓".green(), key);
            } else {
                println!("No record for key: {}", key);
            }
        }
        Command::Keys => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No records found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
    }

    Ok(())
}
