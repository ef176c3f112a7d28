//! CLI administration tool for snaplink.
//!
//! Inspects short codes and validates configuration without starting the
//! server.
//!
//! # Usage
//!
//! ```bash
//! # Short code for storage id 125, padded to 6 characters
//! cargo run --bin admin -- code encode 125
//!
//! # Storage id behind a short code
//! cargo run --bin admin -- code decode aaaacb
//!
//! # Validate the environment configuration
//! cargo run --bin admin -- config check
//! ```

use snaplink::config::{Config, load_from_env};
use snaplink::utils::code_generator::{ALPHABET, ShortCodeGenerator};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode and decode short codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Configuration tools
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CodeAction {
    /// Turn a storage id into its short code
    Encode {
        id: i64,

        /// Pad to at least this many characters (defaults to SHORT_CODE_MIN_LENGTH)
        #[arg(short, long)]
        min_length: Option<usize>,
    },

    /// Turn a short code back into its storage id
    Decode { code: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration from the environment
    Check,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Code { action } => match action {
            CodeAction::Encode { id, min_length } => encode(id, min_length),
            CodeAction::Decode { code } => decode(&code),
        },
        Commands::Config { action } => match action {
            ConfigAction::Check => check_config(),
        },
    }
}

fn default_min_length() -> usize {
    Config::from_env()
        .map(|c| c.short_code_min_length)
        .unwrap_or_else(|_| Config::default().short_code_min_length)
}

fn encode(id: i64, min_length: Option<usize>) -> Result<()> {
    let min_length = min_length.unwrap_or_else(default_min_length);
    let generator = ShortCodeGenerator::new(min_length);

    let code = generator
        .generate(id)
        .with_context(|| format!("Cannot encode id {id}"))?;

    println!("{}", "🔗 Encode".bright_blue().bold());
    println!("  Id:         {}", id.to_string().cyan());
    println!("  Min length: {}", generator.min_length());
    println!("  Code:       {}", code.bright_yellow().bold());

    Ok(())
}

fn decode(code: &str) -> Result<()> {
    let generator = ShortCodeGenerator::default();

    println!("{}", "🔍 Decode".bright_blue().bold());
    println!("  Code: {}", code.cyan());

    match generator.decode(code) {
        Ok(id) => {
            println!("  Id:   {}", id.to_string().bright_yellow().bold());
            Ok(())
        }
        Err(e) => {
            println!("  {}", format!("❌ {e}").red());
            println!(
                "  Alphabet: {}",
                String::from_utf8_lossy(ALPHABET).bright_black()
            );
            Err(e.into())
        }
    }
}

fn check_config() -> Result<()> {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();

    let config = match load_from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", format!("❌ Invalid: {e:#}").red().bold());
            return Err(e);
        }
    };

    let on_off = |enabled: bool| {
        if enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        }
    };

    println!("  Listen:       {}", config.listen_addr.cyan());
    println!("  Base URL:     {}", config.base_url.cyan());
    println!("  Behind proxy: {}", config.behind_proxy);
    println!(
        "  Cache:        {} (max_size={}, ttl={}s, threshold={})",
        on_off(config.cache_enabled),
        config.cache_max_size,
        config.cache_ttl_seconds,
        config.cache_popular_threshold
    );
    println!(
        "  Rate limit:   {} ({} requests / {}s)",
        on_off(config.rate_limit_enabled),
        config.rate_limit_requests,
        config.rate_limit_window_seconds
    );
    println!(
        "  Short codes:  min length {}, aliases {}..={}",
        config.short_code_min_length,
        config.custom_alias_min_length,
        config.custom_alias_max_length
    );
    println!();
    println!("{}", "✅ Configuration is valid".green().bold());

    Ok(())
}
