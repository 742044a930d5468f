mod error;
mod parser;
mod scraper;
mod settings;
mod sink;
mod songs;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::parser::extract::TeaserPattern;
use crate::scraper::HttpSource;
use crate::settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "hitparade_scraper", about = "Collect the SWR1 Hitparade song list")]
struct Cli {
    /// Listing URL; pages are requested as `<url>?p=<n>`
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Number of listing pages to fetch
    #[arg(long, global = true)]
    max_pages: Option<u32>,
    /// Output JSON file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Substring a teaser URL must contain to count as audio
    #[arg(long, global = true)]
    audio_marker: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every page, deduplicate and write the song list
    Run,
    /// Fetch one page and print what it yields (writes nothing)
    Inspect {
        /// 1-based page number
        page: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let overrides = Overrides {
        base_url: cli.base_url,
        max_pages: cli.max_pages,
        output: cli.output,
        audio_marker: cli.audio_marker,
    };
    let settings = Settings::load(&overrides).context("Failed to load configuration")?;
    tracing::debug!(?settings, "configuration loaded");

    let source = HttpSource::new(settings.base_url.clone());

    match cli.command {
        Commands::Run => {
            println!("SWR1 Hitparade Scraper");
            println!("======================\n");
            println!("Fetching {} pages from {}", settings.max_pages, settings.base_url);

            let out = scraper::scrape_pages(
                &source,
                settings.max_pages,
                &TeaserPattern,
                &settings.audio_marker,
            )
            .await;

            sink::write_songs(&settings.output, &out.songs).with_context(|| {
                format!("Failed to write song list to {}", settings.output.display())
            })?;

            let s = out.stats;
            println!("{}", "-".repeat(48));
            println!(
                "Pages: {} ({} failed) | matches kept: {} | discarded: {} undecodable, {} not audio",
                s.pages, s.failed, s.found, s.undecodable, s.not_audio
            );
            println!("Saved {} unique songs to {}", out.songs.len(), settings.output.display());
        }
        Commands::Inspect { page } => {
            let report = scraper::scrape_single_page(
                &source,
                page,
                &TeaserPattern,
                &settings.audio_marker,
            )
            .await
            .with_context(|| format!("Failed to fetch page {}", page))?;
            report.log(page);

            println!("{}", serde_json::to_string_pretty(&report.songs)?);
            println!(
                "page {}: {} found, {} undecodable, {} not audio",
                page,
                report.found(),
                report.undecodable,
                report.not_audio
            );
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
