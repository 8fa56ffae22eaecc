//! # Actus News
//!
//! Command-line front end for the listing extractor.
//!
//! ## Usage
//!
//! ```sh
//! actus_news list --page 1
//! actus_news export actus.html --pages 3 --json actus.json
//! actus_news read https://actus.ulb.be/fr/actus/some-article
//! actus_news parse saved_listing.html --json
//! ```
//!
//! Logs go to stderr (filter with `RUST_LOG`); results go to stdout.

use actus_news::client::ListingClient;
use actus_news::collect::collect_articles;
use actus_news::config::Config;
use actus_news::extract::extract_articles;
use actus_news::models::Article;
use actus_news::outputs::{html, json};
use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command, ExportArgs, ListArgs};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = load_config(&args)?;

    let result = match args.command {
        Command::List(list) => run_list(&config, list).await,
        Command::Export(export) => run_export(&config, export).await,
        Command::Read { urls } => run_read(&config, &urls).await,
        Command::Parse { file, json } => run_parse(&config, &file, json).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    result
}

/// Config file (if any) with the CLI base URL applied on top.
fn load_config(args: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    config.base()?;
    Ok(config)
}

async fn run_list(config: &Config, args: ListArgs) -> Result<(), Box<dyn Error>> {
    let mut client = ListingClient::from_config(config)?;
    if let Some(page_size) = args.page_size {
        client = client.with_page_size(page_size);
    }
    let articles = client.listing_articles(args.page).await?;
    print_articles(&articles, args.json)
}

async fn run_export(config: &Config, args: ExportArgs) -> Result<(), Box<dyn Error>> {
    let client = ListingClient::from_config(config)?;
    let articles = collect_articles(&client, args.pages, args.page_size).await?;
    info!(count = articles.len(), "Collected articles");

    let page = html::render_html_page(&articles, &args.title, Local::now());
    html::write_html_page(&args.output, &page).await?;
    if let Some(json_path) = &args.json {
        json::write_articles_json(json_path, &articles).await?;
    }

    println!("HTML page written to {}", args.output.display());
    Ok(())
}

async fn run_read(config: &Config, urls: &[String]) -> Result<(), Box<dyn Error>> {
    let client = ListingClient::from_config(config)?;
    if let [url] = urls {
        println!("{}", client.article_detail(url).await?);
        return Ok(());
    }

    let mut failures = 0usize;
    for (url, detail) in client.article_details(urls).await {
        match detail {
            Ok(text) => println!("== {url}\n\n{text}\n"),
            Err(e) => {
                failures += 1;
                println!("== {url}\n\n[{e}]\n");
            }
        }
    }
    if failures == urls.len() {
        return Err(format!("none of the {} articles could be read", urls.len()).into());
    }
    Ok(())
}

async fn run_parse(config: &Config, file: &std::path::Path, as_json: bool) -> Result<(), Box<dyn Error>> {
    let markup = tokio::fs::read_to_string(file).await?;
    let articles = extract_articles(&markup, &config.base()?)?;
    print_articles(&articles, as_json)
}

fn print_articles(articles: &[Article], as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(articles)?);
        return Ok(());
    }
    for (i, article) in articles.iter().enumerate() {
        println!("{:>2}. {}", i + 1, article.title());
        println!("    {}", article.url());
        if let Some(date) = article.date() {
            println!("    {date}");
        }
        if !article.summary().is_empty() {
            println!("    {}", article.summary());
        }
    }
    Ok(())
}
