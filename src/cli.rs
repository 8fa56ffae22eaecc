//! Command-line interface definitions for Actus News.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options can also be provided through environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Actus News application.
///
/// # Examples
///
/// ```sh
/// # First listing page as text
/// actus_news list
///
/// # Three pages rendered into a filterable HTML page, plus a JSON dump
/// actus_news export news.html --pages 3 --json news.json
///
/// # Offline extraction from a saved page
/// actus_news parse saved_listing.html --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true, env = "ACTUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Site origin, overrides `base_url` from the config file
    #[arg(long, global = true, env = "ACTUS_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the articles of one listing page
    List(ListArgs),

    /// Collect several listing pages into an HTML page
    Export(ExportArgs),

    /// Print the readable text of one or more article pages
    Read {
        /// Article URLs, absolute or relative to the base URL
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Run the extractor on a local HTML file
    Parse {
        /// Saved listing page
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Zero-based listing page
    #[arg(short, long, default_value_t = 0)]
    pub page: usize,

    /// Maximum number of articles to show, defaults to the configured page size
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// HTML file to create
    #[arg(default_value = "actus.html")]
    pub output: PathBuf,

    /// Maximum number of listing pages to collect
    #[arg(long, default_value_t = 3)]
    pub pages: usize,

    /// Articles requested per page
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    /// Page title
    #[arg(long, default_value = "Actus")]
    pub title: String,

    /// Also write the collected articles as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}
