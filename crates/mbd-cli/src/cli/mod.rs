//! CLI for the MBD release browser/downloader.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mbd_core::attrs::{Arch, CRuntime, ExceptionModel, RuntimeVersion, ThreadModel};
use mbd_core::config;
use mbd_core::filter::FilterSelection;

use commands::{run_assets, run_download, run_releases};

/// Top-level CLI for the MBD downloader.
#[derive(Debug, Parser)]
#[command(name = "mbd")]
#[command(about = "MBD: browse, filter, download and unpack MinGW-w64 build archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Attribute constraints shared by `assets` and `download`. An omitted flag
/// leaves that field unconstrained; `unknown` selects assets where the
/// attribute was not detected in the name.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Architecture: i686, x86_64 or unknown.
    #[arg(long)]
    pub arch: Option<Arch>,

    /// Thread model: posix, win32, mcf or unknown.
    #[arg(long)]
    pub threads: Option<ThreadModel>,

    /// Exception model: seh, dwarf or unknown.
    #[arg(long)]
    pub exceptions: Option<ExceptionModel>,

    /// C runtime: ucrt, msvcrt or unknown.
    #[arg(long)]
    pub crt: Option<CRuntime>,

    /// Runtime library version: rt_v13 or unknown.
    #[arg(long)]
    pub runtime: Option<RuntimeVersion>,
}

impl FilterArgs {
    pub fn to_selection(&self) -> FilterSelection {
        FilterSelection {
            arch: self.arch,
            threads: self.threads,
            exceptions: self.exceptions,
            crt: self.crt,
            runtime: self.runtime,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch and list available releases.
    Releases {
        /// Show at most N releases.
        #[arg(long, default_value = "15", value_name = "N")]
        limit: usize,
    },

    /// List a release's assets, optionally narrowed by attribute filters.
    Assets {
        /// Release tag (defaults to the most recent release).
        tag: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Download one asset, optionally unpacking it afterwards.
    Download {
        /// Release tag.
        tag: String,

        /// Asset file name, or 1-based position in the filtered listing.
        asset: String,

        /// Destination directory for the downloaded file.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Unpack the archive into a sibling directory after the download.
        #[arg(long)]
        extract: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Releases { limit } => run_releases(&cfg, limit).await?,
            CliCommand::Assets { tag, filters } => {
                run_assets(&cfg, tag, filters.to_selection()).await?;
            }
            CliCommand::Download {
                tag,
                asset,
                dir,
                extract,
                filters,
            } => {
                run_download(&cfg, &tag, &asset, dir, extract, filters.to_selection()).await?;
            }
        }

        Ok(())
    }
}
