//! CLI for the featload resource loader.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use featload_core::config;
use featload_core::registry::ResourceKind;
use featload_core::Session;

use commands::{run_all, run_directory, run_each, run_load, run_navbar};

/// Top-level CLI for featload.
#[derive(Debug, Parser)]
#[command(name = "featload")]
#[command(about = "featload: deduplicating resource loader and feature discovery client", long_about = None)]
pub struct Cli {
    /// Config file to use instead of $XDG_CONFIG_HOME/featload/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Script,
    Stylesheet,
    Markup,
    Data,
}

impl From<KindArg> for ResourceKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Script => ResourceKind::Script,
            KindArg::Stylesheet => ResourceKind::Stylesheet,
            KindArg::Markup => ResourceKind::Markup,
            KindArg::Data => ResourceKind::Data,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load a batch of resources and print each one's final status.
    Load {
        /// Resource URLs, absolute or relative to the configured base URL.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Resource kind of the whole batch.
        #[arg(long, value_enum, default_value = "script")]
        kind: KindArg,
    },

    /// Query the directory service and print every delivery of the listing.
    Directory {
        /// Extension point path, e.g. /mtwilson-core-html5/navbar/main.json.
        path: String,
        /// Restrict the listing to one feature.
        #[arg(long)]
        feature: Option<String>,
    },

    /// Load each discovered JSON artifact and print it as it arrives.
    Each {
        /// Extension point path.
        path: String,
    },

    /// Load every discovered JSON artifact as one batch and print it.
    All {
        /// Extension point path.
        path: String,
    },

    /// Install discovered navbar buttons and print the resulting order.
    Navbar {
        /// Comma-separated feature order (overrides config).
        #[arg(long, value_name = "CSV")]
        order: Option<String>,
        /// Home feature or tab (overrides config).
        #[arg(long)]
        home: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let (session, _document) = Session::from_config(&cfg)?;

        match cli.command {
            CliCommand::Load { urls, kind } => run_load(&session, kind.into(), &urls).await?,
            CliCommand::Directory { path, feature } => run_directory(&session, &path, feature).await?,
            CliCommand::Each { path } => run_each(&session, &path).await?,
            CliCommand::All { path } => run_all(&session, &path).await?,
            CliCommand::Navbar { order, home } => run_navbar(&session, &cfg, order, home).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
