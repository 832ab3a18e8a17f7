//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Pick areas from a hierarchical catalog and query the listing score service
#[derive(Parser, Debug)]
#[command(name = "areapick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .areapick.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Catalog file (overrides configured catalog_path)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the area tree with the default selection marked
    Tree {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print areas matching TERM together with their ancestors
    Search {
        /// Case-insensitive substring
        term: String,
    },

    /// Fuzzy-pick an area and add it to the selection
    Pick {
        /// Add to the default selection instead of starting empty
        #[arg(long)]
        keep_defaults: bool,
    },

    /// Print the submission payload as JSON
    Payload {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Post the payload to the scoring service
    Submit {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Selection and filter edits applied on top of the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Select an area and its subtree (repeatable)
    #[arg(short, long = "area", value_name = "NAME")]
    pub areas: Vec<String>,

    /// Start from an empty selection instead of the defaults
    #[arg(long)]
    pub no_defaults: bool,

    /// Deselect an area; selected anchors take their subtree (repeatable)
    #[arg(long = "deselect", value_name = "NAME")]
    pub deselect: Vec<String>,

    /// Minimum monthly price
    #[arg(long)]
    pub min_price: Option<u32>,

    /// Maximum monthly price
    #[arg(long)]
    pub max_price: Option<u32>,

    /// Toggle a bedroom bucket 0-4 (4 means 4+) or "any" (repeatable)
    #[arg(short, long = "bedroom", value_name = "BUCKET")]
    pub bedrooms: Vec<String>,

    /// Minimum bathrooms ("any" or a number)
    #[arg(long, value_name = "TOKEN")]
    pub bathrooms: Option<String>,

    /// Broker fee preference
    #[arg(long, value_name = "TOKEN")]
    pub fees: Option<String>,
}

impl FilterArgs {
    /// True when no edit was requested.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
            && !self.no_defaults
            && self.deselect.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.bedrooms.is_empty()
            && self.bathrooms.is_none()
            && self.fees.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
