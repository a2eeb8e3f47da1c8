//! Command line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Copydesk - title to final copy through the pipeline service
#[derive(Debug, Parser)]
#[command(
    name = "copydesk",
    about = "Guided copywriting client for the pipeline service",
    version,
    after_help = "Configuration is read from COPYDESK_* environment variables; flags override them."
)]
pub struct Cli {
    /// Base URL of the pipeline service (overrides COPYDESK_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Directory for exported Markdown (overrides COPYDESK_EXPORT_DIR)
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk through the three steps interactively
    Wizard,

    /// Generate title candidates from keywords
    Titles {
        /// One or more keywords
        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// List authors, or add one
    Authors {
        #[command(subcommand)]
        action: Option<AuthorsAction>,
    },

    /// List the voices of an author
    Voices { author: String },

    /// Submit a job and (by default) watch it
    Start {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        voice: String,

        /// Primary intent key (e.g. howto)
        #[arg(long)]
        intent: String,

        /// Secondary intent keys
        #[arg(long = "secondary", num_args = 1..)]
        secondary: Vec<String>,

        /// Print the job id and exit instead of watching
        #[arg(long)]
        no_watch: bool,
    },

    /// Watch a job until it finishes (p: pause/resume, r: refresh, a/b: save, q: quit)
    Watch { job_id: String },
}

#[derive(Debug, Subcommand)]
pub enum AuthorsAction {
    /// Register a new author
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },
}
