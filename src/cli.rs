use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "foldwatch")]
#[command(author, version, about = "Run transformation commands on new files in watched folders")]
pub struct Cli {
    /// Path to the folder config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch all configured folders until interrupted
    Daemon {
        /// Delay before processing a new file, in milliseconds
        #[arg(long, default_value = "500")]
        settle_ms: u64,
    },

    /// Bind a folder to a predefined action or a custom command
    #[command(group(ArgGroup::new("what").required(true).args(["action", "command"])))]
    Add {
        /// Folder to watch (created if missing)
        path: PathBuf,

        /// Predefined action (compress, convert-webp, convert-mp4, convert-mp3, resize-50, resize-25)
        #[arg(short, long)]
        action: Option<String>,

        /// Custom shell command; {} is the file, plus {name}, {ext} and {dir}
        #[arg(long = "command")]
        command: Option<String>,

        /// Only process these extensions (comma separated)
        #[arg(short, long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Keep a copy of each original in <path>/.originals
        #[arg(short, long)]
        keep: bool,
    },

    /// Remove one binding, or every binding of a folder
    Remove {
        /// Watched folder
        path: PathBuf,

        /// Command or action name of the binding to remove
        matcher: Option<String>,
    },

    /// List watched folders and their actions
    List {
        /// Only show this folder
        path: Option<PathBuf>,
    },

    /// Check that the external tools are available
    CheckTools,

    /// Display version information
    Version,
}
