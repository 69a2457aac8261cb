/// Command-line arguments.
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use foldertally_core::logfile::DEFAULT_LOG_NAME;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foldertally")]
#[command(version, about = "Record subdirectory listings in a log and tally how often each folder appears", long_about = None)]
pub struct Cli {
    /// Increase diagnostic output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append the subdirectories of each ROOT to the log as one session.
    Scan {
        /// Directories to scan (default: current directory).
        #[arg(value_name = "ROOT")]
        roots: Vec<PathBuf>,

        /// Log file to append to.
        #[arg(short, long, default_value = DEFAULT_LOG_NAME)]
        log: PathBuf,

        /// Worker threads for multi-root scans (default: CPU count).
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Count sessions and folder occurrences in the log.
    Analyze {
        /// Log file to read.
        #[arg(short, long, default_value = DEFAULT_LOG_NAME)]
        log: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write json/csv output to this file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Count folders, files and file extensions under a directory.
    Stats {
        /// Directory to walk.
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write json/csv output to this file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Sort files into per-extension folders.
    Sort {
        /// Directory to sort.
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Sort every file (uppercase folders), not only photos and videos.
        #[arg(long)]
        all: bool,

        /// Include files in subdirectories.
        #[arg(short, long)]
        recursive: bool,

        /// Copy instead of move.
        #[arg(long)]
        copy: bool,

        /// Show what would happen without changing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Put files moved by the last sort(s) back where they were.
    Undo {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Interactive menu: scan, analyze, clear.
    Menu {
        #[arg(short, long, default_value = DEFAULT_LOG_NAME)]
        log: PathBuf,

        /// Directory scanned by the menu's scan option.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}
