use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::types::{IssueId, OptionId, Theme};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Defaults to the interactive session
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding the voting blobs
    #[arg(long, env = "VOTING_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Display name to vote and comment as (remembered for later runs)
    #[arg(long, env = "VOTING_USER", global = true)]
    pub user: Option<String>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long, env = "VOTING_MEMORY", global = true, default_value_t = false)]
    pub memory: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List issues with their vote totals
    List,
    /// Show an issue with its options, results and comments
    Show {
        /// Issue id (defaults to the first issue)
        issue: Option<IssueId>,
    },
    /// Cast your vote on an issue
    Vote { issue: IssueId, option: OptionId },
    /// Add a new issue
    Add(AddIssueArgs),
    /// Delete an issue (the last issue cannot be deleted)
    Delete { issue: IssueId },
    /// Reset every vote on every issue
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Comment on an issue
    Comment { issue: IssueId, text: String },
    /// Print the comment thread of an issue
    Comments { issue: IssueId },
    /// Show the theme, or set it to dark or light
    Theme { theme: Option<Theme> },
    /// Show the remembered display name, or change it
    Whoami { name: Option<String> },
    /// Start the interactive voting session
    Interactive,
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct AddIssueArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Option label; repeat at least twice
    #[arg(long = "option", short = 'o', required = true, num_args = 1)]
    pub options: Vec<String>,
}
