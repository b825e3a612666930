// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the notes API, overrides the config file
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Print notes as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: Option<String>,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show whether a session token is stored
    Status,

    /// List active notes
    List {
        /// Only notes carrying this tag id
        #[arg(short, long, value_name = "TAG_ID")]
        tag: Option<i64>,
    },

    /// List archived notes
    Archived,

    /// Create a note
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short = 'b', long)]
        content: String,

        /// Tag id to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG_ID")]
        tags: Vec<i64>,

        /// Create this tag and attach it
        #[arg(long, value_name = "NAME")]
        new_tag: Option<String>,
    },

    /// Edit an active note
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        /// Tag id to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG_ID")]
        tags: Vec<i64>,

        /// Tag id to detach (repeatable)
        #[arg(long = "untag", value_name = "TAG_ID")]
        untags: Vec<i64>,

        /// Drop all current tags before applying --tag
        #[arg(long)]
        clear_tags: bool,

        /// Create this tag and attach it
        #[arg(long, value_name = "NAME")]
        new_tag: Option<String>,
    },

    /// Archive an active note
    Archive {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Restore an archived note
    Restore {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Delete an active note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Permanently delete an archived note
    Purge {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List tags
    Tags,

    /// Create a tag
    TagCreate {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Delete a tag from every note
    TagDelete {
        #[arg(value_name = "TAG_ID")]
        tag_id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}
