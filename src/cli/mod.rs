//! Command-line interface for the ragdesk binary.
//!
//! Uses clap for argument parsing and owo-colors for colored terminal
//! output. Each subcommand maps to a screen of the original client; the
//! auth gate is applied in [`commands`] before a protected command runs.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragdesk - terminal client for a retrieval-augmented document chat service
#[derive(Parser, Debug)]
#[command(
    name = "ragdesk",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Terminal client for a retrieval-augmented document chat service",
    long_about = "Terminal client for a retrieval-augmented document chat service:\n\
                  log in, manage documents and collections, and chat with the\n\
                  assistant over your indexed documents.",
    after_help = "EXAMPLES:\n    \
                  ragdesk login alice           # Log in (prompts for password)\n    \
                  ragdesk docs list --search q1 # Filter the document list\n    \
                  ragdesk docs upload report.pdf --title \"Q1 Report\"\n    \
                  ragdesk chat                  # Interactive chat session\n    \
                  ragdesk chat --live           # Chat against the real backend"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ragdesk.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the bearer token
    Login {
        /// Account username
        username: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Register a new account
    Register {
        /// Account username
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Full display name
        #[arg(short, long)]
        full_name: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and clear the stored token
    Logout,

    /// Show the authenticated user's profile
    Whoami,

    /// Manage documents
    #[command(subcommand)]
    Docs(DocsCommands),

    /// Manage collections
    #[command(subcommand)]
    Collections(CollectionCommands),

    /// Administer users
    #[command(subcommand)]
    Users(UserCommands),

    /// Administer roles
    #[command(subcommand)]
    Roles(RoleCommands),

    /// Interactive chat session
    Chat {
        /// Use the in-process mock assistant
        #[arg(long, conflicts_with = "live")]
        mock: bool,

        /// Use the live /chat endpoint
        #[arg(long)]
        live: bool,
    },

    /// Show the resolved configuration
    Config,
}

/// Document management subcommands
#[derive(Subcommand, Debug)]
pub enum DocsCommands {
    /// List documents
    List {
        /// Filter by substring on title, description, or file name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show details for one document
    Show {
        /// Document id
        id: i64,
    },

    /// Upload files as a new document
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Document title
        #[arg(short, long)]
        title: String,

        /// Document description
        #[arg(short, long)]
        description: Option<String>,

        /// Collection to file the document under
        #[arg(long)]
        collection: Option<i64>,
    },

    /// Delete a document
    Delete {
        /// Document id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Collection management subcommands
#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// List collections
    List,

    /// Create a collection
    Create {
        /// Collection name
        name: String,

        /// Collection description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a collection
    Delete {
        /// Collection id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// User administration subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    List,

    /// Show one user
    Show {
        /// User id
        id: i64,
    },

    /// Delete a user
    Delete {
        /// User id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Role administration subcommands
#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// List roles
    List,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
