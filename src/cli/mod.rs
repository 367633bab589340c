// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Top-level CLI parser for the `classify-admin` binary.
#[derive(Debug, Parser)]
#[command(
    name = "classify-admin",
    version,
    about = "Management client for the post classification platform"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides CLASSIFY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides CLASSIFY_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Log in and remember the identity.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create a `user` account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the remembered identity.
    Logout,
    /// Show the current identity.
    Whoami,
    /// Show the navigation menu for the current role.
    Menu,
    /// Resolve a route the way the navigator would.
    Open { path: String },
    /// User accounts (admin).
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Research studies (investigator).
    Studies {
        #[command(subcommand)]
        action: StudyCommands,
    },
    /// Classification categories (investigator).
    Categories {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Questions (investigator).
    Questions {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Imported posts (investigator).
    Posts {
        #[command(subcommand)]
        action: PostCommands,
    },
    /// User-to-study associations (investigator).
    Groups {
        #[command(subcommand)]
        action: GroupCommands,
    },
    /// Classification statistics chart.
    Stats {
        /// Highlight the first user containing this text
        #[arg(long)]
        search: Option<String>,
        /// Chart viewport width used to compute the scroll position
        #[arg(long, default_value_t = 800)]
        viewport: u32,
    },
}

#[derive(Clone, Debug, Args)]
pub struct PageArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Clone, Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    List(PageArgs),
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// user, admin or investigator
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Edit an account; omitted fields keep their value.
    Edit {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    Delete(DeleteArgs),
}

#[derive(Clone, Debug, Subcommand)]
pub enum StudyCommands {
    List(PageArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        obs: String,
        #[arg(long)]
        min_classifications: Option<u32>,
        /// Validation agreement percentage, 0-100
        #[arg(long)]
        percent: Option<f64>,
        /// Deadline, RFC 3339 or YYYY-MM-DDTHH:MM
        #[arg(long)]
        finished_at: Option<String>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        obs: Option<String>,
        #[arg(long)]
        min_classifications: Option<u32>,
        #[arg(long)]
        percent: Option<f64>,
        /// New deadline; an empty value removes it
        #[arg(long)]
        finished_at: Option<String>,
    },
    Delete(DeleteArgs),
}

#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    List(PageArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        category_type: String,
        #[arg(long)]
        question: Option<i64>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        category_type: Option<String>,
        #[arg(long)]
        question: Option<i64>,
    },
    Delete(DeleteArgs),
    /// Suggested category types.
    Types,
    /// Questions a category can be attached to.
    Questions,
}

#[derive(Clone, Debug, Subcommand)]
pub enum QuestionCommands {
    List(PageArgs),
    Create {
        #[arg(long)]
        question: String,
        #[arg(long)]
        content: String,
        /// radio or checkbox
        #[arg(long, default_value = "radio")]
        input_type: String,
        #[arg(long)]
        study: Option<i64>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        input_type: Option<String>,
        #[arg(long)]
        study: Option<i64>,
    },
    Delete(DeleteArgs),
}

#[derive(Clone, Debug, Subcommand)]
pub enum PostCommands {
    List {
        /// Match page name or details
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        study: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Import a JSON array of posts into a study.
    Import {
        file: PathBuf,
        #[arg(long)]
        study: Option<i64>,
    },
    /// Save a post's first image to a file.
    Image { id: i64, output: PathBuf },
}

#[derive(Clone, Debug, Subcommand)]
pub enum GroupCommands {
    List(PageArgs),
    /// Associate a user with a study.
    Add {
        #[arg(long)]
        user: Option<i64>,
        #[arg(long)]
        study: Option<i64>,
    },
    /// Move an association to another study.
    Move {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: Option<i64>,
    },
    Remove {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        study: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Users that can be associated.
    Candidates,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "classify-admin",
            "studies",
            "list",
            "--page",
            "2",
            "--api-url",
            "http://backend:3001",
        ])
        .expect("cli should parse");

        assert_eq!(cli.api_url.as_deref(), Some("http://backend:3001"));
        assert!(matches!(
            cli.command,
            Commands::Studies {
                action: StudyCommands::List(PageArgs { page: 2 })
            }
        ));
    }
}
