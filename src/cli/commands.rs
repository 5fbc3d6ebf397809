//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canvas LMS REST client
#[derive(Parser, Debug)]
#[command(name = "canvas-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Canvas instance URL
    #[arg(long, global = true, env = "CANVAS_BASE_URL")]
    pub base_url: Option<String>,

    /// Access token
    #[arg(long, global = true, env = "CANVAS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Page size for listings
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Execute every request as this user (numeric id or `sis_user_id:...`)
    #[arg(long, global = true)]
    pub as_user: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the token by fetching the current user
    Check,

    /// Fetch one object or page
    Get {
        /// API path, e.g. /api/v1/courses/1
        path: String,

        /// Query parameter (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Stream every item of a listing, one per line
    List {
        /// API path, e.g. /api/v1/accounts/1/courses
        path: String,

        /// Query parameter (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,
    },

    /// List the courses of an account
    Courses {
        /// Account id
        #[arg(long)]
        account: String,

        /// Associations to include (comma-separated, e.g. term,teachers)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,
    },

    /// List the users of an account
    Users {
        /// Account id
        #[arg(long)]
        account: String,
    },

    /// List the enrollments of a course
    Enrollments {
        /// Course id
        #[arg(long)]
        course: String,

        /// Enrollment types (comma-separated, e.g. StudentEnrollment)
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<String>,
    },

    /// List the enrollment terms of an account
    Terms {
        /// Account id
        #[arg(long)]
        account: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse `key=value`
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
