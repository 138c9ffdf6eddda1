//! CLI - Command Line Interface for Movie Maths
//!
//! Every equation the TUI can build is scriptable. All output is
//! JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Find the ids of two movies
//! moviemaths search "the matrix" --json
//!
//! # Add and subtract them
//! moviemaths add tt0133093 tt0109830
//! moviemaths subtract tt0133093 tt0109830
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::Operator;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Compute service failed or answered with an unknown movie
    ComputeFailed = 4,
    /// Nothing matched
    NotFound = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Movie Maths - add and subtract movies
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "moviemaths",
    version,
    about = "Add and subtract movies",
    long_about = "Pick two movies and see the movie you get by adding or \
                  subtracting them.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  moviemaths                              Launch interactive TUI\n\
                  moviemaths search \"alien\"               Find movie ids\n\
                  moviemaths add tt0078748 tt0093773      Alien + Predator\n\
                  moviemaths subtract tt0078748 tt0093773 Alien - Predator"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Pre-fill the first operand (TUI mode)
    #[arg(long)]
    pub first: Option<String>,

    /// Pre-fill the second operand (TUI mode)
    #[arg(long)]
    pub second: Option<String>,

    /// Start with subtraction instead of addition (TUI mode)
    #[arg(long)]
    pub subtract: bool,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Operator the TUI starts with
    pub fn initial_operator(&self) -> Operator {
        if self.subtract {
            Operator::Subtract
        } else {
            Operator::Add
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Add two movies
    #[command(visible_alias = "plus")]
    Add(CombineCmd),

    /// Subtract the second movie from the first
    #[command(visible_alias = "minus")]
    Subtract(CombineCmd),

    /// Look up a movie by IMDb id
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Find the poster for a title
    #[command(visible_alias = "p")]
    Poster(PosterCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title or fragment)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Skip the local fragment cache and always ask the remote catalog
    #[arg(long)]
    pub no_cache: bool,
}

// =============================================================================
// Add / Subtract Commands
// =============================================================================

/// Combine two movies by IMDb id
#[derive(Args, Debug)]
pub struct CombineCmd {
    /// IMDb id of the first movie (e.g., tt0133093)
    #[arg(required = true)]
    pub first: String,

    /// IMDb id of the second movie
    #[arg(required = true)]
    pub second: String,
}

// =============================================================================
// Resolve Command
// =============================================================================

/// Look up a movie by IMDb id
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// IMDb id (e.g., tt0133093)
    #[arg(required = true)]
    pub imdb_id: String,
}

// =============================================================================
// Poster Command
// =============================================================================

/// Find the poster URL for a title
#[derive(Args, Debug)]
pub struct PosterCmd {
    /// Movie title
    #[arg(required = true)]
    pub title: String,

    /// Release year to narrow the lookup
    #[arg(long, short = 'y')]
    pub year: Option<String>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Poster lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct PosterResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub image: Option<String>,
}

/// Equation response for add/subtract
#[derive(Debug, Serialize, Deserialize)]
pub struct EquationResponse {
    pub first: String,
    pub second: String,
    pub operator: Operator,
    pub result: crate::models::Movie,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDb ID Validation
// =============================================================================

/// Validate IMDb ID format (tt followed by digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    if id.starts_with("tt") && id.len() >= 9 && id[2..].chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid IMDb ID format (expected tt followed by 7+ digits)")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>([]);
        assert!(!cli.is_cli_mode());
        assert_eq!(cli.initial_operator(), Operator::Add);
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["moviemaths", "search", "batman"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "batman");
            assert_eq!(cmd.limit, 20);
            assert!(!cmd.no_cache);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_subtract_alias() {
        let cli = Cli::parse_from(["moviemaths", "minus", "tt0133093", "tt0109830"]);
        if let Some(Command::Subtract(cmd)) = cli.command {
            assert_eq!(cmd.first, "tt0133093");
            assert_eq!(cmd.second, "tt0109830");
        } else {
            panic!("Expected Subtract command");
        }
    }

    #[test]
    fn test_tui_prefill_flags() {
        let cli = Cli::parse_from([
            "moviemaths",
            "--first",
            "tt0078748",
            "--second",
            "tt0093773",
            "--subtract",
        ]);
        assert!(!cli.is_cli_mode());
        assert_eq!(cli.first.as_deref(), Some("tt0078748"));
        assert_eq!(cli.initial_operator(), Operator::Subtract);
    }

    #[test]
    fn test_validate_imdb_id() {
        assert!(validate_imdb_id("tt1877830").is_ok());
        assert!(validate_imdb_id("tt12345678").is_ok());
        assert!(validate_imdb_id("tt123456").is_err());
        assert!(validate_imdb_id("nm1234567").is_err());
        assert!(validate_imdb_id("1234567").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::ComputeFailed), 4);
        assert_eq!(i32::from(ExitCode::NotFound), 5);
    }
}
