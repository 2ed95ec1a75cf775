//! Command line argument parsing for the sitesearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::search::config::{DEFAULT_HISTORY_STORAGE_KEY, DEFAULT_MAX_HISTORY_ITEMS, SearchableField};

/// sitesearch - weighted fuzzy search over site content
#[derive(Parser, Debug, Clone)]
#[command(name = "sitesearch")]
#[command(about = "Weighted fuzzy search over blog posts, activities and projects")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SitesearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SitesearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search a JSON array of items
    Search(SearchArgs),

    /// Show how a query is parsed
    Parse(ParseArgs),

    /// Highlight query matches in a text
    Highlight(HighlightArgs),

    /// Inspect or edit stored search history
    History(HistoryArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// JSON file holding an array of items
    #[arg(value_name = "ITEMS_FILE")]
    pub items_file: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Content type of the items
    #[arg(short, long, default_value = "json")]
    pub kind: ContentKind,

    /// Searchable field as `name` or `name:weight` (repeatable; replaces the
    /// content type's defaults)
    #[arg(long = "field", value_name = "NAME[:WEIGHT]", value_parser = parse_field_spec)]
    pub fields: Vec<SearchableField>,

    /// Attribute indexed for `field:value` filters only (repeatable)
    #[arg(long = "filter-field", value_name = "NAME")]
    pub filter_fields: Vec<String>,

    /// Maximum fuzzy distance for a match (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Record the search in history files under this directory
    #[arg(long, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// History key (defaults to the content type's key)
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for parsing a query
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Arguments for highlighting
#[derive(Parser, Debug, Clone)]
pub struct HighlightArgs {
    /// Text to highlight
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Also produce an excerpt of at most this many characters
    #[arg(short, long, value_name = "LENGTH")]
    pub excerpt: Option<usize>,
}

/// Arguments for the history command
#[derive(Parser, Debug, Clone)]
pub struct HistoryArgs {
    /// History action
    #[command(subcommand)]
    pub action: HistoryAction,

    /// Directory holding history files
    #[arg(long, value_name = "DIR", global = true, default_value = ".")]
    pub history_dir: PathBuf,

    /// History key
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_STORAGE_KEY)]
    pub key: String,

    /// Maximum number of entries kept
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_HISTORY_ITEMS)]
    pub max_items: usize,
}

/// History actions
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// List recent searches, most recent first
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Remove every entry
    Clear,

    /// Remove one query, ignoring case
    Remove {
        /// Query to remove
        #[arg(value_name = "QUERY")]
        query: String,
    },
}

/// Content types the CLI can load
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Blog posts
    Blog,
    /// Professional activities
    Activity,
    /// Portfolio projects
    Project,
    /// Arbitrary JSON objects; requires `--field`
    Json,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Parse a `name` or `name:weight` field specification.
pub fn parse_field_spec(spec: &str) -> std::result::Result<SearchableField, String> {
    let (name, weight) = match spec.rsplit_once(':') {
        Some((name, weight)) => {
            let weight: f32 = weight
                .trim()
                .parse()
                .map_err(|_| format!("invalid weight in field '{spec}'"))?;
            (name.trim(), weight)
        }
        None => (spec.trim(), 1.0),
    };

    if name.is_empty() {
        return Err(format!("missing field name in '{spec}'"));
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err(format!("field weight must be positive in '{spec}'"));
    }

    Ok(SearchableField::new(name).weight(weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let args = SitesearchArgs::try_parse_from([
            "sitesearch",
            "search",
            "posts.json",
            "rust -legacy",
            "--kind",
            "blog",
            "--field",
            "title:2",
            "--field",
            "content",
            "--limit",
            "5",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.items_file, PathBuf::from("posts.json"));
            assert_eq!(search_args.query, "rust -legacy");
            assert_eq!(search_args.kind, ContentKind::Blog);
            assert_eq!(search_args.fields.len(), 2);
            assert_eq!(search_args.fields[0].name, "title");
            assert_eq!(search_args.fields[0].weight, 2.0);
            assert_eq!(search_args.fields[1].weight, 1.0);
            assert_eq!(search_args.limit, 5);
            assert!(search_args.history_dir.is_none());
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_history_args() {
        let args = SitesearchArgs::try_parse_from([
            "sitesearch",
            "history",
            "remove",
            "rust",
            "--history-dir",
            "/tmp/history",
            "--key",
            "blog-search-history",
        ])
        .unwrap();

        if let Command::History(history_args) = args.command {
            assert_eq!(history_args.history_dir, PathBuf::from("/tmp/history"));
            assert_eq!(history_args.key, "blog-search-history");
            assert_eq!(history_args.max_items, DEFAULT_MAX_HISTORY_ITEMS);
            assert!(matches!(
                history_args.action,
                HistoryAction::Remove { ref query } if query == "rust"
            ));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = SitesearchArgs::try_parse_from(["sitesearch", "parse", "q"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = SitesearchArgs::try_parse_from(["sitesearch", "-vv", "parse", "q"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args =
            SitesearchArgs::try_parse_from(["sitesearch", "--quiet", "parse", "q"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            SitesearchArgs::try_parse_from(["sitesearch", "--format", "json", "parse", "q"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_field_spec() {
        let field = parse_field_spec("title").unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.weight, 1.0);

        let field = parse_field_spec("tags:1.5").unwrap();
        assert_eq!(field.name, "tags");
        assert_eq!(field.weight, 1.5);

        assert!(parse_field_spec("title:heavy").is_err());
        assert!(parse_field_spec(":2").is_err());
        assert!(parse_field_spec("title:0").is_err());
        assert!(parse_field_spec("title:-1").is_err());
    }
}
