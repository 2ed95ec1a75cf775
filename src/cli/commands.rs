//! Command implementations for the sitesearch CLI.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::content::{Activity, BlogPost, Project};
use crate::document::Searchable;
use crate::error::{Result, SitesearchError};
use crate::highlight;
use crate::history::{FileHistoryStore, SearchHistory};
use crate::query::{parse_query, query_to_string};
use crate::search::{SearchConfig, SearchEngine};

/// Execute a CLI command.
pub fn execute_command(args: SitesearchArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => run_search(search_args, &args),
        Command::Parse(parse_args) => run_parse(parse_args, &args),
        Command::Highlight(highlight_args) => run_highlight(highlight_args, &args),
        Command::History(history_args) => run_history(history_args, &args),
    }
}

/// Search a file of items.
fn run_search(args: &SearchArgs, cli_args: &SitesearchArgs) -> Result<()> {
    let output = search_file(args)?;
    output_result(
        &format!("Searched {} for '{}'", args.items_file.display(), args.query),
        &output,
        cli_args,
    )
}

/// Load the items file, index it and run the query.
pub fn search_file(args: &SearchArgs) -> Result<SearchOutput> {
    let raw = fs::read_to_string(&args.items_file)
        .with_context(|| format!("Failed to read {}", args.items_file.display()))?;
    let config = build_config(args)?;

    match args.kind {
        ContentKind::Blog => search_items::<BlogPost>(&raw, config, args),
        ContentKind::Activity => search_items::<Activity>(&raw, config, args),
        ContentKind::Project => search_items::<Project>(&raw, config, args),
        ContentKind::Json => search_items::<Value>(&raw, config, args),
    }
}

/// Start from the content type's defaults and apply command line overrides.
pub fn build_config(args: &SearchArgs) -> Result<SearchConfig> {
    if args.limit == 0 {
        return Err(SitesearchError::invalid_argument("--limit must be at least 1"));
    }

    let mut config = match args.kind {
        ContentKind::Blog => BlogPost::default_config(),
        ContentKind::Activity => Activity::default_config(),
        ContentKind::Project => Project::default_config(),
        ContentKind::Json => SearchConfig::default(),
    };

    if !args.fields.is_empty() {
        config.fields = args.fields.clone();
    }
    for filter_field in &args.filter_fields {
        if !config.filter_fields.contains(filter_field) {
            config.filter_fields.push(filter_field.clone());
        }
    }
    if let Some(threshold) = args.threshold {
        config.fuzzy_threshold = threshold;
    }
    if let Some(key) = &args.key {
        config.history_storage_key = key.clone();
    }
    config.max_results = Some(args.limit);

    if config.fields.is_empty() {
        return Err(SitesearchError::configuration(
            "No searchable fields; pass --field NAME[:WEIGHT]",
        ));
    }
    config.validate()?;
    Ok(config)
}

fn search_items<T>(raw: &str, config: SearchConfig, args: &SearchArgs) -> Result<SearchOutput>
where
    T: Searchable + Sync + DeserializeOwned,
{
    let items: Vec<T> = serde_json::from_str(raw)
        .with_context(|| format!("Invalid items in {}", args.items_file.display()))?;
    debug!("loaded {} items from {}", items.len(), args.items_file.display());

    let id_field = config.id_field.clone();
    let mut engine = SearchEngine::new(items, config)?;
    if let Some(dir) = &args.history_dir {
        let store = FileHistoryStore::new(dir)?;
        engine = engine.with_history(Arc::new(store));
    }

    let start_time = Instant::now();
    let results = engine.search(&args.query);
    let duration = start_time.elapsed();
    info!("{} results in {:?}", results.len(), duration);
    engine.flush_history();

    let hits: Vec<SearchHit> = results
        .iter()
        .map(|result| {
            let id = result
                .item
                .field(&id_field)
                .map(|value| value.to_text())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| result.index.to_string());
            SearchHit {
                index: result.index,
                id,
                score: result.score,
                matched_terms: result.matched_terms.clone(),
                matches: result
                    .matches
                    .iter()
                    .map(|m| MatchOutput {
                        field: m.field.clone(),
                        excerpt: m.excerpt.clone(),
                        positions: m.positions.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(SearchOutput {
        query: args.query.clone(),
        parsed: engine.parse(&args.query),
        total_hits: hits.len(),
        duration_ms: duration.as_millis() as u64,
        hits,
    })
}

/// Show how a query parses.
fn run_parse(args: &ParseArgs, cli_args: &SitesearchArgs) -> Result<()> {
    let parsed = parse_query(&args.query);
    let canonical = query_to_string(&parsed);
    output_result(
        &format!("Parsed '{}'", args.query),
        &ParseOutput { parsed, canonical },
        cli_args,
    )
}

/// Highlight a text.
fn run_highlight(args: &HighlightArgs, cli_args: &SitesearchArgs) -> Result<()> {
    let parsed = parse_query(&args.query);
    let output = HighlightOutput {
        segments: highlight::highlight(&args.text, &parsed),
        excerpt: args
            .excerpt
            .map(|max_length| highlight::excerpt(&args.text, &parsed, max_length)),
    };
    output_result(&format!("Highlighted '{}'", args.query), &output, cli_args)
}

/// Inspect or edit stored history.
fn run_history(args: &HistoryArgs, cli_args: &SitesearchArgs) -> Result<()> {
    if args.max_items == 0 {
        return Err(SitesearchError::invalid_argument("--max-items must be at least 1"));
    }
    let store = FileHistoryStore::new(&args.history_dir)?;
    let history = SearchHistory::new(Arc::new(store), args.key.clone(), args.max_items);

    let (action, items) = match &args.action {
        HistoryAction::List { limit } => ("list", history.load(*limit)),
        HistoryAction::Clear => {
            history.clear();
            ("clear", history.load(args.max_items))
        }
        HistoryAction::Remove { query } => {
            history.remove(query);
            ("remove", history.load(args.max_items))
        }
    };

    output_result(
        &format!("History '{}' in {}", args.key, args.history_dir.display()),
        &HistoryOutput {
            key: args.key.clone(),
            action: action.to_string(),
            items,
        },
        cli_args,
    )
}
