//! Output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{OutputFormat, SitesearchArgs};
use crate::error::Result;
use crate::highlight::HighlightSegment;
use crate::history::SearchHistoryItem;
use crate::query::ParsedQuery;

/// Command results that know how to print themselves for a terminal.
pub trait HumanOutput {
    /// Print in human-readable form.
    fn print_human(&self, args: &SitesearchArgs);
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput {
    pub query: String,
    pub parsed: ParsedQuery,
    pub total_hits: usize,
    pub duration_ms: u64,
    pub hits: Vec<SearchHit>,
}

/// One ranked hit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub index: usize,
    pub id: String,
    pub score: f32,
    pub matched_terms: Vec<String>,
    pub matches: Vec<MatchOutput>,
}

/// A matched field with its excerpt.
#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub field: String,
    pub excerpt: String,
    pub positions: Vec<(usize, usize)>,
}

/// Result structure for query parsing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    pub parsed: ParsedQuery,
    pub canonical: String,
}

/// Result structure for highlighting.
#[derive(Debug, Serialize)]
pub struct HighlightOutput {
    pub segments: Vec<HighlightSegment>,
    pub excerpt: Option<String>,
}

/// Result structure for history commands.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub key: String,
    pub action: String,
    pub items: Vec<SearchHistoryItem>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &SitesearchArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SitesearchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanOutput for SearchOutput {
    fn print_human(&self, args: &SitesearchArgs) {
        if self.hits.is_empty() {
            println!("No results for '{}'", self.query);
            return;
        }

        println!("Search Results: {} hits ({} ms)", self.total_hits, self.duration_ms);
        println!("═══════════════");

        for (i, hit) in self.hits.iter().enumerate() {
            println!();
            println!("{}. {} (Score: {:.3})", i + 1, hit.id, hit.score);
            for m in &hit.matches {
                println!("   {}: {}", m.field, mark_ranges(&m.excerpt, &m.positions));
            }
            if args.verbosity() > 1 && !hit.matched_terms.is_empty() {
                println!("   matched: {}", hit.matched_terms.join(", "));
            }
        }
    }
}

impl HumanOutput for ParseOutput {
    fn print_human(&self, _args: &SitesearchArgs) {
        let parsed = &self.parsed;
        println!("terms:       {}", parsed.terms.join(", "));
        println!("phrases:     {}", parsed.phrases.join(", "));
        println!("excludes:    {}", parsed.exclude_terms.join(", "));
        for (field, values) in &parsed.filters {
            println!("filter:      {field} = {}", values.join(" | "));
        }
        println!("filter only: {}", parsed.is_filter_only);
        println!("canonical:   {}", self.canonical);
    }
}

impl HumanOutput for HighlightOutput {
    fn print_human(&self, _args: &SitesearchArgs) {
        println!("{}", mark_segments(&self.segments));
        if let Some(excerpt) = &self.excerpt {
            println!("excerpt: {excerpt}");
        }
    }
}

impl HumanOutput for HistoryOutput {
    fn print_human(&self, _args: &SitesearchArgs) {
        match self.action.as_str() {
            "list" if self.items.is_empty() => println!("No search history under '{}'", self.key),
            "list" => {
                for item in &self.items {
                    println!(
                        "{}  {} ({} results)",
                        format_timestamp(item.timestamp),
                        item.query,
                        item.result_count
                    );
                }
            }
            action => println!("{action}: '{}' now holds {} entries", self.key, self.items.len()),
        }
    }
}

/// Wrap highlighted segments in square brackets.
pub fn mark_segments(segments: &[HighlightSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                format!("[{}]", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect()
}

/// Wrap character ranges of `text` in square brackets.
///
/// Ranges must be sorted; overlapping or out-of-bounds parts are skipped.
pub fn mark_ranges(text: &str, ranges: &[(usize, usize)]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut marked = String::with_capacity(text.len() + ranges.len() * 2);
    let mut pos = 0;

    for &(start, end) in ranges {
        let start = start.max(pos).min(chars.len());
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        marked.extend(&chars[pos..start]);
        marked.push('[');
        marked.extend(&chars[start..end]);
        marked.push(']');
        pos = end;
    }
    marked.extend(&chars[pos..]);
    marked
}

/// Format epoch milliseconds as a UTC date and time.
fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_segments() {
        let segments = vec![
            HighlightSegment::new("Hello", true),
            HighlightSegment::new(" world", false),
        ];
        assert_eq!(mark_segments(&segments), "[Hello] world");
        assert_eq!(mark_segments(&[]), "");
    }

    #[test]
    fn test_mark_ranges() {
        assert_eq!(mark_ranges("zero trust", &[(0, 4), (5, 10)]), "[zero] [trust]");
        assert_eq!(mark_ranges("héllo wörld", &[(6, 11)]), "héllo [wörld]");
        assert_eq!(mark_ranges("abc", &[]), "abc");
        // Out of bounds and overlapping ranges are clipped.
        assert_eq!(mark_ranges("abc", &[(1, 10), (2, 3)]), "a[bc]");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
    }
}
