//! Criterion benchmarks for sitesearch.
//!
//! Covers index construction, query execution (fuzzy, phrase and
//! filter-only), query parsing, highlighting and excerpts.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use sitesearch::highlight::{Highlighter, excerpt};
use sitesearch::index::build_index;
use sitesearch::query::parse_query;
use sitesearch::search::{SearchConfig, search};

const WORDS: &[&str] = &[
    "search", "engine", "security", "zero", "trust", "cloud", "kubernetes", "rust", "async",
    "tokio", "legacy", "api", "gateway", "identity", "proxy", "cluster", "latency", "cache",
    "index", "query", "phrase", "filter", "relevance", "ranking", "excerpt", "highlight",
    "history", "storage", "blog", "project",
];

const CATEGORIES: &[&str] = &["security", "programming", "cloud", "archive"];

/// Generate blog-like items with a pseudo-random word distribution.
fn generate_items(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let words = |len: usize, salt: usize| {
                (0..len)
                    .map(|j| WORDS[(i * 7 + j * 13 + salt) % WORDS.len()])
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            json!({
                "id": i.to_string(),
                "title": words(4 + i % 4, 1),
                "tags": [WORDS[i % WORDS.len()], WORDS[(i * 3) % WORDS.len()]],
                "content": words(80 + i % 120, 5),
                "category": CATEGORIES[i % CATEGORIES.len()],
            })
        })
        .collect()
}

fn config() -> SearchConfig {
    SearchConfig::builder()
        .weighted_field("title", 2.0)
        .weighted_field("tags", 1.5)
        .weighted_field("content", 0.5)
        .filter_field("category")
        .build()
        .unwrap()
}

/// Benchmark index construction.
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    let config = config();

    for count in [100, 1000] {
        let items = generate_items(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| black_box(build_index(black_box(items), &config).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark query execution over a prebuilt index.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let config = config();
    let items = generate_items(1000);
    let index = build_index(&items, &config).unwrap();

    let queries = [
        ("exact_term", "kubernetes"),
        ("typo_term", "kuberntes"),
        ("multi_term", "zero trust identity"),
        ("phrase_and_exclusion", r#""zero trust" -legacy"#),
        ("filter_only", "category:security tag:rust"),
    ];
    for (name, input) in queries {
        let query = parse_query(input);
        group.bench_function(name, |b| {
            b.iter(|| black_box(search(&items, &index, black_box(&query), &config)))
        });
    }

    group.finish();
}

/// Benchmark parsing, highlighting and excerpts.
fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    let items = generate_items(1);
    let content = items[0]["content"].as_str().unwrap_or_default().to_string();
    let query = parse_query(r#"security "zero trust" -legacy tag:api"#);

    group.bench_function("parse_query", |b| {
        b.iter(|| black_box(parse_query(black_box(r#"security "zero trust" -legacy tag:api"#))))
    });

    let highlighter = Highlighter::new(&query);
    group.bench_function("highlight", |b| {
        b.iter(|| black_box(highlighter.highlight(black_box(&content))))
    });

    group.bench_function("excerpt", |b| {
        b.iter(|| black_box(excerpt(black_box(&content), &query, 200)))
    });

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_search, bench_text);

criterion_main!(benches);
