//! Industry matcher: resolves a free-text query against the reference table.
//!
//! Three tiers, strictly in priority order, stopping once `max_results` is reached:
//! 1. exact: case-insensitive equality with the industry name
//! 2. substring: the query is contained in the name (never the reverse)
//! 3. fuzzy-token: each run of ≥2 CJK characters in the query, in query order,
//!    is matched as a substring of the name
//!
//! Within a tier, results follow table order. A name is emitted at most once.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::industry::combination::classify;
use crate::industry::models::{IndustryRecord, IndustryTable, MatchResult, MatchTier};

static CJK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]+").expect("valid CJK regex"));

const MIN_TOKEN_CHARS: usize = 2;

/// Maximal CJK runs of at least two characters, in query order.
pub fn cjk_tokens(query: &str) -> Vec<&str> {
    CJK_RUN
        .find_iter(query)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

pub fn match_industry(table: &IndustryTable, query: &str, max_results: usize) -> Vec<MatchResult> {
    let query = query.trim();
    if query.is_empty() || max_results == 0 {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let names: Vec<String> = table
        .records()
        .iter()
        .map(|r| r.name.to_lowercase())
        .collect();
    let mut collector = Collector::new(max_results);

    for (record, name) in table.records().iter().zip(&names) {
        if *name == query_lower && collector.push(record, name, MatchTier::Exact) {
            return collector.finish();
        }
    }

    for (record, name) in table.records().iter().zip(&names) {
        if name.contains(&query_lower) && collector.push(record, name, MatchTier::Substring) {
            return collector.finish();
        }
    }

    for token in cjk_tokens(query) {
        for (record, name) in table.records().iter().zip(&names) {
            if name.contains(token) && collector.push(record, name, MatchTier::FuzzyToken) {
                return collector.finish();
            }
        }
    }

    collector.finish()
}

struct Collector<'a> {
    limit: usize,
    seen: HashSet<&'a str>,
    results: Vec<MatchResult>,
}

impl<'a> Collector<'a> {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            results: Vec::new(),
        }
    }

    /// Records a match unless the name was already emitted. Returns true once full.
    fn push(&mut self, record: &IndustryRecord, name_lower: &'a str, tier: MatchTier) -> bool {
        if self.seen.insert(name_lower) {
            self.results.push(MatchResult {
                record: record.clone(),
                tier,
                combination: classify(&record.lifecycle_stage, None),
            });
        }
        self.results.len() >= self.limit
    }

    fn finish(self) -> Vec<MatchResult> {
        self.results
    }
}
