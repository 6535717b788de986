//! Free-text search over the verse corpus.
//!
//! A [`Matcher`] normalizes and tokenizes the query once and scores raw
//! haystacks by phrase and token heuristics. The [`SearchIndex`] flattens
//! the corpus into per-verse records whose haystack also carries the surah
//! names and numbers, so a query for a surah name or number surfaces its
//! verses. The numeric weights are policy; only the ranking-order
//! properties are contractual.

use std::ops::Range;

use crate::corpus::Corpus;
use crate::normalize::{normalize, tokenize};

/// Bonus for the full normalized query occurring as a substring.
const PHRASE_BONUS: i32 = 60;
/// Bonus per matched token.
const TOKEN_BONUS: i32 = 20;
/// Extra bonus for a token found within the leading window.
const EARLY_BONUS: i32 = 4;
/// Window (in normalized chars) considered "early" in the haystack.
const EARLY_WINDOW: usize = 30;
/// Penalty per unmatched token.
const MISS_PENALTY: i32 = 6;

/// Cap on ranked results, bounding render cost.
pub const MAX_RESULTS: usize = 400;

/// Minimum token length considered for highlighting.
const MIN_HIGHLIGHT_TOKEN: usize = 2;

/// A compiled query.
#[derive(Debug, Clone)]
pub struct Matcher {
    normalized_query: String,
    tokens: Vec<String>,
}

impl Matcher {
    pub fn new(query: &str) -> Self {
        Matcher {
            normalized_query: normalize(query),
            tokens: tokenize(query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_query.is_empty()
    }

    /// Score a raw haystack. Zero means no match; an empty query matches
    /// every non-empty haystack with a flat score of 1.
    pub fn score(&self, haystack: &str) -> u32 {
        let target = normalize(haystack);
        if target.is_empty() {
            return 0;
        }
        if self.normalized_query.is_empty() {
            return 1;
        }

        let mut score: i32 = 0;
        let mut matched_tokens = 0usize;
        let phrase_hit = target.contains(&self.normalized_query);
        if phrase_hit {
            score += PHRASE_BONUS;
        }

        for token in &self.tokens {
            match target.find(token) {
                Some(byte_idx) => {
                    matched_tokens += 1;
                    score += TOKEN_BONUS;
                    let char_idx = target[..byte_idx].chars().count();
                    if char_idx < EARLY_WINDOW {
                        score += EARLY_BONUS;
                    }
                }
                None => score -= MISS_PENALTY,
            }
        }

        if matched_tokens == 0 && !phrase_hit {
            return 0;
        }
        score.max(0) as u32
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.score(haystack) > 0
    }
}

/// One searchable verse record.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub surah_id: u32,
    pub surah_name: String,
    pub ayah_number: u32,
    pub ayah_text: String,
    haystack: String,
}

/// Flattened per-verse search records, built once per corpus.
#[derive(Debug)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let entries = corpus
            .surahs()
            .iter()
            .flat_map(|surah| {
                surah.verses.iter().map(|verse| {
                    let haystack = normalize(&format!(
                        "{} {} {} {} {}",
                        verse.text, surah.name, surah.english_name, surah.id, verse.ayah_number
                    ));
                    IndexEntry {
                        surah_id: surah.id,
                        surah_name: surah.name.clone(),
                        ayah_number: verse.ayah_number,
                        ayah_text: verse.text.clone(),
                        haystack,
                    }
                })
            })
            .collect();
        SearchIndex { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub surah_id: u32,
    pub surah_name: String,
    pub ayah_number: u32,
    pub text: String,
    pub score: u32,
    /// Byte ranges of literal query-token occurrences in `text`.
    pub highlights: Vec<Range<usize>>,
}

/// Rank index entries against a query. Results are capped at
/// [`MAX_RESULTS`], ordered by descending score with `(surah, ayah)` as
/// the deterministic tie-break. Blank queries are a view-level concern and
/// must be intercepted before calling this.
pub fn search(index: &SearchIndex, query: &str) -> Vec<SearchHit> {
    let matcher = Matcher::new(query);
    let mut hits: Vec<SearchHit> = index
        .entries
        .iter()
        .filter_map(|entry| {
            let score = matcher.score(&entry.haystack);
            if score == 0 {
                return None;
            }
            Some(SearchHit {
                surah_id: entry.surah_id,
                surah_name: entry.surah_name.clone(),
                ayah_number: entry.ayah_number,
                text: entry.ayah_text.clone(),
                score,
                highlights: highlight_ranges(&entry.ayah_text, query),
            })
        })
        .collect();
    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.surah_id.cmp(&b.surah_id))
            .then(a.ayah_number.cmp(&b.ayah_number))
    });
    hits.truncate(MAX_RESULTS);
    hits
}

/// Byte ranges where raw query tokens occur literally in the raw text, so
/// highlighting keeps diacritics visible. Tokens shorter than two chars are
/// skipped; overlapping ranges are merged.
pub fn highlight_ranges(text: &str, raw_query: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for token in raw_query.split_whitespace() {
        if token.chars().count() < MIN_HIGHLIGHT_TOKEN {
            continue;
        }
        let mut from = 0;
        while let Some(pos) = text[from..].find(token) {
            let start = from + pos;
            let end = start + token.len();
            ranges.push(start..end);
            from = end;
        }
    }
    ranges.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<Range<usize>> = Vec::new();
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
