//! Canonical mushaf page mapping.
//!
//! `data/quran_page_map.json` carries `{ "totalPages": n, "map": { "2:255": 42, .. } }`.
//! When present it is authoritative for pagination; when absent or
//! malformed the paginator falls back to greedy packing. The distinction is
//! carried as an explicit [`PaginationSource`] rather than a nullable field.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// Nominal page count of the standard printed mushaf.
pub const STANDARD_MUSHAF_PAGES: u32 = 604;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMapFile {
    total_pages: u32,
    map: HashMap<String, u32>,
}

/// Verse-to-page lookup table for the canonical mushaf layout.
#[derive(Debug, Clone)]
pub struct PageMap {
    total_pages: u32,
    map: HashMap<(u32, u32), u32>,
}

impl PageMap {
    /// Parse from the JSON fixture. Malformed `"surah:ayah"` keys are
    /// skipped with a warning rather than failing the whole map; a map
    /// declaring zero pages could hold no verse at all and is rejected so
    /// loaders degrade to packed pagination.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let file: PageMapFile = serde_json::from_str(json)?;
        if file.total_pages == 0 {
            return Err(Error::EmptyPageMap);
        }
        let mut map = HashMap::with_capacity(file.map.len());
        for (key, page) in file.map {
            match parse_verse_key(&key) {
                Some(pair) => {
                    map.insert(pair, page);
                }
                None => log::warn!("page map: skipping malformed verse key {key:?}"),
            }
        }
        Ok(PageMap {
            total_pages: file.total_pages,
            map,
        })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Page number for a verse, if mapped and within range. Out-of-range
    /// pages are treated as misses so the caller's carry-forward applies.
    pub fn page_of(&self, surah_id: u32, ayah_number: u32) -> Option<u32> {
        self.map
            .get(&(surah_id, ayah_number))
            .copied()
            .filter(|page| (1..=self.total_pages).contains(page))
    }

    #[cfg(test)]
    pub(crate) fn from_entries(total_pages: u32, entries: &[((u32, u32), u32)]) -> Self {
        PageMap {
            total_pages,
            map: entries.iter().copied().collect(),
        }
    }
}

fn parse_verse_key(key: &str) -> Option<(u32, u32)> {
    let (surah, ayah) = key.split_once(':')?;
    Some((surah.trim().parse().ok()?, ayah.trim().parse().ok()?))
}

/// How the mushaf pagination is derived: from the authoritative page map,
/// or by greedy packing under the given policy.
#[derive(Debug, Clone)]
pub enum PaginationSource {
    Map(PageMap),
    Packed(PackingPolicy),
}

impl PaginationSource {
    /// Load the page map, degrading to packed pagination if the file is
    /// missing or malformed. Degradation is logged, never surfaced as an
    /// error.
    pub fn load_or_packed(path: impl AsRef<Path>, policy: PackingPolicy) -> Self {
        match PageMap::load_from_path(path.as_ref()) {
            Ok(map) => PaginationSource::Map(map),
            Err(err) => {
                log::warn!(
                    "page map unavailable at {}, using packed pagination: {err}",
                    path.as_ref().display()
                );
                PaginationSource::Packed(policy)
            }
        }
    }
}

/// Packing caps for the fallback paginator. The defaults approximate a
/// readable page, not the real print layout; only the page map reproduces
/// that.
#[derive(Debug, Clone, Copy)]
pub struct PackingPolicy {
    /// Maximum verses on one packed page.
    pub max_verses_per_page: usize,
    /// Maximum normalized characters on one packed page.
    pub max_chars_per_page: usize,
}

impl Default for PackingPolicy {
    fn default() -> Self {
        PackingPolicy {
            max_verses_per_page: 12,
            max_chars_per_page: 1400,
        }
    }
}
