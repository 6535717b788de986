//! Bookmark persistence.
//!
//! Two independent sets: bookmarked mushaf page numbers and bookmarked
//! `(surah, ayah)` pairs. Both live behind a key/value [`Storage`] seam
//! (the browser local-storage analog) as JSON arrays, are loaded once at
//! startup, and are written back in full on every toggle. Missing or
//! corrupt payloads reset to empty sets rather than failing.

use indexmap::IndexSet;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const PAGE_BOOKMARKS_KEY: &str = "quran_page_bookmarks";
pub const AYAH_BOOKMARKS_KEY: &str = "quran_ayah_bookmarks";

/// Per-profile key/value storage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory storage, used in tests and as the default backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// File-backed storage: one file per key under a directory. Write failures
/// are logged and dropped, matching local storage's best-effort contract.
#[derive(Debug)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FsStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.path_for(key), value))
        {
            log::warn!("failed to persist {key}: {err}");
        }
    }
}

/// The two persisted bookmark sets. Insertion order is kept so persisted
/// payloads are deterministic.
pub struct BookmarkStore {
    storage: Box<dyn Storage>,
    pages: IndexSet<u32>,
    ayahs: IndexSet<(u32, u32)>,
}

impl BookmarkStore {
    /// Load both sets from storage. Corrupt payloads reset to empty.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let pages = read_set(storage.as_ref(), PAGE_BOOKMARKS_KEY, |v: Vec<u32>| {
            v.into_iter().collect()
        });
        let ayahs = read_set(storage.as_ref(), AYAH_BOOKMARKS_KEY, |v: Vec<String>| {
            v.iter().filter_map(|s| parse_ayah_key(s)).collect()
        });
        BookmarkStore {
            storage,
            pages,
            ayahs,
        }
    }

    pub fn is_page_bookmarked(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    pub fn is_ayah_bookmarked(&self, surah_id: u32, ayah_number: u32) -> bool {
        self.ayahs.contains(&(surah_id, ayah_number))
    }

    /// Toggle a page bookmark and persist. Returns the new state.
    pub fn toggle_page(&mut self, page: u32) -> bool {
        let added = self.pages.insert(page);
        if !added {
            self.pages.shift_remove(&page);
        }
        self.persist();
        added
    }

    /// Toggle a verse bookmark and persist. Returns the new state.
    pub fn toggle_ayah(&mut self, surah_id: u32, ayah_number: u32) -> bool {
        let added = self.ayahs.insert((surah_id, ayah_number));
        if !added {
            self.ayahs.shift_remove(&(surah_id, ayah_number));
        }
        self.persist();
        added
    }

    pub fn bookmarked_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }

    pub fn bookmarked_ayahs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.ayahs.iter().copied()
    }

    /// Write both sets back, even when only one changed. Keeps the
    /// persistence contract simple for a single-threaded caller.
    pub fn persist(&mut self) {
        let pages: Vec<u32> = self.pages.iter().copied().collect();
        let ayahs: Vec<String> = self
            .ayahs
            .iter()
            .map(|(s, a)| format!("{s}:{a}"))
            .collect();
        match (serde_json::to_string(&pages), serde_json::to_string(&ayahs)) {
            (Ok(pages_json), Ok(ayahs_json)) => {
                self.storage.set(PAGE_BOOKMARKS_KEY, &pages_json);
                self.storage.set(AYAH_BOOKMARKS_KEY, &ayahs_json);
            }
            _ => log::warn!("failed to serialize bookmark sets"),
        }
    }
}

fn read_set<T, R>(storage: &dyn Storage, key: &str, convert: impl FnOnce(T) -> R) -> R
where
    T: serde::de::DeserializeOwned,
    R: Default,
{
    let Some(raw) = storage.get(key) else {
        return R::default();
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(parsed) => convert(parsed),
        Err(err) => {
            log::warn!("resetting corrupt bookmark payload {key}: {err}");
            R::default()
        }
    }
}

fn parse_ayah_key(key: &str) -> Option<(u32, u32)> {
    let (surah, ayah) = key.split_once(':')?;
    Some((surah.parse().ok()?, ayah.parse().ok()?))
}
