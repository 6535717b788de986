//! mushafkit — Qur'an corpus loading, mushaf pagination, Arabic-aware
//! search and reader state.
//!
//! The entry point is [`MushafKit`]: it owns the loaded corpus, the
//! pagination built from it, the bookmark sets and the current view, and
//! exposes the navigation transitions the reader UI drives. Rendering is
//! left to the caller; the view module produces plain data models for it.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

mod bookmarks;
mod corpus;
mod error;
mod normalize;
mod pagemap;
mod paginate;
mod search;
mod view;

pub use bookmarks::{BookmarkStore, FsStore, MemoryStore, Storage};
pub use corpus::{shows_basmala_banner, strip_basmala, Corpus, Surah, Verse, BASMALA};
pub use error::Error;
pub use normalize::{normalize, normalize_digits, to_arabic_digits, tokenize};
pub use pagemap::{PackingPolicy, PageMap, PaginationSource, STANDARD_MUSHAF_PAGES};
pub use paginate::{MushafPage, MushafPages, PageVerse, SurahPage};
pub use search::{highlight_ranges, IndexEntry, Matcher, SearchHit, SearchIndex, MAX_RESULTS};
pub use view::{
    MushafPageView, PanelVisibility, Redraw, RenderedVerse, SearchResultsView, SurahCard,
    SurahPageView, View,
};

/// Application state for one loaded mushaf: corpus, pagination, lazily
/// built search index, bookmarks and the current view. Construct one per
/// reader session (or per test).
pub struct MushafKit {
    corpus: Corpus,
    source: PaginationSource,
    pages: MushafPages,
    index: ArcSwap<Option<SearchIndex>>,
    bookmarks: BookmarkStore,
    view: View,
    current_surah: Option<CurrentSurah>,
}

/// Surah-reader pagination cache for the currently open surah only.
pub(crate) struct CurrentSurah {
    pub(crate) surah_id: u32,
    pub(crate) pages: Vec<SurahPage>,
}

impl std::fmt::Debug for MushafKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MushafKit").finish_non_exhaustive()
    }
}

impl MushafKit {
    /// Assemble the state from already-loaded parts. Pagination is built
    /// here, once; bookmarks are read from the given storage backend.
    pub fn new(corpus: Corpus, source: PaginationSource, storage: Box<dyn Storage>) -> Self {
        let pages = MushafPages::build(&corpus, &source);
        log::debug!(
            "mushaf ready: {} pages from {} source",
            pages.total_pages(),
            match &source {
                PaginationSource::Map(_) => "map",
                PaginationSource::Packed(_) => "packed",
            }
        );
        MushafKit {
            corpus,
            source,
            pages,
            index: ArcSwap::new(Arc::new(None)),
            bookmarks: BookmarkStore::load(storage),
            view: View::SurahGrid,
            current_surah: None,
        }
    }

    /// Load the corpus (fatal on failure) and the page map (degrading to
    /// packed pagination on failure) from JSON fixtures.
    pub fn load_from_paths(
        corpus_path: impl AsRef<Path>,
        page_map_path: impl AsRef<Path>,
        storage: Box<dyn Storage>,
    ) -> Result<Self, Error> {
        let corpus = Corpus::load_from_path(corpus_path)?;
        let source = PaginationSource::load_or_packed(page_map_path, PackingPolicy::default());
        Ok(MushafKit::new(corpus, source, storage))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn pages(&self) -> &MushafPages {
        &self.pages
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub(crate) fn bookmarks_mut(&mut self) -> &mut BookmarkStore {
        &mut self.bookmarks
    }

    pub(crate) fn source(&self) -> &PaginationSource {
        &self.source
    }

    pub(crate) fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub(crate) fn current_surah(&self) -> Option<&CurrentSurah> {
        self.current_surah.as_ref()
    }

    pub(crate) fn set_current_surah(&mut self, current: Option<CurrentSurah>) {
        self.current_surah = current;
    }

    /// Rank verses against a free-text query. The index is built on first
    /// use and memoized for the session.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let guard = self.ensure_index();
        match guard.as_ref() {
            Some(index) => search::search(index, query),
            None => Vec::new(),
        }
    }

    fn ensure_index(&self) -> arc_swap::Guard<Arc<Option<SearchIndex>>> {
        let guard = self.index.load();
        if guard.is_some() {
            return guard;
        }
        let built = SearchIndex::build(&self.corpus);
        log::debug!("search index built: {} entries", built.len());
        self.index.store(Arc::new(Some(built)));
        self.index.load()
    }
}
