//! Reader view state and navigation.
//!
//! Exactly one panel is visible at a time: the surah grid, the single-surah
//! reader, the mushaf page reader, or the search results. Transitions are
//! synchronous methods on [`MushafKit`] and every state change goes through
//! them; renderers only consume the plain view models produced here.

use crate::corpus::shows_basmala_banner;
use crate::normalize::to_arabic_digits;
use crate::paginate::PageVerse;
use crate::search::SearchHit;
use crate::{CurrentSurah, Error, MushafKit};

/// The mutually exclusive view states.
#[derive(Debug, Clone)]
pub enum View {
    SurahGrid,
    SurahReader { surah_id: u32, page_index: usize },
    MushafReader { page_number: u32 },
    SearchResults { query: String, results: Vec<SearchHit> },
}

/// Visibility of the four panels, derived from the view. Exactly one flag
/// is true after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub grid: bool,
    pub surah_reader: bool,
    pub mushaf_reader: bool,
    pub search_results: bool,
}

impl PanelVisibility {
    pub fn visible_count(&self) -> usize {
        [self.grid, self.surah_reader, self.mushaf_reader, self.search_results]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

/// What a transition requires the renderer to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Panels swapped or page content changed.
    Full,
    /// Only the open surah's current page content.
    SurahPage,
    /// Only the page-bookmark indicator.
    BookmarkIndicator,
    /// Nothing visible changed.
    Unchanged,
}

/// One card in the surah grid.
#[derive(Debug, Clone)]
pub struct SurahCard {
    pub id: u32,
    pub name: String,
    pub english_name: String,
    pub verse_count: usize,
}

/// One verse line ready for display.
#[derive(Debug, Clone)]
pub struct RenderedVerse {
    pub surah_id: u32,
    pub ayah_number: u32,
    pub text: String,
    /// Ornate ayah end marker with Eastern Arabic-Indic digits, e.g. ﴿٢٥٥﴾.
    pub end_marker: String,
    pub bookmarked: bool,
    /// A Basmala banner belongs immediately before this verse. True for a
    /// surah's first ayah wherever it falls on a mushaf page, except for
    /// surahs 1 and 9.
    pub show_basmala_banner: bool,
}

/// The surah reader's current page.
#[derive(Debug, Clone)]
pub struct SurahPageView {
    pub surah_id: u32,
    pub surah_name: String,
    pub page_number: u32,
    pub page_index: usize,
    pub page_count: usize,
    pub show_basmala_banner: bool,
    pub verses: Vec<RenderedVerse>,
}

/// The mushaf reader's current page.
#[derive(Debug, Clone)]
pub struct MushafPageView {
    pub page_number: u32,
    pub total_pages: u32,
    pub bookmarked: bool,
    pub verses: Vec<RenderedVerse>,
}

/// Ranked results plus the localized header line.
#[derive(Debug, Clone)]
pub struct SearchResultsView {
    pub query: String,
    /// "N نتيجة" or the no-results message.
    pub header: String,
    pub hits: Vec<SearchHit>,
}

const NO_RESULTS_HEADER: &str = "لم يتم العثور على نتائج";

impl MushafKit {
    pub fn panel_visibility(&self) -> PanelVisibility {
        let view = self.view();
        PanelVisibility {
            grid: matches!(view, View::SurahGrid),
            surah_reader: matches!(view, View::SurahReader { .. }),
            mushaf_reader: matches!(view, View::MushafReader { .. }),
            search_results: matches!(view, View::SearchResults { .. }),
        }
    }

    /// Back to the surah grid, dropping the per-surah page cache.
    pub fn show_grid(&mut self) -> Redraw {
        self.set_current_surah(None);
        *self.view_mut() = View::SurahGrid;
        Redraw::Full
    }

    /// Open a surah in the reader at its first page.
    pub fn open_surah(&mut self, surah_id: u32) -> Result<Redraw, Error> {
        self.open_surah_at(surah_id, None)
    }

    /// Open a surah deep-linked to the page containing a verse.
    pub fn open_surah_at_verse(&mut self, surah_id: u32, ayah_number: u32) -> Result<Redraw, Error> {
        self.open_surah_at(surah_id, Some(ayah_number))
    }

    fn open_surah_at(&mut self, surah_id: u32, ayah_number: Option<u32>) -> Result<Redraw, Error> {
        if self.corpus().surah(surah_id).is_none() {
            return Err(Error::SurahNotFound(surah_id));
        }
        let pages = self
            .pages()
            .surah_pages(self.corpus(), self.source(), surah_id);
        let page_index = match ayah_number {
            Some(ayah) => pages
                .iter()
                .position(|p| p.ayahs.iter().any(|v| v.ayah_number == ayah))
                .unwrap_or(0),
            None => 0,
        };
        self.set_current_surah(Some(CurrentSurah { surah_id, pages }));
        *self.view_mut() = View::SurahReader {
            surah_id,
            page_index,
        };
        Ok(Redraw::Full)
    }

    /// Advance the surah reader one page. Returns false at the last page.
    pub fn surah_next_page(&mut self) -> bool {
        let View::SurahReader { surah_id, page_index } = *self.view() else {
            return false;
        };
        let page_count = self.current_surah().map_or(0, |c| c.pages.len());
        if page_index + 1 >= page_count {
            return false;
        }
        *self.view_mut() = View::SurahReader {
            surah_id,
            page_index: page_index + 1,
        };
        true
    }

    /// Step the surah reader back one page. Returns false at the first page.
    pub fn surah_prev_page(&mut self) -> bool {
        let View::SurahReader { surah_id, page_index } = *self.view() else {
            return false;
        };
        if page_index == 0 {
            return false;
        }
        *self.view_mut() = View::SurahReader {
            surah_id,
            page_index: page_index - 1,
        };
        true
    }

    /// Open the mushaf reader at a page number.
    pub fn open_mushaf_page(&mut self, page_number: u32) -> Result<Redraw, Error> {
        let total = self.pages().total_pages();
        if page_number == 0 || page_number > total {
            return Err(Error::PageOutOfRange {
                page: page_number,
                total,
            });
        }
        self.set_current_surah(None);
        *self.view_mut() = View::MushafReader { page_number };
        Ok(Redraw::Full)
    }

    pub fn mushaf_next_page(&mut self) -> bool {
        let View::MushafReader { page_number } = *self.view() else {
            return false;
        };
        if page_number >= self.pages().total_pages() {
            return false;
        }
        *self.view_mut() = View::MushafReader {
            page_number: page_number + 1,
        };
        true
    }

    pub fn mushaf_prev_page(&mut self) -> bool {
        let View::MushafReader { page_number } = *self.view() else {
            return false;
        };
        if page_number <= 1 {
            return false;
        }
        *self.view_mut() = View::MushafReader {
            page_number: page_number - 1,
        };
        true
    }

    /// Submit a search. A blank query clears search and returns to the
    /// grid; otherwise the results panel is shown, even when empty.
    pub fn submit_search(&mut self, query: &str) -> Redraw {
        if query.trim().is_empty() {
            return self.show_grid();
        }
        let results = self.search(query);
        self.set_current_surah(None);
        *self.view_mut() = View::SearchResults {
            query: query.to_string(),
            results,
        };
        Redraw::Full
    }

    /// Follow a search result into its surah, deep-linked to the page
    /// holding the verse.
    pub fn open_search_result(&mut self, surah_id: u32, ayah_number: u32) -> Result<Redraw, Error> {
        self.open_surah_at_verse(surah_id, ayah_number)
    }

    /// Toggle a verse bookmark. While that surah is open only its current
    /// page needs repainting; other panels are untouched.
    pub fn toggle_ayah_bookmark(&mut self, surah_id: u32, ayah_number: u32) -> Redraw {
        self.bookmarks_mut().toggle_ayah(surah_id, ayah_number);
        match self.view() {
            View::SurahReader { surah_id: open, .. } if *open == surah_id => Redraw::SurahPage,
            _ => Redraw::Unchanged,
        }
    }

    /// Toggle a page bookmark; only the indicator needs repainting.
    pub fn toggle_page_bookmark(&mut self, page_number: u32) -> Redraw {
        self.bookmarks_mut().toggle_page(page_number);
        Redraw::BookmarkIndicator
    }

    /// Cards for the surah grid.
    pub fn grid_cards(&self) -> Vec<SurahCard> {
        self.corpus()
            .surahs()
            .iter()
            .map(|s| SurahCard {
                id: s.id,
                name: s.name.clone(),
                english_name: s.english_name.clone(),
                verse_count: s.verse_count(),
            })
            .collect()
    }

    /// View model for the surah reader's current page, if that panel is
    /// visible.
    pub fn surah_page_view(&self) -> Option<SurahPageView> {
        let View::SurahReader { surah_id, page_index } = *self.view() else {
            return None;
        };
        let current = self.current_surah()?;
        let page = current.pages.get(page_index)?;
        let surah = self.corpus().surah(surah_id)?;
        Some(SurahPageView {
            surah_id,
            surah_name: surah.name.clone(),
            page_number: page.page_number,
            page_index,
            page_count: current.pages.len(),
            show_basmala_banner: page_index == 0 && shows_basmala_banner(surah_id),
            verses: self.render_verses(&page.ayahs),
        })
    }

    /// View model for the mushaf reader's current page, if visible.
    pub fn mushaf_page_view(&self) -> Option<MushafPageView> {
        let View::MushafReader { page_number } = *self.view() else {
            return None;
        };
        let page = self.pages().page(page_number)?;
        Some(MushafPageView {
            page_number,
            total_pages: self.pages().total_pages(),
            bookmarked: self.bookmarks().is_page_bookmarked(page_number),
            verses: self.render_verses(&page.verses),
        })
    }

    /// View model for the results panel, if visible. The header counts
    /// results in Arabic digits, or carries the distinct no-results line.
    pub fn search_results_view(&self) -> Option<SearchResultsView> {
        let View::SearchResults { query, results } = self.view() else {
            return None;
        };
        let header = if results.is_empty() {
            NO_RESULTS_HEADER.to_string()
        } else {
            format!("{} نتيجة", to_arabic_digits(&results.len().to_string()))
        };
        Some(SearchResultsView {
            query: query.clone(),
            header,
            hits: results.clone(),
        })
    }

    fn render_verses(&self, verses: &[PageVerse]) -> Vec<RenderedVerse> {
        verses
            .iter()
            .map(|v| RenderedVerse {
                surah_id: v.surah_id,
                ayah_number: v.ayah_number,
                text: v.text.clone(),
                end_marker: format!("﴿{}﴾", to_arabic_digits(&v.ayah_number.to_string())),
                bookmarked: self.bookmarks().is_ayah_bookmarked(v.surah_id, v.ayah_number),
                show_basmala_banner: v.is_first_ayah_in_surah && shows_basmala_banner(v.surah_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Corpus, MemoryStore, PageMap, PaginationSource};

    fn kit_with_map() -> MushafKit {
        let corpus = Corpus::from_json_str(
            r#"{"surahs": [
                {"id": 1, "name": "الفاتحة", "englishName": "Al-Fatiha",
                 "ayahs": ["بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ", "ٱلْحَمْدُ لِلَّهِ"]},
                {"id": 2, "name": "البقرة", "englishName": "Al-Baqarah",
                 "ayahs": ["الٓمٓ", "ذَٰلِكَ ٱلْكِتَٰبُ", "هُدًى لِّلْمُتَّقِينَ"]}
            ]}"#,
        )
        .unwrap();
        let map = PageMap::from_entries(3, &[((1, 1), 1), ((2, 1), 2), ((2, 3), 3)]);
        MushafKit::new(
            corpus,
            PaginationSource::Map(map),
            Box::new(MemoryStore::new()),
        )
    }

    fn kit_packed() -> MushafKit {
        let corpus = Corpus::from_json_str(
            r#"{"surahs": [
                {"id": 1, "name": "الفاتحة", "englishName": "Al-Fatiha",
                 "ayahs": ["بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ", "ٱلْحَمْدُ لِلَّهِ"]},
                {"id": 2, "name": "البقرة", "englishName": "Al-Baqarah",
                 "ayahs": ["الٓمٓ", "ذَٰلِكَ ٱلْكِتَٰبُ", "هُدًى لِّلْمُتَّقِينَ"]}
            ]}"#,
        )
        .unwrap();
        MushafKit::new(
            corpus,
            PaginationSource::Packed(crate::PackingPolicy::default()),
            Box::new(MemoryStore::new()),
        )
    }

    fn assert_one_panel(kit: &MushafKit) {
        assert_eq!(kit.panel_visibility().visible_count(), 1);
    }

    #[test]
    fn every_transition_keeps_one_panel_visible() {
        let mut kit = kit_with_map();
        assert_one_panel(&kit);
        kit.open_surah(2).unwrap();
        assert_one_panel(&kit);
        kit.surah_next_page();
        assert_one_panel(&kit);
        kit.show_grid();
        assert_one_panel(&kit);
        kit.open_mushaf_page(2).unwrap();
        assert_one_panel(&kit);
        kit.submit_search("الم");
        assert_one_panel(&kit);
        kit.submit_search("   ");
        assert_one_panel(&kit);
        assert!(kit.panel_visibility().grid);
    }

    #[test]
    fn open_surah_starts_at_its_mapped_page() {
        let mut kit = kit_with_map();
        kit.open_surah(2).unwrap();
        let page = kit.surah_page_view().unwrap();
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.page_count, 2);
    }

    #[test]
    fn surah_paging_bounds() {
        let mut kit = kit_with_map();
        kit.open_surah(2).unwrap();
        assert!(!kit.surah_prev_page());
        assert!(kit.surah_next_page());
        assert!(!kit.surah_next_page());
        assert_eq!(kit.surah_page_view().unwrap().page_number, 3);
        assert!(kit.surah_prev_page());
    }

    #[test]
    fn unknown_surah_is_an_error() {
        let mut kit = kit_with_map();
        assert!(matches!(
            kit.open_surah(77),
            Err(Error::SurahNotFound(77))
        ));
        // failed transition leaves the view unchanged
        assert!(kit.panel_visibility().grid);
    }

    #[test]
    fn mushaf_paging_bounds() {
        let mut kit = kit_with_map();
        assert!(matches!(
            kit.open_mushaf_page(0),
            Err(Error::PageOutOfRange { .. })
        ));
        assert!(matches!(
            kit.open_mushaf_page(9),
            Err(Error::PageOutOfRange { .. })
        ));
        kit.open_mushaf_page(3).unwrap();
        assert!(!kit.mushaf_next_page());
        assert!(kit.mushaf_prev_page());
        assert_eq!(kit.mushaf_page_view().unwrap().page_number, 2);
    }

    #[test]
    fn search_result_deep_links_to_verse_page() {
        let mut kit = kit_with_map();
        kit.submit_search("هدي");
        let hit = {
            let View::SearchResults { results, .. } = kit.view() else {
                panic!("expected results view");
            };
            (results[0].surah_id, results[0].ayah_number)
        };
        assert_eq!(hit, (2, 3));
        kit.open_search_result(hit.0, hit.1).unwrap();
        let page = kit.surah_page_view().unwrap();
        assert_eq!(page.page_number, 3);
        assert!(page.verses.iter().any(|v| v.ayah_number == 3));
    }

    #[test]
    fn no_results_header_is_distinct() {
        let mut kit = kit_with_map();
        kit.submit_search("قنطرة");
        let view = kit.search_results_view().unwrap();
        assert!(view.hits.is_empty());
        assert_eq!(view.header, NO_RESULTS_HEADER);
        kit.submit_search("الم");
        let view = kit.search_results_view().unwrap();
        assert!(!view.hits.is_empty());
        assert!(view.header.contains("نتيجة"));
        assert!(view.header.contains('١'));
    }

    #[test]
    fn ayah_toggle_redraws_only_open_surah_page() {
        let mut kit = kit_with_map();
        assert_eq!(kit.toggle_ayah_bookmark(2, 1), Redraw::Unchanged);
        kit.open_surah(2).unwrap();
        assert_eq!(kit.toggle_ayah_bookmark(2, 2), Redraw::SurahPage);
        assert_eq!(kit.toggle_ayah_bookmark(1, 1), Redraw::Unchanged);
        let page = kit.surah_page_view().unwrap();
        let v2 = page.verses.iter().find(|v| v.ayah_number == 2).unwrap();
        assert!(v2.bookmarked);
    }

    #[test]
    fn page_toggle_redraws_indicator_only() {
        let mut kit = kit_with_map();
        kit.open_mushaf_page(2).unwrap();
        assert_eq!(kit.toggle_page_bookmark(2), Redraw::BookmarkIndicator);
        assert!(kit.mushaf_page_view().unwrap().bookmarked);
        assert_eq!(kit.toggle_page_bookmark(2), Redraw::BookmarkIndicator);
        assert!(!kit.mushaf_page_view().unwrap().bookmarked);
    }

    #[test]
    fn basmala_banner_only_on_first_page_of_eligible_surahs() {
        let mut kit = kit_with_map();
        kit.open_surah(2).unwrap();
        assert!(kit.surah_page_view().unwrap().show_basmala_banner);
        kit.surah_next_page();
        assert!(!kit.surah_page_view().unwrap().show_basmala_banner);
        kit.open_surah(1).unwrap();
        assert!(!kit.surah_page_view().unwrap().show_basmala_banner);
    }

    #[test]
    fn mushaf_page_flags_banner_when_surah_starts_mid_page() {
        // default packing puts both surahs on a single page, so surah 2
        // opens partway down the mushaf page
        let mut kit = kit_packed();
        kit.open_mushaf_page(1).unwrap();
        let page = kit.mushaf_page_view().unwrap();
        let banners: Vec<(u32, u32, bool)> = page
            .verses
            .iter()
            .map(|v| (v.surah_id, v.ayah_number, v.show_basmala_banner))
            .collect();
        assert_eq!(
            banners,
            vec![
                (1, 1, false), // Al-Fatiha's verse 1 is the Basmala itself
                (1, 2, false),
                (2, 1, true),
                (2, 2, false),
                (2, 3, false),
            ]
        );
    }

    #[test]
    fn end_markers_use_arabic_digits() {
        let mut kit = kit_with_map();
        kit.open_surah(1).unwrap();
        let page = kit.surah_page_view().unwrap();
        assert_eq!(page.verses[0].end_marker, "﴿١﴾");
    }

    #[test]
    fn grid_cards_cover_all_surahs() {
        let kit = kit_with_map();
        let cards = kit.grid_cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].verse_count, 2);
        assert_eq!(cards[1].name, "البقرة");
    }
}
