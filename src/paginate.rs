//! Mushaf pagination.
//!
//! Reconstructs the printed-mushaf page sequence from the flat verse list.
//! With a page map every verse is placed on its canonical page, with a
//! carry-forward fallback for unmapped verses so gaps in the map never
//! relocate a verse to page 1. Without a map, verses are packed greedily
//! under the configured caps.

use crate::corpus::Corpus;
use crate::normalize::normalize;
use crate::pagemap::{PackingPolicy, PageMap, PaginationSource};

/// One verse as placed on a mushaf page.
#[derive(Debug, Clone)]
pub struct PageVerse {
    pub surah_id: u32,
    pub surah_name: String,
    pub ayah_number: u32,
    pub text: String,
    /// True for ayah 1, telling the renderer to prefix a Basmala banner
    /// (suppressed for surahs 1 and 9 by `corpus::shows_basmala_banner`).
    pub is_first_ayah_in_surah: bool,
}

/// One mushaf page: its 1-based number and the verses it holds, in order.
#[derive(Debug, Clone)]
pub struct MushafPage {
    pub number: u32,
    pub verses: Vec<PageVerse>,
}

/// A single surah's slice of one mushaf page.
#[derive(Debug, Clone)]
pub struct SurahPage {
    pub page_number: u32,
    pub ayahs: Vec<PageVerse>,
}

/// The full paginated mushaf. Rebuilt once per data load, immutable after.
#[derive(Debug, Clone)]
pub struct MushafPages {
    pages: Vec<MushafPage>,
    total_pages: u32,
}

impl MushafPages {
    pub fn build(corpus: &Corpus, source: &PaginationSource) -> Self {
        match source {
            PaginationSource::Map(map) => Self::build_from_map(corpus, map),
            PaginationSource::Packed(policy) => Self::build_packed(corpus, *policy),
        }
    }

    /// Project the page map onto the verse sequence. Unmapped verses stay
    /// on the last assigned page (initially page 1) so an unmapped run
    /// remains contiguous with its mapped neighbors.
    fn build_from_map(corpus: &Corpus, map: &PageMap) -> Self {
        let total_pages = map.total_pages();
        if corpus.surahs().is_empty() || total_pages == 0 {
            return MushafPages {
                pages: Vec::new(),
                total_pages: 0,
            };
        }
        let mut pages: Vec<MushafPage> = (1..=total_pages)
            .map(|number| MushafPage {
                number,
                verses: Vec::new(),
            })
            .collect();
        let mut fallback_page = 1u32;
        for surah in corpus.surahs() {
            for verse in &surah.verses {
                if let Some(page) = map.page_of(verse.surah_id, verse.ayah_number) {
                    fallback_page = page;
                }
                pages[(fallback_page - 1) as usize]
                    .verses
                    .push(page_verse(surah.name.clone(), verse));
            }
        }
        MushafPages { pages, total_pages }
    }

    /// Greedy packing: close a page once it holds the cap of verses or the
    /// next verse would exceed the normalized-character budget. A verse is
    /// never split and a single oversized verse still gets a page.
    fn build_packed(corpus: &Corpus, policy: PackingPolicy) -> Self {
        let mut pages: Vec<MushafPage> = Vec::new();
        let mut current: Vec<PageVerse> = Vec::new();
        let mut current_chars = 0usize;
        for surah in corpus.surahs() {
            for verse in &surah.verses {
                let verse_chars = normalize(&verse.text).chars().count();
                let over_verses = current.len() >= policy.max_verses_per_page;
                let over_chars =
                    !current.is_empty() && current_chars + verse_chars > policy.max_chars_per_page;
                if over_verses || over_chars {
                    pages.push(MushafPage {
                        number: pages.len() as u32 + 1,
                        verses: std::mem::take(&mut current),
                    });
                    current_chars = 0;
                }
                current.push(page_verse(surah.name.clone(), verse));
                current_chars += verse_chars;
            }
        }
        if !current.is_empty() {
            pages.push(MushafPage {
                number: pages.len() as u32 + 1,
                verses: current,
            });
        }
        let total_pages = pages.len() as u32;
        MushafPages { pages, total_pages }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn pages(&self) -> &[MushafPage] {
        &self.pages
    }

    pub fn page(&self, number: u32) -> Option<&MushafPage> {
        if number == 0 {
            return None;
        }
        self.pages.get((number - 1) as usize)
    }

    /// First mushaf page holding any verse of the surah.
    pub fn first_page_of_surah(&self, surah_id: u32) -> Option<u32> {
        self.pages
            .iter()
            .find(|p| p.verses.iter().any(|v| v.surah_id == surah_id))
            .map(|p| p.number)
    }

    /// Mushaf page holding a specific verse.
    pub fn page_of_verse(&self, surah_id: u32, ayah_number: u32) -> Option<u32> {
        self.pages
            .iter()
            .find(|p| {
                p.verses
                    .iter()
                    .any(|v| v.surah_id == surah_id && v.ayah_number == ayah_number)
            })
            .map(|p| p.number)
    }

    /// The subsequence of mushaf pages containing a surah's verses, each
    /// page keeping only that surah's verses in ayah order. Falls back to
    /// re-walking the surah against the page map when the built pages have
    /// no trace of it (inconsistent data).
    pub fn surah_pages(
        &self,
        corpus: &Corpus,
        source: &PaginationSource,
        surah_id: u32,
    ) -> Vec<SurahPage> {
        let filtered: Vec<SurahPage> = self
            .pages
            .iter()
            .filter_map(|page| {
                let ayahs: Vec<PageVerse> = page
                    .verses
                    .iter()
                    .filter(|v| v.surah_id == surah_id)
                    .cloned()
                    .collect();
                if ayahs.is_empty() {
                    None
                } else {
                    Some(SurahPage {
                        page_number: page.number,
                        ayahs,
                    })
                }
            })
            .collect();
        if !filtered.is_empty() {
            return filtered;
        }
        if let PaginationSource::Map(map) = source {
            return surah_pages_via_map(corpus, map, surah_id);
        }
        Vec::new()
    }
}

/// Fallback surah pagination: walk the surah's own verses, resolve each page
/// through the map with carry-forward, and group consecutive runs.
fn surah_pages_via_map(corpus: &Corpus, map: &PageMap, surah_id: u32) -> Vec<SurahPage> {
    let Some(surah) = corpus.surah(surah_id) else {
        return Vec::new();
    };
    let mut pages: Vec<SurahPage> = Vec::new();
    let mut fallback_page = 1u32;
    for verse in &surah.verses {
        if let Some(page) = map.page_of(verse.surah_id, verse.ayah_number) {
            fallback_page = page;
        }
        match pages.last_mut() {
            Some(last) if last.page_number == fallback_page => {
                last.ayahs.push(page_verse(surah.name.clone(), verse));
            }
            _ => pages.push(SurahPage {
                page_number: fallback_page,
                ayahs: vec![page_verse(surah.name.clone(), verse)],
            }),
        }
    }
    pages
}

fn page_verse(surah_name: String, verse: &crate::corpus::Verse) -> PageVerse {
    PageVerse {
        surah_id: verse.surah_id,
        surah_name,
        ayah_number: verse.ayah_number,
        text: verse.text.clone(),
        is_first_ayah_in_surah: verse.ayah_number == 1,
    }
}
