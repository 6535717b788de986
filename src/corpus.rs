//! Verse corpus loading and model types.
//!
//! The on-disk fixture is `data/quran.json`:
//! `{ "surahs": [{ "id", "name", "englishName", "ayahs": [".."] }, ..] }`
//! with `ayahs` 1-indexed by position. Loading strips the Basmala prefix
//! that the data embeds in the first verse of most surahs, so `Verse::text`
//! is always the verse proper.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// The exact Basmala string as it appears in the corpus data, with wasla
/// alef and full tashkeel. Stripping is anchored on this exact form.
pub const BASMALA: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ";

/// Surah id of Al-Fatiha, whose first verse *is* the Basmala.
pub const FATIHA: u32 = 1;
/// Surah id of At-Tawba, which omits the Basmala by convention.
pub const TAWBA: u32 = 9;

#[derive(Debug, Deserialize)]
struct QuranFile {
    surahs: Vec<SurahRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurahRecord {
    id: u32,
    name: String,
    #[serde(default)]
    english_name: String,
    ayahs: Vec<String>,
}

/// One numbered verse within a surah. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub surah_id: u32,
    /// 1-based, unique within the surah.
    pub ayah_number: u32,
    /// Verse text with diacritics retained, Basmala prefix removed.
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Surah {
    pub id: u32,
    pub name: String,
    pub english_name: String,
    pub verses: Vec<Verse>,
}

impl Surah {
    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }
}

/// The full loaded corpus, surahs in canonical order.
#[derive(Debug, Clone)]
pub struct Corpus {
    surahs: Vec<Surah>,
}

/// Remove an anchored Basmala prefix from a first verse. Idempotent: only an
/// exact prefix match is removed, and the result never starts with one.
pub fn strip_basmala(text: &str) -> &str {
    match text.strip_prefix(BASMALA) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

impl Corpus {
    /// Build the corpus from parsed records, stripping the embedded Basmala
    /// from verse 1 of every surah except Al-Fatiha and At-Tawba.
    fn from_records(records: Vec<SurahRecord>) -> Result<Self, Error> {
        if records.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let surahs = records
            .into_iter()
            .map(|record| {
                let strip_first = record.id != FATIHA && record.id != TAWBA;
                let verses = record
                    .ayahs
                    .iter()
                    .enumerate()
                    .map(|(i, ayah)| {
                        let text = if i == 0 && strip_first {
                            strip_basmala(ayah).to_string()
                        } else {
                            ayah.clone()
                        };
                        Verse {
                            surah_id: record.id,
                            ayah_number: i as u32 + 1,
                            text,
                        }
                    })
                    .collect();
                Surah {
                    id: record.id,
                    name: record.name,
                    english_name: record.english_name,
                    verses,
                }
            })
            .collect();
        Ok(Corpus { surahs })
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let file: QuranFile = serde_json::from_str(json)?;
        Self::from_records(file.surahs)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let file: QuranFile = serde_json::from_reader(reader)?;
        Self::from_records(file.surahs)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        let corpus = Self::from_json_str(&json)?;
        log::debug!(
            "loaded corpus: {} surahs, {} verses",
            corpus.surahs.len(),
            corpus.verses().count()
        );
        Ok(corpus)
    }

    pub fn surahs(&self) -> &[Surah] {
        &self.surahs
    }

    pub fn surah(&self, id: u32) -> Option<&Surah> {
        self.surahs.iter().find(|s| s.id == id)
    }

    /// All verses in corpus order (surah order, then ayah order).
    pub fn verses(&self) -> impl Iterator<Item = &Verse> {
        self.surahs.iter().flat_map(|s| s.verses.iter())
    }
}

/// Whether a surah's first verse should be preceded by a Basmala banner when
/// rendered. Al-Fatiha contains it as verse 1 and At-Tawba omits it.
pub fn shows_basmala_banner(surah_id: u32) -> bool {
    surah_id != FATIHA && surah_id != TAWBA
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_json() -> String {
        format!(
            r#"{{"surahs": [
                {{"id": 1, "name": "الفاتحة", "englishName": "Al-Fatiha",
                  "ayahs": ["{b}", "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ"]}},
                {{"id": 2, "name": "البقرة", "englishName": "Al-Baqarah",
                  "ayahs": ["{b} الٓمٓ", "ذَٰلِكَ ٱلْكِتَٰبُ"]}},
                {{"id": 9, "name": "التوبة", "englishName": "At-Tawba",
                  "ayahs": ["بَرَآءَةٌ مِّنَ ٱللَّهِ"]}}
            ]}}"#,
            b = BASMALA
        )
    }

    #[test]
    fn strips_basmala_from_first_verse() {
        let corpus = Corpus::from_json_str(&corpus_json()).unwrap();
        let baqarah = corpus.surah(2).unwrap();
        assert_eq!(baqarah.verses[0].text, "الٓمٓ");
        assert!(!baqarah.verses[0].text.starts_with(BASMALA));
    }

    #[test]
    fn fatiha_first_verse_untouched() {
        let corpus = Corpus::from_json_str(&corpus_json()).unwrap();
        let fatiha = corpus.surah(1).unwrap();
        assert_eq!(fatiha.verses[0].text, BASMALA);
    }

    #[test]
    fn tawba_untouched() {
        let corpus = Corpus::from_json_str(&corpus_json()).unwrap();
        let tawba = corpus.surah(9).unwrap();
        assert!(tawba.verses[0].text.starts_with("بَرَآءَةٌ"));
    }

    #[test]
    fn strip_is_anchored_and_idempotent() {
        let with_prefix = format!("{BASMALA} الٓمٓ");
        let once = strip_basmala(&with_prefix);
        assert_eq!(once, "الٓمٓ");
        assert_eq!(strip_basmala(once), once);
        // no mid-string removal
        let embedded = format!("قال {BASMALA}");
        assert_eq!(strip_basmala(&embedded), embedded);
    }

    #[test]
    fn ayah_numbers_are_one_based() {
        let corpus = Corpus::from_json_str(&corpus_json()).unwrap();
        let nums: Vec<u32> = corpus.surah(1).unwrap().verses.iter().map(|v| v.ayah_number).collect();
        assert_eq!(nums, vec![1, 2]);
    }

    #[test]
    fn empty_corpus_is_fatal() {
        let err = Corpus::from_json_str(r#"{"surahs": []}"#).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn missing_english_name_defaults() {
        let json = r#"{"surahs": [{"id": 1, "name": "الفاتحة", "ayahs": ["x"]}]}"#;
        let corpus = Corpus::from_json_str(json).unwrap();
        assert_eq!(corpus.surah(1).unwrap().english_name, "");
    }

    #[test]
    fn banner_rules() {
        assert!(!shows_basmala_banner(1));
        assert!(!shows_basmala_banner(9));
        assert!(shows_basmala_banner(2));
        assert!(shows_basmala_banner(114));
    }
}
