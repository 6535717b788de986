//! Arabic-aware text normalization shared by search and comparison.
//!
//! The pipeline folds Eastern Arabic-Indic digits to ASCII, strips tashkeel
//! and Qur'anic annotation marks, unifies letter variants (alef forms,
//! hamza carriers, alef maksura, taa marbuta), drops punctuation and
//! collapses whitespace. The result is stable under re-application.

use unicode_normalization::UnicodeNormalization;

/// Zero digit of the Eastern Arabic-Indic block (٠).
const ARABIC_INDIC_ZERO: u32 = 0x0660;

/// Convert Eastern Arabic-Indic digits (٠-٩) to their ASCII equivalents,
/// leaving every other character untouched.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (ARABIC_INDIC_ZERO..=ARABIC_INDIC_ZERO + 9).contains(&code) {
                char::from(b'0' + (code - ARABIC_INDIC_ZERO) as u8)
            } else {
                c
            }
        })
        .collect()
}

/// Convert ASCII digits to Eastern Arabic-Indic digits, for display of ayah
/// numbers and result counts in Arabic UI chrome.
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => {
                char::from_u32(ARABIC_INDIC_ZERO + (c as u32 - '0' as u32)).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Tashkeel, Qur'anic annotation marks and related combining characters
/// that never participate in matching.
fn is_stripped_mark(c: char) -> bool {
    matches!(c,
        '\u{0640}'                 // tatweel
        | '\u{064B}'..='\u{065F}'  // fathatan..wavy hamza below
        | '\u{0670}'               // superscript alef
        | '\u{06D6}'..='\u{06ED}'  // Qur'anic annotation signs
    )
}

fn is_arabic_letter(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{064A}')
}

/// Normalize a string for search and comparison.
///
/// Steps, in order: digit folding, NFKD decomposition, mark stripping,
/// letter-variant folding, punctuation removal, whitespace collapse,
/// lowercasing of the Latin subset.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;

    for c in normalize_digits(text).nfkd() {
        if is_stripped_mark(c) {
            continue;
        }
        let folded = match c {
            // hamza-bearing and wasla alef forms -> bare alef
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => '\u{0627}',
            // hamza on waw / ya -> bare hamza
            '\u{0624}' | '\u{0626}' => '\u{0621}',
            // alef maksura -> ya
            '\u{0649}' => '\u{064A}',
            // taa marbuta -> ha
            '\u{0629}' => '\u{0647}',
            _ => c,
        };
        let keep = folded.is_ascii_alphanumeric() || is_arabic_letter(folded);
        if keep {
            out.push(folded.to_ascii_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            // punctuation and whitespace both collapse to one separator
            out.push(' ');
            last_was_space = true;
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Split a query into normalized, non-empty tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tashkeel() {
        let input = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
        assert_eq!(normalize(input), "بسم الله الرحمن الرحيم");
    }

    #[test]
    fn folds_alef_and_hamza_variants() {
        assert_eq!(normalize("أَعُوذُ"), "اعوذ");
        assert_eq!(normalize("إِلَيْهِ"), "اليه");
        assert_eq!(normalize("ٱلسَّمَآءِ"), "السماء");
        // NFKD decomposes the hamza carrier first, so the combining hamza
        // is stripped and the bare carrier letter remains
        assert_eq!(normalize("مُؤْمِن"), "مومن");
    }

    #[test]
    fn folds_maksura_and_marbuta() {
        assert_eq!(normalize("هُدًى"), "هدي");
        assert_eq!(normalize("رَحْمَة"), "رحمه");
    }

    #[test]
    fn digits_fold_to_ascii() {
        assert_eq!(normalize_digits("سورة ٢ آية ٢٥٥"), "سورة 2 آية 255");
        assert_eq!(normalize("آية ٢٥٥"), "ايه 255");
    }

    #[test]
    fn ascii_digits_render_arabic() {
        assert_eq!(to_arabic_digits("255"), "٢٥٥");
        assert_eq!(to_arabic_digits("7 نتائج"), "٧ نتائج");
    }

    #[test]
    fn punctuation_becomes_separator() {
        assert_eq!(normalize("قُلْ: هُوَ"), "قل هو");
        assert_eq!(normalize("Al-Baqarah"), "al baqarah");
    }

    #[test]
    fn collapses_whitespace_and_lowercases() {
        assert_eq!(normalize("  The   COW  "), "the cow");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ",
            "قُلْ أَعُوذُ بِرَبِّ ٱلْفَلَقِ",
            "Al-Fātiḥah ١",
            "",
            "   ",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert!(tokenize("  ").is_empty());
    }

    #[test]
    fn tokenize_drops_empties() {
        assert_eq!(tokenize("الرَّحْمَٰن ، الرَّحِيم"), vec!["الرحمن", "الرحيم"]);
    }
}
