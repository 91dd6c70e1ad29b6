//! Query/field canonicalisation shared by matching and duplicate detection.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalises a string for comparison.
///
/// Diacritics are stripped (compatibility decomposition, combining marks
/// dropped, then recomposed so Hangul syllables survive intact), the result
/// is lowercased, and whitespace runs collapse to a single space.
/// Applying it twice gives the same result as applying it once.
pub fn normalise(text: &str) -> String {
    let stripped: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .nfkc()
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
