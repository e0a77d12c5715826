//! Genre label cleaning.
//!
//! Snapshot genre fields are free text from the upstream scraper and
//! arrive in every imaginable spelling. Cleaning is applied inline as
//! band rows are parsed, so the same canonical labels flow into the
//! track documents and the genre facet list.

/// Genre assigned when the source declares none, or a synonym of none.
pub const GENRE_UNSPECIFIED: &str = "Unspecified";

/// Canonical label for the various "children's ..." spellings.
pub const GENRE_CHILDRENS: &str = "Children's Music";

/// Cleans one raw genre label.
///
/// Empty and the none-synonyms collapse to [`GENRE_UNSPECIFIED`];
/// three-letter labels are treated as acronyms and upper-cased;
/// anything starting with "children" becomes [`GENRE_CHILDRENS`];
/// everything else is title-cased word by word.
pub fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return GENRE_UNSPECIFIED.to_string();
    }

    let lower = trimmed.to_lowercase();
    if matches!(lower.as_str(), "unknown" | "none" | "other") {
        return GENRE_UNSPECIFIED.to_string();
    }
    if lower.starts_with("children") {
        return GENRE_CHILDRENS.to_string();
    }
    if trimmed.len() == 3 && trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return trimmed.to_ascii_uppercase();
    }

    title_case(trimmed)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, word) in text.split_whitespace().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{clean, GENRE_CHILDRENS, GENRE_UNSPECIFIED};

    #[test]
    fn test_genre_none_synonyms() {
        assert_eq!(clean("unknown"), GENRE_UNSPECIFIED);
        assert_eq!(clean("None"), GENRE_UNSPECIFIED);
        assert_eq!(clean("OTHER"), GENRE_UNSPECIFIED);
        assert_eq!(clean(""), GENRE_UNSPECIFIED);
        assert_eq!(clean("   "), GENRE_UNSPECIFIED);
    }

    #[test]
    fn test_genre_acronyms() {
        assert_eq!(clean("rpm"), "RPM");
        assert_eq!(clean(" ska "), "SKA");
    }

    #[test]
    fn test_genre_childrens_prefix() {
        assert_eq!(clean("Children's Stories"), GENRE_CHILDRENS);
        assert_eq!(clean("childrens music"), GENRE_CHILDRENS);
        assert_eq!(clean("CHILDREN"), GENRE_CHILDRENS);
    }

    #[test]
    fn test_genre_title_case() {
        assert_eq!(clean("progressive rock"), "Progressive Rock");
        assert_eq!(clean("  HEAVY METAL "), "Heavy Metal");
        assert_eq!(clean("blues"), "Blues");
    }
}
