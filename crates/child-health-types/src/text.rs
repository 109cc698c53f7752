//! Text normalization for catalog free text

/// Fold unicode dashes and non-breaking spaces to ASCII, trim and lowercase.
///
/// Schedule text such as `"15–18 months"` is stored with typographic dashes in
/// published catalogs; every consumer compares the folded form.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Lowercase and replace spaces with underscores, for identifier comparison
pub fn normalize_identifier(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashes_fold_to_hyphen() {
        assert_eq!(normalize_text("15\u{2013}18 Months"), "15-18 months");
        assert_eq!(normalize_text("4\u{2014}6 years"), "4-6 years");
        assert_eq!(normalize_text("6\u{2212}10\u{00A0}years "), "6-10 years");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(normalize_identifier(" Social Smile"), "social_smile");
    }
}
