//! Shared search predicate used by the list screens.

/// Case-insensitive substring match against each supplied text field.
///
/// An empty or whitespace-only term matches everything, so an untouched
/// search box never hides records.
pub fn search_matches(term: &str, fields: &[&str]) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_matches_everything() {
        assert!(search_matches("", &["Metformin", "Dr. Chen"]));
        assert!(search_matches("   ", &["Metformin", "Dr. Chen"]));
        assert!(search_matches("", &[]));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(search_matches("METFOR", &["Metformin", "Dr. Chen"]));
        assert!(search_matches("chen", &["Metformin", "Dr. Chen"]));
    }

    #[test]
    fn substring_anywhere_in_any_field() {
        assert!(search_matches("formi", &["Metformin"]));
        assert!(!search_matches("lisinopril", &["Metformin", "Dr. Chen"]));
    }

    #[test]
    fn term_with_surrounding_whitespace_is_trimmed() {
        assert!(search_matches("  chen ", &["Dr. Chen"]));
    }
}
