//! Optional screening of author-supplied text. Configured from a wordlist;
//! without one every text passes.

#[derive(Debug, Clone)]
pub enum ContentFilter {
    Disabled,
    Wordlist(Vec<String>),
}

impl ContentFilter {
    /// Builds a filter from a comma-separated wordlist. Blank or absent
    /// configuration disables screening.
    pub fn from_config(words: Option<&str>) -> Self {
        let words: Vec<String> = words
            .unwrap_or("")
            .split(',')
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            ContentFilter::Disabled
        } else {
            ContentFilter::Wordlist(words)
        }
    }

    /// True when the text is acceptable.
    pub fn screen(&self, text: &str) -> bool {
        match self {
            ContentFilter::Disabled => true,
            ContentFilter::Wordlist(words) => {
                let lower = text.to_lowercase();
                !words.iter().any(|w| lower.contains(w.as_str()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_filter_accepts_everything() {
        let filter = ContentFilter::from_config(None);
        assert!(filter.screen("anything at all"));
    }

    #[test]
    fn wordlist_match_is_case_insensitive() {
        let filter = ContentFilter::from_config(Some("spam, scam"));
        assert!(!filter.screen("Definitely not a SCAM"));
        assert!(filter.screen("a perfectly fine pitch"));
    }

    #[test]
    fn blank_wordlist_disables_screening() {
        let filter = ContentFilter::from_config(Some("  ,  "));
        assert!(matches!(filter, ContentFilter::Disabled));
    }
}
