//! Outcome of visiting a single page
//!
//! Every URL dispatched to a worker ends in exactly one of these states.

use std::fmt;

/// Represents how the visit of a page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    /// Product page; a record was emitted
    Product,

    /// Fetched page that is not a product page (or was redirected away)
    Page,

    // ===== Recovered Error States =====
    /// Classified as a product page but the expected markup was missing
    ExtractionFailed,

    /// Every fetch attempt failed; no record and no links
    FetchFailed,
}

impl PageState {
    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ExtractionFailed | Self::FetchFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Page => "page",
            Self::ExtractionFailed => "extraction_failed",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Every state, in report order
    pub fn all_states() -> [Self; 4] {
        [
            Self::Product,
            Self::Page,
            Self::ExtractionFailed,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_error() {
        assert!(!PageState::Product.is_error());
        assert!(!PageState::Page.is_error());
        assert!(PageState::ExtractionFailed.is_error());
        assert!(PageState::FetchFailed.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Product), "product");
        assert_eq!(format!("{}", PageState::FetchFailed), "fetch_failed");
    }

    #[test]
    fn test_all_states_follow_ordering() {
        let states = PageState::all_states();
        let mut sorted = states;
        sorted.sort();
        assert_eq!(states, sorted);
        assert_eq!(states.iter().filter(|s| s.is_error()).count(), 2);
    }
}
