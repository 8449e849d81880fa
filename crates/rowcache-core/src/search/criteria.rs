use serde::{Deserialize, Serialize};

///
/// SearchDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

///
/// SearchCriteria
///
/// One search request. Callers keep the last one around to implement
/// "find next"; the core never stores it.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub text: String,
    pub direction: SearchDirection,
    pub from_start: bool,
    pub whole_words: bool,
    pub case_sensitive: bool,
}

impl SearchCriteria {
    /// Forward, case-insensitive substring search from the start.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_start: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn backward(mut self) -> Self {
        self.direction = SearchDirection::Backward;
        self
    }

    #[must_use]
    pub fn forward(mut self) -> Self {
        self.direction = SearchDirection::Forward;
        self
    }

    /// Search relative to the start row instead of from the start.
    #[must_use]
    pub fn from_current(mut self) -> Self {
        self.from_start = false;
        self
    }

    #[must_use]
    pub fn whole_words(mut self) -> Self {
        self.whole_words = true;
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}
