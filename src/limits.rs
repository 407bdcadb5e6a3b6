// Evaluation limits.
//
// Per-evaluation resource caps. Hosts construct one `Limits` value and
// reuse it across calls; the engine never mutates it.

use crate::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_REGEX_SUBJECT_LENGTH, DEFAULT_MAX_URL_LENGTH,
};

/// Resource caps for a single evaluation.
///
/// # Examples
///
/// ```
/// use rewtrace::Limits;
///
/// let limits = Limits::new()
///     .max_iterations(20)
///     .max_rule_count(Some(500));
/// assert_eq!(limits.max_url_length, 8192);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Cap on rules whose condition group succeeds during one walk.
    /// Exceeding it yields `Status::LimitExceeded`.
    pub max_iterations: usize,
    /// Cap on the request URL length in bytes; longer URLs are
    /// rejected before evaluation.
    pub max_url_length: usize,
    /// Cap on pattern length and on match-subject length.
    pub max_regex_subject_length: usize,
    /// Optional cap on the number of parsed directives. `None` means
    /// unlimited.
    pub max_rule_count: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            max_regex_subject_length: DEFAULT_MAX_REGEX_SUBJECT_LENGTH,
            max_rule_count: None,
        }
    }
}

impl Limits {
    /// Create limits with the default caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap.
    pub fn max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    /// Set the URL length cap.
    pub fn max_url_length(mut self, cap: usize) -> Self {
        self.max_url_length = cap;
        self
    }

    /// Set the pattern/subject length cap.
    pub fn max_regex_subject_length(mut self, cap: usize) -> Self {
        self.max_regex_subject_length = cap;
        self
    }

    /// Set or clear the directive-count cap.
    pub fn max_rule_count(mut self, cap: Option<usize>) -> Self {
        self.max_rule_count = cap;
        self
    }
}
