// Error types for the rewrite engine.
//
// Two small taxonomies: `PatternError` for regex vetting failures, and
// `InputError` for host-boundary rejections. Neither propagates out of
// `evaluate`; both surface as trace content or an output status.

/// A pattern rejected by the regex safety layer.
///
/// Every variant is reported to the user verbatim through the trace
/// (`valid=false`), so the messages name the cause rather than the
/// mechanism.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern itself exceeds the configured length cap.
    #[error("pattern length {len} exceeds maximum of {max}")]
    TooLong {
        /// Byte length of the offending pattern.
        len: usize,
        /// The configured cap.
        max: usize,
    },

    /// A quantified group that itself contains a quantifier, e.g.
    /// `(a+)+`. Detected syntactically as a conservative proxy for
    /// exponential-backtracking risk; false positives are acceptable.
    #[error("pattern contains nested quantifiers and is rejected as unsafe")]
    NestedQuantifier,

    /// A repeated alternation whose branches overlap, e.g. `(a|a){2,}`.
    #[error("pattern repeats overlapping alternatives and is rejected as unsafe")]
    OverlappingAlternation,

    /// The pattern uses a construct from the closed PCRE-only token set.
    ///
    /// These cannot be expressed in the engine's regex dialect and must
    /// be reported rather than silently miscompiled.
    #[error("pattern uses unsupported PCRE construct `{token}`")]
    UnsupportedPcre {
        /// The offending token, exactly as blacklisted.
        token: &'static str,
    },

    /// The pattern failed to compile in the engine's regex dialect.
    #[error("invalid pattern: {message}")]
    Syntax {
        /// The compiler's own description of the failure.
        message: String,
    },
}

impl PatternError {
    /// Construct a `Syntax` rejection from a compiler error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        PatternError::Syntax {
            message: message.into(),
        }
    }
}

/// A request rejected at the host boundary, before any directive is
/// evaluated.
///
/// These never escape `evaluate`; they become `Status::Error` records
/// with the message carried alongside an empty trace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The request URL is not an absolute `http`/`https` URL.
    #[error("request URL is not an absolute http(s) URL: {url:?}")]
    InvalidUrl {
        /// The URL as supplied by the caller.
        url: String,
    },

    /// The request URL exceeds the configured length cap.
    #[error("request URL length {len} exceeds maximum of {max}")]
    UrlTooLong {
        /// Byte length of the URL.
        len: usize,
        /// The configured cap.
        max: usize,
    },

    /// The parsed ruleset contains more directives than the configured
    /// cap allows.
    #[error("ruleset contains {count} directives, exceeding maximum of {max}")]
    TooManyRules {
        /// Number of parsed directives (blank lines and comments do not
        /// count).
        count: usize,
        /// The configured cap.
        max: usize,
    },
}
