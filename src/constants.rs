// Engine Constants
//
// Default resource caps for the rewrite engine. The two bounds that
// guarantee termination (iteration cap, regex subject cap) live here
// together with the fixed capture-slot geometry.

/// Default cap on the number of rules whose condition group may succeed
/// during a single evaluation.
///
/// Enforced in `eval`: once the count exceeds this bound the walk
/// terminates with `Status::LimitExceeded`.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default cap on the length of the request URL, in bytes.
///
/// Over-long URLs are rejected before evaluation begins.
pub const DEFAULT_MAX_URL_LENGTH: usize = 8192;

/// Default cap on pattern length and on the length of subjects presented
/// to a compiled pattern.
///
/// Patterns longer than this are rejected outright; subjects longer than
/// this are treated as non-matching (not as errors).
pub const DEFAULT_MAX_REGEX_SUBJECT_LENGTH: usize = 2048;

/// Number of capture slots kept for `$N` and `%N` backreferences.
///
/// Both reference forms are bounded to 1..9; slot 0 holds the full match
/// on the rule side. Unset slots resolve to the empty string.
pub const CAPTURE_SLOTS: usize = 10;

/// Upper bound on the compiled size of a single pattern, in bytes.
///
/// Passed to `regex::RegexBuilder::size_limit` so that pathological but
/// syntactically legal patterns cannot balloon compilation.
pub const REGEX_COMPILED_SIZE_LIMIT: usize = 1 << 20;

/// Status code implied by a bare `[R]` flag.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Skip count implied by a non-numeric `S=` value.
pub const DEFAULT_SKIP_COUNT: u32 = 1;
