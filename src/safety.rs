// Regex Safety Layer
//
// Vets a pattern before compilation and bounds what a compiled pattern
// may be asked to match. The vetting is syntactic: a conservative scan
// for constructs associated with exponential backtracking, plus a
// textual blacklist of PCRE-only tokens that the engine's dialect
// cannot express. False positives are acceptable by contract and are
// surfaced to the user as invalid-pattern trace entries.

use regex::RegexBuilder;

use crate::constants::REGEX_COMPILED_SIZE_LIMIT;
use crate::error::PatternError;

/// The closed set of PCRE-only tokens rejected outright.
///
/// Checked textually, not via a pattern parser: the contract requires
/// unsupported patterns to be reported, not understood.
const PCRE_ONLY_TOKENS: &[&str] = &["(?R)", "(?P>", "(?(DEFINE)", "(?&", "(*", r"\K", "(?|"];

/// A vetted, compiled pattern with a bounded subject length.
#[derive(Debug, Clone)]
pub struct SafePattern {
    regex: regex::Regex,
    max_subject_len: usize,
}

impl SafePattern {
    /// Vet and compile `pattern`.
    ///
    /// `max_subject_len` caps both the pattern length and the length of
    /// subjects later presented to [`SafePattern::captures`].
    ///
    /// Checks run in order: length cap, PCRE-only tokens, nested
    /// quantifiers, overlapping repeated alternatives, then dialect
    /// compilation.
    pub fn compile(
        pattern: &str,
        nocase: bool,
        max_subject_len: usize,
    ) -> Result<Self, PatternError> {
        if pattern.len() > max_subject_len {
            return Err(PatternError::TooLong {
                len: pattern.len(),
                max: max_subject_len,
            });
        }

        for &token in PCRE_ONLY_TOKENS {
            if pattern.contains(token) {
                return Err(PatternError::UnsupportedPcre { token });
            }
        }

        scan_repetition(pattern)?;

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(nocase)
            .size_limit(REGEX_COMPILED_SIZE_LIMIT)
            .build()
            .map_err(|e| PatternError::syntax(e.to_string()))?;

        Ok(Self {
            regex,
            max_subject_len,
        })
    }

    /// Match `subject`, returning the capture list on success.
    ///
    /// Slot 0 is the full match; unmatched optional groups resolve to
    /// the empty string. Subjects longer than the configured cap return
    /// `None`, a non-match rather than an error.
    pub fn captures(&self, subject: &str) -> Option<Vec<String>> {
        if subject.len() > self.max_subject_len {
            return None;
        }
        self.regex.captures(subject).map(|caps| {
            caps.iter()
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
    }

    /// Whether the pattern declares any capture group beyond the full
    /// match.
    pub fn has_groups(&self) -> bool {
        self.regex.captures_len() > 1
    }
}

/// State for one open `(` while scanning a pattern.
struct GroupFrame {
    /// Byte offset just past the `(`.
    body_start: usize,
    /// A repetition operator occurred somewhere inside this group.
    has_repetition: bool,
    /// Byte offsets of `|` at this group's own nesting level.
    alternation_splits: Vec<usize>,
}

/// Scan for a quantified group that either contains a repetition itself
/// (`(a+)+`) or repeats overlapping alternatives (`(a|a){2,}`).
///
/// Backslash escapes are skipped and character-class contents ignored,
/// so `\(a\+\)+` and `[+*]` do not trip the scan. Everything else is
/// deliberately coarse.
fn scan_repetition(pattern: &str) -> Result<(), PatternError> {
    let mut stack: Vec<GroupFrame> = Vec::new();
    // The most recently closed group, if the scanner is positioned
    // directly after its `)`.
    let mut just_closed: Option<(GroupFrame, usize)> = None;
    let mut in_class = false;

    let mut chars = pattern.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            just_closed = None;
            continue;
        }
        if in_class {
            if c == ']' {
                in_class = false;
            }
            continue;
        }

        match c {
            '[' => {
                in_class = true;
                just_closed = None;
            }
            '(' => {
                stack.push(GroupFrame {
                    body_start: i + 1,
                    has_repetition: false,
                    alternation_splits: Vec::new(),
                });
                just_closed = None;
            }
            ')' => {
                just_closed = stack.pop().map(|frame| {
                    if let Some(parent) = stack.last_mut() {
                        parent.has_repetition |= frame.has_repetition;
                    }
                    (frame, i)
                });
            }
            '|' => {
                if let Some(top) = stack.last_mut() {
                    top.alternation_splits.push(i);
                }
                just_closed = None;
            }
            '+' | '*' | '{' => {
                if let Some((frame, body_end)) = just_closed.take() {
                    if frame.has_repetition {
                        return Err(PatternError::NestedQuantifier);
                    }
                    if has_overlapping_alternatives(pattern, &frame, body_end) {
                        return Err(PatternError::OverlappingAlternation);
                    }
                }
                if let Some(top) = stack.last_mut() {
                    top.has_repetition = true;
                }
            }
            _ => {
                just_closed = None;
            }
        }
    }

    Ok(())
}

/// Whether a closed group's top-level alternatives textually overlap:
/// two identical branches, or one branch a prefix of another.
fn has_overlapping_alternatives(pattern: &str, frame: &GroupFrame, body_end: usize) -> bool {
    if frame.alternation_splits.is_empty() {
        return false;
    }

    let mut branches = Vec::with_capacity(frame.alternation_splits.len() + 1);
    let mut start = frame.body_start;
    for &split in &frame.alternation_splits {
        branches.push(&pattern[start..split]);
        start = split + 1;
    }
    branches.push(&pattern[start..body_end]);

    for (idx, a) in branches.iter().enumerate() {
        for b in &branches[idx + 1..] {
            if a.starts_with(b) || b.starts_with(a) {
                return true;
            }
        }
    }
    false
}
