//! Flag-list recognition for `RewriteCond` and `RewriteRule`.
//!
//! A flag list is a comma-separated token list, optionally wrapped in
//! `[...]`. Flag names are case-insensitive; unknown flags are silently
//! ignored, matching the engine's tolerance posture toward input it
//! cannot act on.

use crate::constants::{DEFAULT_REDIRECT_STATUS, DEFAULT_SKIP_COUNT};
use crate::directive::RuleFlags;

/// Flags recognized on a `RewriteCond`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CondFlags {
    pub nocase: bool,
    pub ornext: bool,
}

/// Strip one optional layer of `[...]` brackets at the token boundary.
fn strip_brackets(list: &str) -> &str {
    let list = list.strip_prefix('[').unwrap_or(list);
    list.strip_suffix(']').unwrap_or(list)
}

/// Split a flag token into its name and the text after `=`, if any.
fn name_and_value(flag: &str) -> (String, Option<&str>) {
    match flag.split_once('=') {
        Some((name, value)) => (name.trim().to_ascii_uppercase(), Some(value)),
        None => (flag.trim().to_ascii_uppercase(), None),
    }
}

/// Parse a `RewriteCond` flag list. Unknown flags are ignored.
pub(crate) fn parse_cond_flags(list: &str) -> CondFlags {
    let mut flags = CondFlags::default();
    for flag in strip_brackets(list).split(',') {
        match name_and_value(flag).0.as_str() {
            "NC" | "NOCASE" => flags.nocase = true,
            "OR" | "ORNEXT" => flags.ornext = true,
            _ => {}
        }
    }
    flags
}

/// Parse a `RewriteRule` flag list. Unknown flags are ignored.
///
/// `R=<non-numeric>` falls back to 302 and `S=<non-numeric>` to 1, so a
/// typo weakens a flag rather than invalidating the whole rule.
pub(crate) fn parse_rule_flags(list: &str) -> RuleFlags {
    let mut flags = RuleFlags::default();
    for flag in strip_brackets(list).split(',') {
        let (name, value) = name_and_value(flag);
        match name.as_str() {
            "L" | "LAST" => flags.last = true,
            "R" | "REDIRECT" => {
                flags.redirect = Some(
                    value
                        .and_then(|v| v.trim().parse::<u16>().ok())
                        .unwrap_or(DEFAULT_REDIRECT_STATUS),
                );
            }
            "NC" | "NOCASE" => flags.nocase = true,
            "QSA" | "QSAPPEND" => flags.qsappend = true,
            "QSD" | "QSDISCARD" => flags.qsdiscard = true,
            "NE" | "NOESCAPE" => flags.noescape = true,
            "N" | "NEXT" => flags.next = true,
            "END" => flags.end = true,
            "F" | "FORBIDDEN" => flags.forbidden = true,
            "G" | "GONE" => flags.gone = true,
            "C" | "CHAIN" => flags.chain = true,
            "S" | "SKIP" => {
                // Only the S=N form is a skip flag; a bare S is ignored
                // like any other unrecognized token.
                if let Some(v) = value {
                    flags.skip = Some(v.trim().parse::<u32>().ok().unwrap_or(DEFAULT_SKIP_COUNT));
                }
            }
            "PT" | "PASSTHROUGH" => flags.passthrough = true,
            "P" | "PROXY" => flags.proxy = true,
            "T" => flags.type_ = value.map(str::to_string),
            "E" => {
                if let Some(spec) = value {
                    flags.env.push(spec.to_string());
                }
            }
            "CO" => {
                if let Some(spec) = value {
                    flags.cookie.push(spec.to_string());
                }
            }
            _ => {}
        }
    }
    flags
}
