// Variable expansion.
//
// Resolves `%{NAME}`, `$N`, and `%N` references in a single left-to-
// right pass, so produced text is never re-expanded. Unrecognized names
// resolve to the empty string; malformed references (an unclosed
// `%{`, a bare `$`) pass through literally.

use super::state::{CaptureSlots, EvalState};

/// Expand a condition test string: `%{NAME}` against the environment,
/// `$1..$9` against the rule captures, `%1..%9` against the condition
/// captures.
pub(crate) fn expand(text: &str, state: &EvalState) -> String {
    expand_inner(text, state, &state.rule_captures, false)
}

/// Expand a rule substitution. Identical to [`expand`] except that the
/// dollar references resolve against the current match (`current`) and
/// `$0` yields the full match.
pub(crate) fn expand_substitution(text: &str, state: &EvalState, current: &CaptureSlots) -> String {
    expand_inner(text, state, current, true)
}

fn expand_inner(
    text: &str,
    state: &EvalState,
    dollar: &CaptureSlots,
    allow_full_match: bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => match chars.peek() {
                Some('{') => {
                    chars.next();
                    let name: String = {
                        let mut name = String::new();
                        let mut closed = false;
                        for c in chars.by_ref() {
                            if c == '}' {
                                closed = true;
                                break;
                            }
                            name.push(c);
                        }
                        if !closed {
                            // Unterminated reference: emit literally.
                            out.push_str("%{");
                            out.push_str(&name);
                            continue;
                        }
                        name
                    };
                    out.push_str(state.env.get(&name).map(String::as_str).unwrap_or(""));
                }
                Some(d @ '1'..='9') => {
                    let slot = d.to_digit(10).unwrap_or(0) as usize;
                    chars.next();
                    out.push_str(state.cond_captures.get(slot));
                }
                _ => out.push('%'),
            },
            '$' => match chars.peek() {
                Some(d @ '1'..='9') => {
                    let slot = d.to_digit(10).unwrap_or(0) as usize;
                    chars.next();
                    out.push_str(dollar.get(slot));
                }
                Some('0') if allow_full_match => {
                    chars.next();
                    out.push_str(dollar.get(0));
                }
                _ => out.push('$'),
            },
            _ => out.push(c),
        }
    }

    out
}
