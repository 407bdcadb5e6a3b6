//! Quote-aware argument splitting for directive lines.
//!
//! Directive arguments are split on unquoted whitespace. A matched pair
//! of single or double quotes groups its content into the surrounding
//! token; the quote characters themselves are consumed. Backslashes
//! inside quotes are kept as literal characters; the rewrite language
//! performs no escape processing at this layer. An unmatched quote
//! consumes the rest of the line as one token, keeping the splitter
//! total over arbitrary input.

use winnow::{
    Parser,
    combinator::{alt, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    stream::Stream,
    token::{take_till, take_while},
};

pub(crate) type Input<'i> = winnow::stream::LocatingSlice<winnow::stream::Str<'i>>;
pub(crate) type PResult<O> = Result<O, ErrMode<ContextError>>;

fn is_bare_terminator(c: char) -> bool {
    c.is_whitespace() || c == '"' || c == '\''
}

/// A run of ordinary characters: everything up to whitespace or a quote.
fn bare_segment<'i>(input: &mut Input<'i>) -> PResult<&'i str> {
    take_till(1.., is_bare_terminator).parse_next(input)
}

/// A quoted run: the delimiters are consumed, the body (which may hold
/// whitespace) is kept verbatim. A missing closing quote swallows the
/// remainder of the line.
fn quoted_segment<'i>(input: &mut Input<'i>) -> PResult<&'i str> {
    alt((
        preceded('"', terminated(take_till(0.., '"'), opt('"'))),
        preceded('\'', terminated(take_till(0.., '\''), opt('\''))),
    ))
    .parse_next(input)
}

/// One whitespace-delimited token, assembled from bare and quoted runs.
///
/// Mixed forms such as `a"b c"d` collapse into the single token `ab cd`.
fn token(input: &mut Input<'_>) -> PResult<String> {
    repeat(1.., alt((quoted_segment, bare_segment))).parse_next(input)
}

/// Split a directive argument string into its whitespace-delimited,
/// quote-grouped tokens.
///
/// Total: any input produces a (possibly empty) token list.
pub(crate) fn split_args(args: &str) -> Vec<String> {
    let mut input = Input::new(args);
    let mut tokens = Vec::new();

    loop {
        let _: PResult<&str> = take_while(0.., char::is_whitespace).parse_next(&mut input);
        if input.peek_token().is_none() {
            break;
        }
        match token(&mut input) {
            Ok(tok) => tokens.push(tok),
            // `token` requires at least one segment and the stream is
            // non-empty here, so this arm is unreachable in practice;
            // bail rather than loop forever if that ever changes.
            Err(_) => break,
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::split_args;

    #[test]
    fn splits_on_unquoted_whitespace() {
        assert_eq!(split_args("a b  c"), vec!["a", "b", "c"]);
        assert_eq!(split_args("  leading\ttabs "), vec!["leading", "tabs"]);
    }

    #[test]
    fn empty_and_blank_input_yield_no_tokens() {
        assert_eq!(split_args(""), Vec::<String>::new());
        assert_eq!(split_args("   \t "), Vec::<String>::new());
    }

    #[test]
    fn double_quotes_preserve_whitespace() {
        assert_eq!(split_args(r#""a b" c"#), vec!["a b", "c"]);
    }

    #[test]
    fn single_quotes_preserve_whitespace() {
        assert_eq!(split_args("'a b' c"), vec!["a b", "c"]);
    }

    #[test]
    fn quote_characters_are_consumed() {
        assert_eq!(split_args(r#"^/x$ "/some dir/y""#), vec!["^/x$", "/some dir/y"]);
    }

    #[test]
    fn adjacent_quoted_and_bare_runs_join() {
        assert_eq!(split_args(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn backslashes_inside_quotes_stay_literal() {
        assert_eq!(split_args(r#""a\ b""#), vec![r"a\ b"]);
        assert_eq!(split_args(r#""\d+""#), vec![r"\d+"]);
    }

    #[test]
    fn backslashes_outside_quotes_stay_literal() {
        assert_eq!(split_args(r"^(\w+)$ /x"), vec![r"^(\w+)$", "/x"]);
    }

    #[test]
    fn unmatched_quote_consumes_rest_of_line() {
        assert_eq!(split_args(r#"a "b c"#), vec!["a", "b c"]);
        assert_eq!(split_args("'"), vec![""]);
    }

    #[test]
    fn other_quote_kind_is_literal_inside_quotes() {
        assert_eq!(split_args(r#""it's" x"#), vec!["it's", "x"]);
    }
}
