//! Lossless line-oriented parser for rewrite rulesets.
//!
//! Each input line yields exactly one [`Node`]; the original text and
//! 1-based line number are preserved on every node so the document can
//! be traced line-for-line. The parser is total: malformed directive
//! lines become [`Directive::ParseError`] nodes and parsing continues
//! on the next line. Nothing here ever panics or returns an error.

use crate::directive::{Directive, Document, Node};

mod args;
mod flags;


pub(crate) use args::split_args;

/// Parse a ruleset into its directive-node sequence.
///
/// Lines are split on `\n`; a trailing `\r` per line is dropped so CRLF
/// input parses identically to LF input.
///
/// # Examples
/// ```
/// use rewtrace::{parse, Directive};
///
/// let doc = parse("# comment\nRewriteEngine On\nRewriteRule ^a$ /b [L]");
/// assert_eq!(doc.nodes.len(), 3);
/// assert!(matches!(doc.nodes[1].directive, Directive::EngineToggle { on: true }));
/// ```
pub fn parse(rules: &str) -> Document {
    let nodes = rules
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            Node::new(idx as u32 + 1, line, classify_line(line))
        })
        .collect();
    Document { nodes }
}

/// Classify one line. Blank and comment lines are recognized before any
/// directive-name dispatch; everything else is a directive whose name is
/// matched case-insensitively.
fn classify_line(line: &str) -> Directive {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Directive::Blank;
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        return Directive::Comment {
            text: rest.trim().to_string(),
        };
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (trimmed, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "rewriteengine" => parse_engine(rest),
        "rewritebase" => parse_base(rest),
        "rewritecond" => parse_cond(rest),
        "rewriterule" => parse_rule(rest),
        _ => Directive::Unknown {
            name: name.to_string(),
            args: rest.to_string(),
        },
    }
}

/// `RewriteEngine On|Off`. The argument is matched case-insensitively;
/// anything else is a parse error.
fn parse_engine(rest: &str) -> Directive {
    let tokens = split_args(rest);
    match tokens.as_slice() {
        [arg] if arg.eq_ignore_ascii_case("on") => Directive::EngineToggle { on: true },
        [arg] if arg.eq_ignore_ascii_case("off") => Directive::EngineToggle { on: false },
        _ => Directive::ParseError {
            message: format!("RewriteEngine expects On or Off, got {:?}", rest.trim_end()),
        },
    }
}

/// `RewriteBase <path>`. The first token is taken verbatim as the base
/// path; extra tokens are ignored.
fn parse_base(rest: &str) -> Directive {
    let tokens = split_args(rest);
    match tokens.first() {
        Some(base) if !base.is_empty() => Directive::Base { base: base.clone() },
        _ => Directive::ParseError {
            message: "RewriteBase requires a path argument".to_string(),
        },
    }
}

/// `RewriteCond <test> <pattern> [flags]`.
fn parse_cond(rest: &str) -> Directive {
    let tokens = split_args(rest);
    if tokens.len() < 2 {
        return Directive::ParseError {
            message: "RewriteCond requires a test string and a pattern".to_string(),
        };
    }

    let cond_flags = tokens
        .get(2)
        .map(|list| flags::parse_cond_flags(list))
        .unwrap_or_default();

    let (negated, pattern) = match tokens[1].strip_prefix('!') {
        Some(stripped) => (true, stripped.to_string()),
        None => (false, tokens[1].clone()),
    };

    Directive::Cond {
        test: tokens[0].clone(),
        pattern,
        nocase: cond_flags.nocase,
        ornext: cond_flags.ornext,
        negated,
    }
}

/// `RewriteRule <pattern> <substitution> [flags]`.
fn parse_rule(rest: &str) -> Directive {
    let tokens = split_args(rest);
    if tokens.len() < 2 {
        return Directive::ParseError {
            message: "RewriteRule requires a pattern and a substitution".to_string(),
        };
    }

    Directive::Rule {
        pattern: tokens[0].clone(),
        substitution: tokens[1].clone(),
        flags: tokens
            .get(2)
            .map(|list| flags::parse_rule_flags(list))
            .unwrap_or_default(),
    }
}
