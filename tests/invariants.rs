// Quantified invariants of the evaluation contract, checked across a
// corpus of rulesets rather than single hand-picked cases.

use std::collections::BTreeMap;

use rewtrace::{EvalInput, Evaluation, evaluate};

const CORPUS: &[&str] = &[
    "",
    "\n\n\n",
    "# only a comment",
    "RewriteEngine Off\nRewriteRule ^test$ /changed [L]",
    "RewriteEngine On",
    "RewriteEngine On\nRewriteRule ^nomatch$ /x [L]",
    "RewriteEngine On\nRewriteCond %{HTTP_HOST} ^a$\nRewriteRule ^.*$ /x",
    "RewriteEngine On\nRewriteRule ^test$ /changed [L]\nRewriteRule ^changed$ /again",
    "RewriteEngine On\nRewriteRule ^(a+)+$ /boom",
    "RewriteEngine On\nRewriteRule broken",
    "Unknown directive here\nRewriteEngine On\nRewriteBase /app\nRewriteRule ^x$ y [L]",
    "RewriteEngine On\nRewriteCond %{A} ^a$ [OR]\nRewriteCond %{B} ^b$\nRewriteRule ^test$ /or",
];

fn run(url: &str, rules: &str) -> Evaluation {
    evaluate(&EvalInput {
        url: url.to_string(),
        rules: rules.to_string(),
        server_variables: BTreeMap::new(),
    })
}

fn non_blank_lines(rules: &str) -> usize {
    rules.split('\n').filter(|l| !l.trim().is_empty()).count()
}

#[test]
fn trace_has_one_entry_per_non_blank_line() {
    for rules in CORPUS {
        let result = run("http://example.com/test", rules);
        assert_eq!(
            result.trace.len(),
            non_blank_lines(rules),
            "trace length mismatch for ruleset {rules:?}"
        );
    }
}

#[test]
fn trace_is_in_source_order() {
    for rules in CORPUS {
        let result = run("http://example.com/test", rules);
        let lines: Vec<u32> = result.trace.iter().map(|t| t.line_no).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted, "out-of-order trace for ruleset {rules:?}");
    }
}

#[test]
fn invalid_implies_not_met() {
    for rules in CORPUS {
        let result = run("http://example.com/test", rules);
        for line in &result.trace {
            assert!(
                line.valid || !line.met,
                "valid=false must imply met=false at line {} of {rules:?}",
                line.line_no
            );
        }
    }
}

#[test]
fn engine_off_input_is_identity() {
    for url in [
        "http://example.com/test",
        "http://example.com/a/b/c?x=1&y=2",
        "https://example.com:8443/deep/path",
    ] {
        let result = run(url, "RewriteEngine Off\nRewriteRule ^.*$ /changed [R=301,L]");
        assert_eq!(result.final_url, url);
        assert_eq!(result.status_code, None);
    }
}

#[test]
fn ruleset_without_rules_is_identity() {
    for rules in ["", "# note", "RewriteEngine On\nRewriteBase /app"] {
        let result = run("http://example.com/a?q=1", rules);
        assert_eq!(result.final_url, "http://example.com/a?q=1");
        assert_eq!(result.status_code, None);
    }
}

#[test]
fn all_rules_failing_to_match_is_identity() {
    let rules = "RewriteEngine On\n\
                 RewriteRule ^never-a$ /x\n\
                 RewriteRule ^never-b$ /y [R=302]";
    let result = run("http://example.com/test?q=1", rules);
    assert_eq!(result.final_url, "http://example.com/test?q=1");
    assert_eq!(result.status_code, None);
}

#[test]
fn entries_after_a_stop_are_unreached() {
    let rules = "RewriteEngine On\n\
                 RewriteRule ^test$ /done [L]\n\
                 RewriteCond %{A} ^a$\n\
                 RewriteRule ^done$ /more\n\
                 RewriteRule ^done$ /even-more";
    let result = run("http://example.com/test", rules);
    for line in result.trace.iter().skip(2) {
        assert!(
            !line.reached,
            "line {} should be unreached after [L]",
            line.line_no
        );
    }
}

#[test]
fn trailing_whitespace_does_not_change_the_trace() {
    for rules in CORPUS {
        let padded: String = rules
            .split('\n')
            .map(|l| format!("{l}   "))
            .collect::<Vec<_>>()
            .join("\n");
        let plain = run("http://example.com/test", rules);
        let spaced = run("http://example.com/test", &padded);
        assert_eq!(
            plain.trace, spaced.trace,
            "trailing whitespace changed the trace for {rules:?}"
        );
        assert_eq!(plain.final_url, spaced.final_url);
    }
}
