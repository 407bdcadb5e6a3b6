// Trace rendering.
//
// Formats an evaluation result as aligned plain text for terminal
// hosts. Purely presentational; the contract records in `trace` stay
// the single source of truth.

use std::fmt::Write;

use crate::trace::{Evaluation, TraceLine};

/// Configuration for trace rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to prefix each line with its source line number.
    pub show_line_numbers: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
        }
    }
}

/// Render an evaluation with the default configuration.
///
/// # Examples
/// ```
/// use rewtrace::{evaluate, render_trace, EvalInput};
///
/// let input = EvalInput {
///     url: "http://example.com/a".to_string(),
///     rules: "RewriteEngine On\nRewriteRule ^a$ /b [L]".to_string(),
///     server_variables: Default::default(),
/// };
/// let text = render_trace(&evaluate(&input));
/// assert!(text.contains("http://example.com/b"));
/// ```
pub fn render_trace(result: &Evaluation) -> String {
    render_trace_with_config(result, &RenderConfig::default())
}

/// Render an evaluation with custom configuration.
pub fn render_trace_with_config(result: &Evaluation, config: &RenderConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "final url: {}", result.final_url);
    match result.status_code {
        Some(code) => {
            let _ = writeln!(out, "status:    {} ({code})", result.status);
        }
        None => {
            let _ = writeln!(out, "status:    {}", result.status);
        }
    }
    if let Some(message) = &result.message {
        let _ = writeln!(out, "note:      {message}");
    }

    if !result.trace.is_empty() {
        let _ = writeln!(out);
        for line in &result.trace {
            render_line(&mut out, line, config);
        }
    }

    out
}

/// One trace line: `<line no> <marker> <text> [-- message]`.
///
/// Markers: `*` applied, `.` considered but not matched, `-` not
/// reached, `!` invalid.
fn render_line(out: &mut String, line: &TraceLine, config: &RenderConfig) {
    let marker = if !line.valid {
        '!'
    } else if !line.reached {
        '-'
    } else if line.met {
        '*'
    } else {
        '.'
    };

    if config.show_line_numbers {
        let _ = write!(out, "{:>4}  ", line.line_no);
    }
    let _ = write!(out, "{marker} {}", line.raw_line);
    if let Some(message) = &line.message {
        let _ = write!(out, "  -- {message}");
    }
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::trace::EvalInput;

    fn sample() -> Evaluation {
        evaluate(&EvalInput {
            url: "http://example.com/old".to_string(),
            rules: "RewriteEngine On\nRewriteRule ^old$ /new [R=301,L]\nRewriteRule ^x$ /y"
                .to_string(),
            server_variables: Default::default(),
        })
    }

    #[test]
    fn header_carries_url_and_status() {
        let text = render_trace(&sample());
        assert!(text.contains("final url: http://example.com/new"));
        assert!(text.contains("redirect (301)"));
    }

    #[test]
    fn markers_reflect_dispositions() {
        let text = render_trace(&sample());
        assert!(text.contains("* RewriteRule ^old$ /new [R=301,L]"));
        assert!(text.contains("- RewriteRule ^x$ /y"));
    }

    #[test]
    fn messages_are_appended() {
        let result = evaluate(&EvalInput {
            url: "http://example.com/a".to_string(),
            rules: "RewriteEngine On\nRewriteRule ^(a+)+$ /boom".to_string(),
            server_variables: Default::default(),
        });
        let text = render_trace(&result);
        assert!(text.contains("! RewriteRule"));
        assert!(text.contains("-- pattern contains nested quantifiers"));
    }

    #[test]
    fn line_numbers_can_be_suppressed() {
        let config = RenderConfig {
            show_line_numbers: false,
        };
        let text = render_trace_with_config(&sample(), &config);
        assert!(text.contains("\n* RewriteRule"));
    }
}
