// Host contract records.
//
// The input and output records exchanged with hosts, serde-derived so a
// CLI, editor panel, or HTTP façade can move them as JSON without any
// mapping layer. Field names serialize in camelCase and statuses in
// kebab-case to match the wire vocabulary hosts expect.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One evaluation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalInput {
    /// The request URL to rewrite, e.g. `http://example.com/old-page`.
    pub url: String,
    /// The ruleset text, one directive per line.
    pub rules: String,
    /// Server variables visible to `%{NAME}` references.
    ///
    /// `REQUEST_URI` and `QUERY_STRING` are synthesized from the URL
    /// and overwrite caller-supplied values of the same name.
    #[serde(default)]
    pub server_variables: BTreeMap<String, String>,
}

/// Overall disposition of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// The walk completed; no redirect status was set.
    Ok,
    /// A rule set an HTTP status (`R=`, `F`, `G`).
    Redirect,
    /// The request was rejected at the boundary; see
    /// [`Evaluation::message`].
    Error,
    /// Reserved for hosts that gate whole inputs on capability checks;
    /// the core reports unsupported patterns per line instead.
    Unsupported,
    /// The iteration cap fired before the walk finished.
    LimitExceeded,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "ok",
            Status::Redirect => "redirect",
            Status::Error => "error",
            Status::Unsupported => "unsupported",
            Status::LimitExceeded => "limit-exceeded",
        };
        f.write_str(s)
    }
}

/// Why one source line was or was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceLine {
    /// 1-based source line number.
    pub line_no: u32,
    /// The source line, trimmed.
    pub raw_line: String,
    /// False when the line could not be honored as written: a parse
    /// error, or a pattern the safety layer rejected.
    pub valid: bool,
    /// Whether evaluation actually considered this line.
    pub reached: bool,
    /// Whether the line's condition/pattern matched (or, for inert
    /// lines such as comments, trivially true).
    pub met: bool,
    /// Human-readable detail for invalid or unsupported lines.
    pub message: Option<String>,
}

impl TraceLine {
    pub(crate) fn new(line_no: u32, raw_line: &str) -> Self {
        Self {
            line_no,
            raw_line: raw_line.trim().to_string(),
            valid: true,
            reached: true,
            met: true,
            message: None,
        }
    }

    pub(crate) fn disposition(mut self, reached: bool, met: bool) -> Self {
        self.reached = reached;
        self.met = met;
        self
    }

    pub(crate) fn invalid(mut self, message: impl Into<String>) -> Self {
        self.valid = false;
        self.met = false;
        self.message = Some(message.into());
        self
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// One evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// The URL after all applicable rewrites.
    pub final_url: String,
    /// Overall disposition.
    pub status: Status,
    /// HTTP status set by a rule, if any.
    pub status_code: Option<u16>,
    /// One entry per non-blank source line, in source order.
    pub trace: Vec<TraceLine>,
    /// Detail for boundary rejections (`Status::Error`).
    pub message: Option<String>,
}

impl Evaluation {
    /// A boundary rejection: the input never reached the evaluator.
    pub(crate) fn rejected(input_url: &str, message: String) -> Self {
        Self {
            final_url: input_url.to_string(),
            status: Status::Error,
            status_code: None,
            trace: Vec::new(),
            message: Some(message),
        }
    }
}
