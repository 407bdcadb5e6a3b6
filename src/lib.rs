//! rewtrace: an offline Apache `mod_rewrite` evaluator.
//!
//! Evaluates rewrite directives against a concrete request URL without
//! touching the network, the filesystem, or any external process. Every
//! call returns the final URL, an optional HTTP status code, and a
//! per-line trace explaining why each directive was reached, matched,
//! and applied: the computational core behind an interactive rule
//! tester.
//!
//! # Example
//!
//! ```
//! use rewtrace::{evaluate, EvalInput, Status};
//!
//! let input = EvalInput {
//!     url: "http://example.com/old-page".to_string(),
//!     rules: "RewriteEngine On\nRewriteRule ^old-page$ /new-page [R=301,L]".to_string(),
//!     server_variables: Default::default(),
//! };
//!
//! let result = evaluate(&input);
//! assert_eq!(result.final_url, "http://example.com/new-page");
//! assert_eq!(result.status, Status::Redirect);
//! assert_eq!(result.status_code, Some(301));
//! assert_eq!(result.trace.len(), 2);
//! ```
//!
//! Evaluation is total: malformed directives, unsafe patterns, and
//! boundary rejections all materialize as trace content or an output
//! status, never as a panic or error. The engine performs no
//! filesystem existence tests, honors no proxy or environment flags,
//! and reports PCRE-only patterns as unsupported rather than
//! miscompiling them.

pub mod constants;
pub mod directive;
pub mod error;
mod eval;
mod limits;
mod parse;
pub mod render;
mod safety;
mod trace;
pub mod url;

pub use directive::{Directive, Document, Node, RuleFlags};
pub use error::{InputError, PatternError};
pub use eval::{evaluate, evaluate_with_limits};
pub use limits::Limits;
pub use parse::parse;
pub use render::{RenderConfig, render_trace, render_trace_with_config};
pub use safety::SafePattern;
pub use trace::{EvalInput, Evaluation, Status, TraceLine};
