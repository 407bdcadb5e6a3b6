//! The rewrite evaluator.
//!
//! Walks a parsed directive sequence once against the request URL,
//! threading the mutable state machine through every directive and
//! emitting one trace entry per non-blank source line. All failure
//! modes surface as trace content or an output status; nothing here
//! returns an error.

use tracing::debug;

use crate::directive::{Directive, Node, RuleFlags};
use crate::error::InputError;
use crate::limits::Limits;
use crate::parse;
use crate::safety::SafePattern;
use crate::trace::{EvalInput, Evaluation, Status, TraceLine};
use crate::url::RequestUrl;

mod state;
mod vars;


use state::{CaptureSlots, EvalState};

/// Evaluate with the default [`Limits`].
///
/// # Examples
/// ```
/// use rewtrace::{evaluate, EvalInput};
///
/// let input = EvalInput {
///     url: "http://example.com/old-page".to_string(),
///     rules: "RewriteEngine On\nRewriteRule ^old-page$ /new-page [R=301,L]".to_string(),
///     server_variables: Default::default(),
/// };
/// let result = evaluate(&input);
/// assert_eq!(result.final_url, "http://example.com/new-page");
/// assert_eq!(result.status_code, Some(301));
/// ```
pub fn evaluate(input: &EvalInput) -> Evaluation {
    evaluate_with_limits(input, &Limits::default())
}

/// Evaluate one request against one ruleset.
///
/// Total: boundary rejections (over-long or non-http(s) URL, directive
/// count above `max_rule_count`) come back as `Status::Error` records
/// with an empty trace and an explanatory message.
pub fn evaluate_with_limits(input: &EvalInput, limits: &Limits) -> Evaluation {
    if input.url.len() > limits.max_url_length {
        let err = InputError::UrlTooLong {
            len: input.url.len(),
            max: limits.max_url_length,
        };
        return Evaluation::rejected(&input.url, err.to_string());
    }

    let url = if RequestUrl::has_http_scheme(&input.url) {
        RequestUrl::parse(&input.url)
    } else {
        None
    };
    let Some(url) = url else {
        let err = InputError::InvalidUrl {
            url: input.url.clone(),
        };
        return Evaluation::rejected(&input.url, err.to_string());
    };

    let doc = parse::parse(&input.rules);
    if let Some(max) = limits.max_rule_count {
        let count = doc.directive_count();
        if count > max {
            let err = InputError::TooManyRules { count, max };
            return Evaluation::rejected(&input.url, err.to_string());
        }
    }

    Evaluator {
        state: EvalState::new(url, &input.server_variables),
        limits,
        trace: Vec::new(),
        limit_hit: false,
    }
    .run(&doc.nodes)
}

/// Per-line disposition of an evaluated condition.
struct CondOutcome {
    reached: bool,
    met: bool,
    valid: bool,
    message: Option<String>,
}

impl CondOutcome {
    fn skipped() -> Self {
        Self {
            reached: false,
            met: false,
            valid: true,
            message: None,
        }
    }
}

struct Evaluator<'a> {
    state: EvalState,
    limits: &'a Limits,
    trace: Vec<TraceLine>,
    limit_hit: bool,
}

impl Evaluator<'_> {
    fn run(mut self, nodes: &[Node]) -> Evaluation {
        // Indices buffered since the first condition of the group under
        // construction. Blank and comment lines are transparent inside
        // a group; anything else breaks it.
        let mut pending: Vec<usize> = Vec::new();

        for (i, node) in nodes.iter().enumerate() {
            if self.limit_hit {
                break;
            }
            match &node.directive {
                Directive::Cond { .. } => pending.push(i),
                Directive::Blank | Directive::Comment { .. } if !pending.is_empty() => {
                    pending.push(i)
                }
                Directive::Rule {
                    pattern,
                    substitution,
                    flags,
                } => {
                    self.eval_rule(nodes, &pending, node, pattern, substitution, flags);
                    pending.clear();
                }
                _ => {
                    self.flush_orphan_conds(nodes, &pending);
                    pending.clear();
                    self.eval_simple(node);
                }
            }
        }
        if !self.limit_hit {
            self.flush_orphan_conds(nodes, &pending);
        }

        self.finish()
    }

    fn finish(self) -> Evaluation {
        let status = if self.state.redirect.is_some() {
            Status::Redirect
        } else if self.limit_hit {
            Status::LimitExceeded
        } else {
            Status::Ok
        };
        Evaluation {
            final_url: self.state.url.assemble(),
            status,
            status_code: self.state.redirect,
            trace: self.trace,
            message: None,
        }
    }

    /// Directives that do not participate in condition grouping.
    fn eval_simple(&mut self, node: &Node) {
        let entry = TraceLine::new(node.line_no, &node.raw);
        match &node.directive {
            Directive::Blank => {}
            Directive::Comment { .. } => self.trace.push(entry),
            Directive::EngineToggle { on } => {
                self.state.engine_enabled = *on;
                self.trace.push(entry);
            }
            Directive::Base { base } => {
                let reached = self.state.engine_enabled;
                if reached {
                    self.state.rewrite_base = base.clone();
                }
                self.trace.push(entry.disposition(reached, true));
            }
            Directive::Unknown { name, .. } => {
                self.trace.push(
                    entry
                        .disposition(self.state.engine_enabled, false)
                        .with_message(format!("Unsupported directive: {name}")),
                );
            }
            Directive::ParseError { message } => {
                self.trace.push(entry.invalid(message.clone()));
            }
            Directive::Cond { .. } | Directive::Rule { .. } => {
                unreachable!("conditions and rules are grouped by the walk")
            }
        }
    }

    /// Conditions with no rule to bind to: evaluated for the trace,
    /// discarded for decision purposes.
    fn flush_orphan_conds(&mut self, nodes: &[Node], pending: &[usize]) {
        for &idx in pending {
            let node = &nodes[idx];
            match &node.directive {
                Directive::Cond {
                    test,
                    pattern,
                    nocase,
                    negated,
                    ..
                } => {
                    let entry = TraceLine::new(node.line_no, &node.raw);
                    if !self.conds_reached() {
                        self.trace.push(entry.disposition(false, false));
                        continue;
                    }
                    let (outcome, _captures) = self.eval_cond(test, pattern, *nocase, *negated);
                    self.push_cond_outcome(entry, outcome);
                }
                Directive::Blank => {}
                _ => self.trace.push(TraceLine::new(node.line_no, &node.raw)),
            }
        }
    }

    /// Whether conditions and rules are considered at all right now.
    fn conds_reached(&self) -> bool {
        self.state.engine_enabled && !self.state.stopped && !self.state.hard_stop
    }

    fn push_cond_outcome(&mut self, entry: TraceLine, outcome: CondOutcome) {
        let mut entry = entry.disposition(outcome.reached, outcome.met);
        if !outcome.valid {
            entry = entry.invalid(outcome.message.unwrap_or_default());
        }
        self.trace.push(entry);
    }

    /// Evaluate one condition. Returns its trace outcome and whether it
    /// counts as matched for chain purposes, plus any captures.
    fn eval_cond(
        &self,
        test: &str,
        pattern: &str,
        nocase: bool,
        negated: bool,
    ) -> (CondOutcome, Option<Vec<String>>) {
        let subject = vars::expand(test, &self.state);
        match SafePattern::compile(pattern, nocase, self.limits.max_regex_subject_length) {
            Err(err) => {
                debug!(pattern, %err, "condition pattern rejected");
                (
                    CondOutcome {
                        reached: true,
                        met: false,
                        valid: false,
                        message: Some(err.to_string()),
                    },
                    None,
                )
            }
            Ok(compiled) => {
                let captures = compiled.captures(&subject);
                let met = captures.is_some() != negated;
                // Only a real (non-negated) regex match contributes
                // captures; a satisfied negation has none by definition.
                let captures = if negated { None } else { captures };
                (
                    CondOutcome {
                        reached: true,
                        met,
                        valid: true,
                        message: None,
                    },
                    captures,
                )
            }
        }
    }

    /// Evaluate a rule together with its buffered condition group.
    fn eval_rule(
        &mut self,
        nodes: &[Node],
        pending: &[usize],
        rule_node: &Node,
        pattern: &str,
        substitution: &str,
        flags: &RuleFlags,
    ) {
        let conds: Vec<&Node> = pending
            .iter()
            .map(|&idx| &nodes[idx])
            .filter(|n| matches!(n.directive, Directive::Cond { .. }))
            .collect();

        if !self.conds_reached() {
            // Conditions share the rule's pre-condition disposition.
            for &idx in pending {
                let node = &nodes[idx];
                match &node.directive {
                    Directive::Blank => {}
                    Directive::Cond { .. } => self
                        .trace
                        .push(TraceLine::new(node.line_no, &node.raw).disposition(false, false)),
                    _ => self.trace.push(TraceLine::new(node.line_no, &node.raw)),
                }
            }
            self.trace
                .push(TraceLine::new(rule_node.line_no, &rule_node.raw).disposition(false, false));
            return;
        }

        let (satisfied, outcomes, group_captures) = self.eval_group(&conds);

        // Emit buffered entries in source order, pairing each condition
        // with its computed outcome and passing comments through.
        let mut outcomes = outcomes.into_iter();
        for &idx in pending {
            let node = &nodes[idx];
            match &node.directive {
                Directive::Blank => {}
                Directive::Cond { .. } => {
                    let outcome = outcomes
                        .next()
                        .expect("one outcome per condition in the group");
                    self.push_cond_outcome(TraceLine::new(node.line_no, &node.raw), outcome);
                }
                _ => self.trace.push(TraceLine::new(node.line_no, &node.raw)),
            }
        }

        if !satisfied {
            self.trace
                .push(TraceLine::new(rule_node.line_no, &rule_node.raw).disposition(false, false));
            return;
        }
        if let Some(captures) = group_captures {
            self.state.cond_captures.store(&captures);
        }

        self.apply_rule(rule_node, pattern, substitution, flags);
    }

    /// Compute a condition group's value: OR chains joined by AND,
    /// evaluated left to right with short-circuiting.
    fn eval_group(&self, conds: &[&Node]) -> (bool, Vec<CondOutcome>, Option<Vec<String>>) {
        let mut outcomes = Vec::with_capacity(conds.len());
        let mut group_satisfied = true;
        // Set while skipping the rest of a chain that already matched.
        let mut chain_matched = false;
        let mut group_captures: Option<Vec<String>> = None;

        for (k, node) in conds.iter().enumerate() {
            let Directive::Cond {
                test,
                pattern,
                nocase,
                ornext,
                negated,
            } = &node.directive
            else {
                unreachable!("eval_group only receives conditions")
            };
            // A trailing OR on the last condition terminates its chain.
            let chain_end = !*ornext || k == conds.len() - 1;

            if !group_satisfied || chain_matched {
                outcomes.push(CondOutcome::skipped());
                if chain_matched && chain_end {
                    chain_matched = false;
                }
                continue;
            }

            let (outcome, captures) = self.eval_cond(test, pattern, *nocase, *negated);
            let matched = outcome.met;
            outcomes.push(outcome);

            if matched {
                if let Some(captures) = captures {
                    if captures.len() > 1 {
                        group_captures = Some(captures);
                    }
                }
                chain_matched = !chain_end;
            } else if chain_end {
                group_satisfied = false;
            }
        }

        (
            group_satisfied,
            outcomes,
            if group_satisfied { group_captures } else { None },
        )
    }

    /// The subject a rule pattern is matched against: the current path
    /// with the active non-root base prefix stripped when present.
    fn match_path(&self) -> String {
        let path = &self.state.url.path;
        let base = self.state.rewrite_base.trim_matches('/');
        if !base.is_empty() {
            if let Some(rest) = path.strip_prefix(base) {
                // Only strip at a segment boundary.
                if rest.is_empty() || rest.starts_with('/') {
                    return rest.strip_prefix('/').unwrap_or(rest).to_string();
                }
            }
        }
        path.clone()
    }

    /// Pattern match, substitution, and flag application for a rule
    /// whose condition group is satisfied.
    fn apply_rule(&mut self, node: &Node, pattern: &str, substitution: &str, flags: &RuleFlags) {
        let entry = TraceLine::new(node.line_no, &node.raw);
        let compiled =
            match SafePattern::compile(pattern, flags.nocase, self.limits.max_regex_subject_length)
            {
                Ok(compiled) => compiled,
                Err(err) => {
                    debug!(line = node.line_no, pattern, %err, "rule pattern rejected");
                    self.trace
                        .push(entry.disposition(true, false).invalid(err.to_string()));
                    return;
                }
            };

        let subject = self.match_path();
        let Some(captures) = compiled.captures(&subject) else {
            self.trace.push(entry.disposition(true, false));
            return;
        };

        let mut current = CaptureSlots::default();
        current.store(&captures);
        self.state.rule_captures = current.clone();

        self.apply_substitution(substitution, flags, &current);
        debug!(
            line = node.line_no,
            pattern,
            path = %self.state.url.path,
            "rule applied"
        );
        self.apply_flags(flags);

        self.state.iterations += 1;
        if self.state.iterations > self.limits.max_iterations {
            self.limit_hit = true;
        }

        self.trace.push(entry);
    }

    fn apply_substitution(&mut self, substitution: &str, flags: &RuleFlags, current: &CaptureSlots) {
        if substitution == "-" {
            return;
        }

        let expanded = vars::expand_substitution(substitution, &self.state, current);
        let original_query = self.state.url.query.clone();

        if RequestUrl::has_http_scheme(&expanded) {
            if let Some(new_url) = RequestUrl::parse(&expanded) {
                self.state.url.scheme = new_url.scheme;
                self.state.url.host = new_url.host;
                self.state.url.path = new_url.path;
                self.state.url.query = combine_query(new_url.query, original_query, flags);
                return;
            }
        }

        let (new_path, new_query) = match expanded.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (expanded, String::new()),
        };

        let new_path = if !new_path.starts_with('/') && self.state.rewrite_base != "/" {
            format!(
                "{}/{}",
                self.state.rewrite_base.trim_end_matches('/'),
                new_path
            )
        } else {
            new_path
        };

        self.state.url.path = new_path.strip_prefix('/').unwrap_or(&new_path).to_string();
        self.state.url.query = combine_query(new_query, original_query, flags);
    }

    fn apply_flags(&mut self, flags: &RuleFlags) {
        if let Some(code) = flags.redirect {
            self.state.redirect = Some(code);
            self.state.stopped = true;
        }
        if flags.forbidden {
            self.state.redirect = Some(403);
            self.state.stopped = true;
        }
        if flags.gone {
            self.state.redirect = Some(410);
            self.state.stopped = true;
        }
        if flags.last {
            self.state.stopped = true;
        }
        if flags.end {
            self.state.hard_stop = true;
            self.state.stopped = true;
        }
    }
}

/// Query-string policy after a substitution produced `new` while the
/// URL previously carried `original`.
fn combine_query(new: String, original: String, flags: &RuleFlags) -> String {
    if flags.qsdiscard {
        return new;
    }
    if flags.qsappend && !original.is_empty() {
        return if new.is_empty() {
            original
        } else {
            format!("{new}&{original}")
        };
    }
    if new.is_empty() { original } else { new }
}
