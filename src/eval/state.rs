// Mutable evaluation state.
//
// One `EvalState` is built per `evaluate` call and discarded afterward;
// nothing persists across calls.

use std::collections::BTreeMap;

use crate::constants::CAPTURE_SLOTS;
use crate::url::RequestUrl;

/// Fixed-width backreference storage.
///
/// Slot 0 holds the full match (rule side only); slots 1..9 hold the
/// numbered groups. Slots never written resolve to the empty string, so
/// lookups need no occupancy bookkeeping.
#[derive(Debug, Clone, Default)]
pub(crate) struct CaptureSlots {
    slots: [String; CAPTURE_SLOTS],
}

impl CaptureSlots {
    /// Resolve slot `n`, returning `""` for out-of-range or unset slots.
    pub(crate) fn get(&self, n: usize) -> &str {
        self.slots.get(n).map(String::as_str).unwrap_or("")
    }

    /// Overwrite all slots from a match's capture list; slots past the
    /// end of the list are cleared.
    pub(crate) fn store(&mut self, captures: &[String]) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            match captures.get(i) {
                Some(value) => slot.clone_from(value),
                None => slot.clear(),
            }
        }
    }
}

/// The state machine threaded through one directive walk.
#[derive(Debug)]
pub(crate) struct EvalState {
    /// URL components undergoing rewrite.
    pub url: RequestUrl,
    /// Server variables visible to `%{NAME}`.
    pub env: BTreeMap<String, String>,
    /// Latest `$N` backreferences from the most recent matched rule.
    pub rule_captures: CaptureSlots,
    /// Latest `%N` backreferences from the most recent capturing
    /// condition of a satisfied group.
    pub cond_captures: CaptureSlots,
    /// Active base path. `/` means no base.
    pub rewrite_base: String,
    /// Off until a `RewriteEngine On` line runs.
    pub engine_enabled: bool,
    /// Set by `L`, `R`, `F`, `G`, `END`; suppresses all further
    /// condition/rule evaluation.
    pub stopped: bool,
    /// Set by `END`.
    pub hard_stop: bool,
    /// HTTP status to report, once a rule sets one.
    pub redirect: Option<u16>,
    /// Count of matched rules, checked against the iteration cap.
    pub iterations: usize,
}

impl EvalState {
    /// Build a fresh state for `url`, seeding the environment from the
    /// caller's variables and then overwriting `REQUEST_URI` and
    /// `QUERY_STRING` with values synthesized from the URL.
    pub(crate) fn new(url: RequestUrl, server_variables: &BTreeMap<String, String>) -> Self {
        let mut env = server_variables.clone();
        env.insert("REQUEST_URI".to_string(), url.request_uri());
        env.insert("QUERY_STRING".to_string(), url.query.clone());

        Self {
            url,
            env,
            rule_captures: CaptureSlots::default(),
            cond_captures: CaptureSlots::default(),
            rewrite_base: "/".to_string(),
            engine_enabled: false,
            stopped: false,
            hard_stop: false,
            redirect: None,
            iterations: 0,
        }
    }
}
