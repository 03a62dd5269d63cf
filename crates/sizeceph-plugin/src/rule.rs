//! CRUSH rule creation — §4.6 `create_rule`
//!
//! CRUSH rule storage and rule-id allocation belong to the host's placement
//! layer, which is out of scope here (see `spec.md` §1). This module
//! expresses the codec's side of `create_rule` as a narrow trait the host
//! implements, rather than depending on a placement crate.

use sizeceph_common::Result;

/// Host-provided CRUSH rule registry, as seen from a codec plugin.
///
/// A real host backs this with its CRUSH map; tests back it with
/// [`InMemoryRuleRegistry`].
pub trait CrushRuleSink {
    /// Look up an existing rule by name, if any.
    fn find_rule(&self, name: &str) -> Option<i32>;

    /// Add a new "default / host-level / indep / erasure-typed" rule for
    /// a `k`-data/`m`-parity code and return its id.
    ///
    /// # Errors
    /// Implementations return an error if the host rejects the rule (e.g.
    /// CRUSH map exhaustion).
    fn add_erasure_rule(&mut self, name: &str, k: u8, m: u8) -> Result<i32>;
}

/// `create_rule(name, crush, err)`: if a rule named `name` already exists,
/// return its id; otherwise ask `crush` to add a new erasure-typed rule and
/// propagate the id or error.
///
/// # Errors
/// Propagates whatever [`CrushRuleSink::add_erasure_rule`] returns.
pub fn create_rule(crush: &mut dyn CrushRuleSink, name: &str, k: u8, m: u8) -> Result<i32> {
    if let Some(id) = crush.find_rule(name) {
        tracing::debug!(name, id, "reusing existing CRUSH rule");
        return Ok(id);
    }
    crush.add_erasure_rule(name, k, m)
}

/// An in-process stand-in for a host's CRUSH rule registry, used in tests
/// and by hosts that have no real placement layer wired in yet.
#[derive(Debug, Default)]
pub struct InMemoryRuleRegistry {
    rules: Vec<String>,
}

impl InMemoryRuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CrushRuleSink for InMemoryRuleRegistry {
    fn find_rule(&self, name: &str) -> Option<i32> {
        self.rules
            .iter()
            .position(|existing| existing == name)
            .map(|idx| i32::try_from(idx).expect("rule count fits in i32"))
    }

    fn add_erasure_rule(&mut self, name: &str, _k: u8, _m: u8) -> Result<i32> {
        self.rules.push(name.to_string());
        Ok(i32::try_from(self.rules.len() - 1).expect("rule count fits in i32"))
    }
}
