//! Axiom evaluation: derived variables recomputed after every transition.
//!
//! The transition engine treats the evaluator as opaque and calls it once
//! per successor, after all direct effects are applied.

use serde::Deserialize;

use crate::task::variable::Fact;

/// Recomputes axiom-derived variables in place.
pub trait AxiomEvaluator: std::fmt::Debug + Send + Sync {
    fn evaluate(&self, vars: &mut [i32], numeric: &mut [f64]);
}

/// Evaluator for tasks without derived variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAxioms;

impl AxiomEvaluator for NoAxioms {
    fn evaluate(&self, _vars: &mut [i32], _numeric: &mut [f64]) {}
}

/// A derivation rule: when every condition holds, set `head`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AxiomRule {
    /// Stratification layer; lower layers are evaluated first.
    pub layer: u32,
    #[serde(default)]
    pub conditions: Vec<Fact>,
    pub head: Fact,
}

/// Layered rule evaluator with negation-by-default.
///
/// Every derived variable is reset to its default value, then each layer
/// (ascending) is iterated until no rule fires. A variable is derived at
/// most once per evaluation: once a rule has set it, later rules with the
/// same head variable are ignored. Evaluation therefore terminates even when
/// rules in one layer disagree, and the first rule in declaration order
/// wins. Rules in a layer may only rely on defaults of derived variables in
/// the same or higher layers; that is the stratification the upstream
/// translator guarantees.
#[derive(Debug, Clone, Default)]
pub struct RuleAxiomEvaluator {
    defaults: Vec<Fact>,
    layers: Vec<Vec<AxiomRule>>,
}

impl RuleAxiomEvaluator {
    /// `defaults` lists every derived variable with its default value.
    #[must_use]
    pub fn new(defaults: Vec<Fact>, rules: Vec<AxiomRule>) -> Self {
        let layer_count = rules.iter().map(|r| r.layer as usize + 1).max().unwrap_or(0);
        let mut layers = vec![Vec::new(); layer_count];
        for rule in rules {
            layers[rule.layer as usize].push(rule);
        }
        Self { defaults, layers }
    }

    /// Derived-variable defaults.
    #[must_use]
    pub fn defaults(&self) -> &[Fact] {
        &self.defaults
    }

    /// All rules, layer by layer.
    pub fn rules(&self) -> impl Iterator<Item = &AxiomRule> {
        self.layers.iter().flatten()
    }
}

impl AxiomEvaluator for RuleAxiomEvaluator {
    fn evaluate(&self, vars: &mut [i32], _numeric: &mut [f64]) {
        for default in &self.defaults {
            if let Some(slot) = vars.get_mut(default.var) {
                *slot = default.value;
            }
        }
        let mut derived = vec![false; vars.len()];
        for layer in &self.layers {
            loop {
                let mut changed = false;
                for rule in layer {
                    let head = rule.head.var;
                    if derived.get(head) != Some(&false)
                        || !rule.conditions.iter().all(|c| c.holds_in(vars))
                    {
                        continue;
                    }
                    vars[head] = rule.head.value;
                    derived[head] = true;
                    changed = true;
                }
                if !changed {
                    break;
                }
            }
        }
    }
}
