//! Operators and their effect descriptors.
//!
//! An [`Operator`] is an ordered list of [`PrePost`] effect descriptors plus
//! prevail conditions and a cost. The effect discriminator is the closed
//! [`EffectKind`] enum; the legacy integer codes used by upstream encodings
//! are confined to [`EffectKind::from_code`] / [`EffectKind::code`].

use serde::Deserialize;

use crate::task::variable::Fact;

// ---------------------------------------------------------------------------
// OperatorId
// ---------------------------------------------------------------------------

/// Stable index into the task's operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperatorId(usize);

impl OperatorId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// EffectKind
// ---------------------------------------------------------------------------

/// How an effect changes its variable's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Set the discrete slot to `post`. Numeric slot untouched.
    #[default]
    Discrete,
    /// Set the discrete slot to `post`, add the delta to the numeric slot.
    Increase,
    /// Set the discrete slot to `post`, subtract the delta from the numeric slot.
    Decrease,
    /// Set the discrete slot to `post`, overwrite the numeric slot with the delta.
    Assign,
    /// Leaves both slots untouched. Only consumes the precondition slot in
    /// the structural index. `code` is the upstream discriminator (-5 or -6).
    Structural { code: i8 },
}

impl EffectKind {
    /// Decode an upstream discriminator.
    ///
    /// Values that are not one of the numeric codes are ordinary discrete
    /// assignments (the upstream slot then carries a plain precondition).
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -2 => Self::Increase,
            -3 => Self::Decrease,
            -4 => Self::Assign,
            -5 => Self::Structural { code: -5 },
            -6 => Self::Structural { code: -6 },
            _ => Self::Discrete,
        }
    }

    /// Upstream discriminator, `None` for [`EffectKind::Discrete`].
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        match self {
            Self::Discrete => None,
            Self::Increase => Some(-2),
            Self::Decrease => Some(-3),
            Self::Assign => Some(-4),
            Self::Structural { code } => Some(code as i32),
        }
    }

    /// Whether this kind reads or writes the numeric slot.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Increase | Self::Decrease | Self::Assign)
    }
}

// ---------------------------------------------------------------------------
// PrePost
// ---------------------------------------------------------------------------

/// One effect descriptor of an operator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrePost {
    /// Affected variable.
    pub var: usize,
    /// Required value before the operator applies (`None` = no precondition).
    #[serde(default)]
    pub pre: Option<i32>,
    /// Discrete value written when the effect fires.
    pub post: i32,
    #[serde(default)]
    pub kind: EffectKind,
    /// Literal numeric delta for numeric kinds.
    #[serde(default)]
    pub delta: f64,
    /// Expression computing the delta at transition time. Takes precedence
    /// over `delta` when present.
    #[serde(default)]
    pub runtime_delta: Option<String>,
    /// Effect conditions, evaluated against the predecessor.
    #[serde(default)]
    pub conditions: Vec<Fact>,
}

impl PrePost {
    /// Discrete assignment `var := post`, optionally requiring `pre`.
    #[must_use]
    pub fn assign(var: usize, pre: Option<i32>, post: i32) -> Self {
        Self {
            var,
            pre,
            post,
            kind: EffectKind::Discrete,
            delta: 0.0,
            runtime_delta: None,
            conditions: Vec::new(),
        }
    }

    /// Numeric effect of the given kind with a literal delta.
    #[must_use]
    pub fn numeric(var: usize, kind: EffectKind, delta: f64) -> Self {
        Self {
            var,
            pre: None,
            post: crate::task::variable::NUMERIC_SENTINEL,
            kind,
            delta,
            runtime_delta: None,
            conditions: Vec::new(),
        }
    }

    /// Replace the literal delta with a runtime expression.
    #[must_use]
    pub fn with_runtime_delta(mut self, expression: impl Into<String>) -> Self {
        self.runtime_delta = Some(expression.into());
        self
    }

    /// Add an effect condition.
    #[must_use]
    pub fn when(mut self, condition: Fact) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Whether the effect fires: every condition holds in `vars`.
    #[must_use]
    pub fn does_fire(&self, vars: &[i32]) -> bool {
        self.conditions.iter().all(|c| c.holds_in(vars))
    }
}

// ---------------------------------------------------------------------------
// OperatorCost / Operator
// ---------------------------------------------------------------------------

/// Declared cost of an operator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OperatorCost {
    Literal(f64),
    /// Arithmetic expression over `:<index>:` variable references.
    Runtime(String),
}

impl Default for OperatorCost {
    fn default() -> Self {
        Self::Literal(1.0)
    }
}

/// A grounded operator (or an axiom, when `is_axiom` is set).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub prevail: Vec<Fact>,
    #[serde(default, alias = "effects")]
    pub pre_post: Vec<PrePost>,
    #[serde(default)]
    pub cost: OperatorCost,
    #[serde(default)]
    pub is_axiom: bool,
}

impl Operator {
    #[must_use]
    pub fn new(name: impl Into<String>, cost: OperatorCost) -> Self {
        Self {
            name: name.into(),
            prevail: Vec::new(),
            pre_post: Vec::new(),
            cost,
            is_axiom: false,
        }
    }

    #[must_use]
    pub fn with_prevail(mut self, fact: Fact) -> Self {
        self.prevail.push(fact);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: PrePost) -> Self {
        self.pre_post.push(effect);
        self
    }

    /// Mark as an axiom. Axioms are only applied through the axiom evaluator.
    #[must_use]
    pub fn as_axiom(mut self) -> Self {
        self.is_axiom = true;
        self
    }

    /// Discrete applicability: prevail conditions and every `pre` hold.
    #[must_use]
    pub fn is_applicable(&self, vars: &[i32]) -> bool {
        self.prevail.iter().all(|f| f.holds_in(vars))
            && self.pre_post.iter().all(|pp| match pp.pre {
                Some(pre) => vars.get(pp.var) == Some(&pre),
                None => true,
            })
    }

    /// Numeric feasibility: no `Decrease` effect would drive its slot below zero.
    ///
    /// Uses the literal delta of every decrease effect, whether or not the
    /// effect is conditional.
    #[must_use]
    pub fn is_numerically_feasible(&self, numeric: &[f64]) -> bool {
        self.pre_post
            .iter()
            .filter(|pp| pp.kind == EffectKind::Decrease)
            .all(|pp| match numeric.get(pp.var) {
                Some(value) => value - pp.delta >= 0.0,
                None => true,
            })
    }
}
