//! State variables and facts.

use serde::Deserialize;

/// Discrete-slot value marking a numeric-only variable.
pub const NUMERIC_SENTINEL: i32 = -1;

/// Numeric-slot value for a purely discrete variable.
///
/// Every numeric slot of a discrete-only variable holds exactly this value.
pub const UNUSED_NUMERIC: f64 = f64::MAX;

/// A declared state variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable {
    /// Human-readable name (diagnostics only).
    pub name: String,
    /// Number of values in the finite domain. Numeric-only variables still
    /// declare the domain the upstream encoding gave them (usually 0 or 1).
    pub domain_size: usize,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, domain_size: usize) -> Self {
        Self {
            name: name.into(),
            domain_size,
        }
    }
}

/// A single `(variable, value)` assignment.
///
/// Ordered by variable first, then value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct Fact {
    pub var: usize,
    pub value: i32,
}

impl Fact {
    #[must_use]
    pub const fn new(var: usize, value: i32) -> Self {
        Self { var, value }
    }

    /// Whether this fact holds in the given discrete vector.
    ///
    /// Out-of-range variables never hold.
    #[must_use]
    pub fn holds_in(&self, vars: &[i32]) -> bool {
        vars.get(self.var) == Some(&self.value)
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "var{}={}", self.var, self.value)
    }
}
