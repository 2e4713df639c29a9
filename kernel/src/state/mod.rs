//! Search states: discrete vector, numeric vector, landmark progress and
//! accumulated path cost.
//!
//! Construction paths:
//! - [`State::read_initial`] from the `begin_state ... end_state` token block;
//! - [`State::from_values`] from already-decoded vectors;
//! - [`State::successor`] by applying an operator (see [`transition`]).
//!
//! Identity (equality, ordering, fingerprint) covers only the two value
//! vectors. Landmark progress and g-value are path-dependent annotations.

pub mod runtime;
pub mod transition;

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::ops::Index;

use crate::hash::{canonical_hash, ContentHash, DOMAIN_STATE};
use crate::landmarks::{LandmarkId, LandmarkProgress, NeededLandmarks};
use crate::task::{ParseError, TaskContext, TokenReader, NUMERIC_SENTINEL, UNUSED_NUMERIC};

pub use transition::TransitionError;

/// One search node's state.
///
/// Invariants: both vectors have one slot per task variable; a slot whose
/// discrete value is not [`NUMERIC_SENTINEL`] holds [`UNUSED_NUMERIC`] in
/// the numeric vector.
#[derive(Debug, Clone)]
pub struct State {
    vars: Vec<i32>,
    numeric: Vec<f64>,
    landmarks: LandmarkProgress,
    g_value: f64,
}

impl State {
    /// Read the initial state.
    ///
    /// Format: `begin_state`, then one value per variable in index order,
    /// then `end_state`. A value of `-1` marks a numeric variable and is
    /// followed by its floating-point magnitude.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from the token stream, or
    /// [`ParseError::ValueOutOfDomain`] for a discrete value outside its
    /// variable's domain.
    pub fn read_initial(ctx: &TaskContext, reader: &mut TokenReader<'_>) -> Result<Self, ParseError> {
        reader.expect_magic("begin_state")?;
        let count = ctx.variable_count();
        let mut vars = Vec::with_capacity(count);
        let mut numeric = Vec::with_capacity(count);
        for var in 0..count {
            let value: i32 = reader.parse("state value")?;
            if value == NUMERIC_SENTINEL {
                numeric.push(reader.parse::<f64>("numeric magnitude")?);
            } else {
                check_domain(ctx, var, value)?;
                numeric.push(UNUSED_NUMERIC);
            }
            vars.push(value);
        }
        reader.expect_magic("end_state")?;
        Ok(Self::initial(ctx, vars, numeric))
    }

    /// Build an initial state from decoded vectors.
    ///
    /// # Errors
    ///
    /// [`ParseError::LengthMismatch`] when either vector does not match the
    /// variable count, [`ParseError::ValueOutOfDomain`] for bad discrete
    /// values, [`ParseError::NumericSentinelMismatch`] when a discrete-only
    /// slot carries a numeric value.
    pub fn from_values(ctx: &TaskContext, vars: Vec<i32>, numeric: Vec<f64>) -> Result<Self, ParseError> {
        let expected = ctx.variable_count();
        for found in [vars.len(), numeric.len()] {
            if found != expected {
                return Err(ParseError::LengthMismatch { expected, found });
            }
        }
        for (var, (&value, &magnitude)) in vars.iter().zip(&numeric).enumerate() {
            if value == NUMERIC_SENTINEL {
                continue;
            }
            check_domain(ctx, var, value)?;
            if magnitude.to_bits() != UNUSED_NUMERIC.to_bits() {
                return Err(ParseError::NumericSentinelMismatch {
                    var,
                    value: magnitude.to_string(),
                });
            }
        }
        Ok(Self::initial(ctx, vars, numeric))
    }

    fn initial(ctx: &TaskContext, vars: Vec<i32>, numeric: Vec<f64>) -> Self {
        let landmarks = LandmarkProgress::seed_initial(ctx.landmarks(), &vars);
        Self {
            vars,
            numeric,
            landmarks,
            g_value: 0.0,
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Discrete value of `var`. Panics when out of range.
    #[must_use]
    pub fn get(&self, var: usize) -> i32 {
        self.vars[var]
    }

    /// Numeric magnitude of `var`; [`UNUSED_NUMERIC`] for discrete-only
    /// variables. Panics when out of range.
    #[must_use]
    pub fn numeric_value(&self, var: usize) -> f64 {
        self.numeric[var]
    }

    #[must_use]
    pub fn vars(&self) -> &[i32] {
        &self.vars
    }

    #[must_use]
    pub fn numeric_values(&self) -> &[f64] {
        &self.numeric
    }

    /// Accumulated path cost from the initial state.
    #[must_use]
    pub const fn g_value(&self) -> f64 {
        self.g_value
    }

    #[must_use]
    pub const fn landmarks(&self) -> &LandmarkProgress {
        &self.landmarks
    }

    /// Reached landmarks that are false here and must be achieved again.
    #[must_use]
    pub fn needed_landmarks(&self, ctx: &TaskContext) -> NeededLandmarks {
        self.landmarks.needed(ctx.landmarks(), &self.vars)
    }

    /// Reached set and its summed cost.
    #[must_use]
    pub fn partial_plan(&self) -> (&BTreeSet<LandmarkId>, i64) {
        self.landmarks.partial_plan()
    }

    // -----------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------

    /// Same discrete and numeric vectors. Numeric slots compare bitwise so
    /// that equality stays reflexive and agrees with [`State::fingerprint`].
    #[must_use]
    pub fn identity_eq(&self, other: &Self) -> bool {
        self.vars == other.vars
            && self.numeric.len() == other.numeric.len()
            && self
                .numeric
                .iter()
                .zip(&other.numeric)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Lexicographic order over the discrete vector only.
    #[must_use]
    pub fn cmp_vars(&self, other: &Self) -> std::cmp::Ordering {
        self.vars.cmp(&other.vars)
    }

    /// Content hash of both vectors, for duplicate detection in drivers.
    ///
    /// Layout: discrete values as `i32` LE, then numeric values as `f64`
    /// bit patterns LE.
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let mut data = Vec::with_capacity(self.vars.len() * 4 + self.numeric.len() * 8);
        for value in &self.vars {
            data.extend_from_slice(&value.to_le_bytes());
        }
        for value in &self.numeric {
            data.extend_from_slice(&value.to_bits().to_le_bytes());
        }
        canonical_hash(DOMAIN_STATE, &data)
    }

    /// One `  name: value` line per variable. Numeric variables print their
    /// magnitude.
    #[must_use]
    pub fn dump(&self, ctx: &TaskContext) -> String {
        let mut out = String::new();
        for (var, (&value, &magnitude)) in self.vars.iter().zip(&self.numeric).enumerate() {
            let name = &ctx.variable(var).name;
            // Writing to a String cannot fail.
            let _ = if value == NUMERIC_SENTINEL {
                writeln!(out, "  {name}: {magnitude}")
            } else {
                writeln!(out, "  {name}: {value}")
            };
        }
        out
    }
}

impl Index<usize> for State {
    type Output = i32;

    fn index(&self, var: usize) -> &i32 {
        &self.vars[var]
    }
}

fn check_domain(ctx: &TaskContext, var: usize, value: i32) -> Result<(), ParseError> {
    let domain_size = ctx.variable(var).domain_size;
    let in_domain = usize::try_from(value).is_ok_and(|v| v < domain_size);
    if in_domain {
        Ok(())
    } else {
        Err(ParseError::ValueOutOfDomain {
            var,
            value,
            domain_size,
        })
    }
}
