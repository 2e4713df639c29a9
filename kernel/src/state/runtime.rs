//! Runtime expressions: operator costs and effect deltas that depend on the
//! current numeric values.
//!
//! A reference `:<index>:` stands for the numeric value of variable
//! `<index>`. References are replaced by parenthesised literals, then the
//! closed expression goes to the task's [`crate::arith::ArithmeticEvaluator`].

use crate::state::transition::TransitionError;
use crate::task::TaskContext;

/// Replace every `:<index>:` reference with the value it names.
///
/// # Errors
///
/// [`TransitionError::UnresolvedReference`] for an unterminated reference,
/// a non-integer index, or an index outside `numeric`.
pub fn substitute_references(expression: &str, numeric: &[f64]) -> Result<String, TransitionError> {
    let unresolved = |reference: &str| TransitionError::UnresolvedReference {
        expression: expression.into(),
        reference: reference.into(),
    };
    let mut out = String::with_capacity(expression.len());
    let mut rest = expression;
    while let Some(open) = rest.find(':') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find(':').ok_or_else(|| unresolved(after))?;
        let reference = &after[..close];
        let value = reference
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|var| numeric.get(var))
            .ok_or_else(|| unresolved(reference))?;
        out.push('(');
        out.push_str(&value.to_string());
        out.push(')');
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Substitute references against `numeric` and evaluate.
///
/// # Errors
///
/// [`TransitionError::UnresolvedReference`] from substitution, or
/// [`TransitionError::Expression`] when the evaluator rejects the result.
pub fn evaluate(ctx: &TaskContext, expression: &str, numeric: &[f64]) -> Result<f64, TransitionError> {
    let closed = substitute_references(expression, numeric)?;
    let value = ctx
        .arithmetic()
        .evaluate(&closed)
        .map_err(|source| TransitionError::Expression {
            expression: expression.into(),
            source,
        })?;
    tracing::trace!(expression, substituted = %closed, value, "runtime expression evaluated");
    Ok(value)
}
