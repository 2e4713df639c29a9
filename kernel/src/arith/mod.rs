//! Pluggable arithmetic evaluation for runtime costs and effect deltas.
//!
//! The state module substitutes `:<index>:` variable references with
//! literals; what reaches an [`ArithmeticEvaluator`] is a closed arithmetic
//! expression. [`PestEvaluator`] is the default implementation.

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

/// Typed failure while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    #[error("syntax error in expression: {detail}")]
    Syntax { detail: String },
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },
    #[error("function {function} expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },
}

/// Evaluates a fully-substituted arithmetic expression.
///
/// Implementations must be deterministic: the same text yields the same value.
pub trait ArithmeticEvaluator: std::fmt::Debug + Send + Sync {
    /// # Errors
    ///
    /// [`ArithError`] when the expression cannot be parsed or evaluated.
    fn evaluate(&self, expression: &str) -> Result<f64, ArithError>;
}

#[derive(Parser)]
#[grammar = "arith/arith.pest"]
struct ArithParser;

/// `pest`-based evaluator.
///
/// Operators by increasing precedence: `+ -`, `* / %`, unary `+ -`, `^`
/// (right-associative). Functions: `abs sqrt floor ceil round exp ln log
/// min max pow`. Constants: `pi e inf nan`; `NaN` is also
/// accepted so rendered runtime values read back unchanged.
pub struct PestEvaluator {
    pratt: PrattParser<Rule>,
}

impl PestEvaluator {
    #[must_use]
    pub fn new() -> Self {
        let pratt = PrattParser::new()
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left)
                | Op::infix(Rule::div, Assoc::Left)
                | Op::infix(Rule::rem, Assoc::Left))
            .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
            .op(Op::infix(Rule::pow, Assoc::Right));
        Self { pratt }
    }

    fn eval_expr(&self, pairs: Pairs<'_, Rule>) -> Result<f64, ArithError> {
        self.pratt
            .map_primary(|primary| self.eval_primary(primary))
            .map_prefix(|op, rhs| {
                let value = rhs?;
                Ok(if op.as_rule() == Rule::neg { -value } else { value })
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                Ok(match op.as_rule() {
                    Rule::add => lhs + rhs,
                    Rule::sub => lhs - rhs,
                    Rule::mul => lhs * rhs,
                    Rule::div => lhs / rhs,
                    Rule::rem => lhs % rhs,
                    _ => lhs.powf(rhs),
                })
            })
            .parse(pairs)
    }

    fn eval_primary(&self, pair: Pair<'_, Rule>) -> Result<f64, ArithError> {
        match pair.as_rule() {
            Rule::number => pair.as_str().parse().map_err(|_| ArithError::Syntax {
                detail: format!("bad number literal '{}'", pair.as_str()),
            }),
            Rule::ident => constant(pair.as_str()),
            Rule::expr => self.eval_expr(pair.into_inner()),
            Rule::call => {
                let mut inner = pair.into_inner();
                let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
                let args = inner
                    .map(|arg| self.eval_expr(arg.into_inner()))
                    .collect::<Result<Vec<f64>, ArithError>>()?;
                call(name, &args)
            }
            rule => Err(ArithError::Syntax {
                detail: format!("unexpected {rule:?}"),
            }),
        }
    }
}

impl Default for PestEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PestEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PestEvaluator").finish_non_exhaustive()
    }
}

impl ArithmeticEvaluator for PestEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, ArithError> {
        let mut pairs =
            ArithParser::parse(Rule::calculation, expression).map_err(|e| ArithError::Syntax {
                detail: e.to_string(),
            })?;
        let expr = pairs.next().ok_or_else(|| ArithError::Syntax {
            detail: "empty expression".into(),
        })?;
        self.eval_expr(expr.into_inner())
    }
}

fn constant(name: &str) -> Result<f64, ArithError> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        "inf" => Ok(f64::INFINITY),
        "nan" | "NaN" => Ok(f64::NAN),
        _ => Err(ArithError::UnknownIdentifier { name: name.into() }),
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, ArithError> {
    let unary = |f: fn(f64) -> f64| match args {
        [x] => Ok(f(*x)),
        _ => Err(arity(name, "1", args.len())),
    };
    match name {
        "abs" => unary(f64::abs),
        "sqrt" => unary(f64::sqrt),
        "floor" => unary(f64::floor),
        "ceil" => unary(f64::ceil),
        "round" => unary(f64::round),
        "exp" => unary(f64::exp),
        "ln" | "log" => unary(f64::ln),
        "pow" => match args {
            [base, exp] => Ok(base.powf(*exp)),
            _ => Err(arity(name, "2", args.len())),
        },
        "min" | "max" => {
            let pick = if name == "min" { f64::min } else { f64::max };
            args.iter()
                .copied()
                .reduce(pick)
                .ok_or_else(|| arity(name, "at least 1", 0))
        }
        _ => Err(ArithError::UnknownIdentifier { name: name.into() }),
    }
}

fn arity(function: &str, expected: &str, got: usize) -> ArithError {
    ArithError::Arity {
        function: function.into(),
        expected: expected.into(),
        got,
    }
}
