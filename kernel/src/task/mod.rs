//! Task module: the immutable description every state is interpreted against.
//!
//! Variables, the operator table, the optional landmark graph, the axiom and
//! arithmetic evaluators, and the metric flags are gathered into a single
//! [`TaskContext`] built once before search and shared by `&` afterwards.
//!
//! Depends on `arith`, `axioms` and `landmarks::graph`. Never on `state`.

pub mod context;
pub mod document;
pub mod operator;
pub mod tokens;
pub mod variable;

pub use context::{MetricConfig, TaskContext, TaskContextBuilder, TaskError};
pub use document::TaskDocumentV1;
pub use operator::{EffectKind, Operator, OperatorCost, OperatorId, PrePost};
pub use tokens::{ParseError, TokenReader};
pub use variable::{Fact, Variable, NUMERIC_SENTINEL, UNUSED_NUMERIC};
