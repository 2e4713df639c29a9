//! Successor generator: a decision tree over discrete variables that
//! yields the operators applicable in a state.
//!
//! Every operator stored in the tree already has its discrete
//! preconditions encoded by the path to it. Numeric feasibility (a decrease
//! must not drive its variable below zero) is checked once, after
//! collection.
//!
//! Token format, recursively:
//! - `check <n> <op>*n` is a leaf listing operator indices;
//! - `switch <var>` is followed by the immediate subtree, one subtree per
//!   value in `var`'s domain, then the default subtree.

use std::fmt::Write as _;

use crate::state::State;
use crate::task::{OperatorId, ParseError, TaskContext, TokenReader};

/// Decision tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessorGenerator {
    Switch(Box<SwitchNode>),
    Leaf(Vec<OperatorId>),
}

/// Branch on one variable's current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchNode {
    pub var: usize,
    /// Operators that do not constrain `var`.
    pub immediate: SuccessorGenerator,
    /// Subtree for each value of `var`, indexed by value.
    pub by_value: Vec<SuccessorGenerator>,
    /// Subtree consulted whatever `var` holds.
    pub default: SuccessorGenerator,
}

impl SuccessorGenerator {
    /// Read a tree from its token encoding.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnknownGeneratorTag`] for a tag other than `switch` or
    /// `check`, [`ParseError::VariableOutOfRange`] and
    /// [`ParseError::OperatorOutOfRange`] for bad indices, plus any token
    /// error.
    pub fn read(reader: &mut TokenReader<'_>, ctx: &TaskContext) -> Result<Self, ParseError> {
        let tag = reader.next_token("successor generator tag")?;
        match tag {
            "switch" => {
                let var = reader.parse_var(ctx.variable_count())?;
                let immediate = Self::read(reader, ctx)?;
                let by_value = (0..ctx.variable(var).domain_size)
                    .map(|_| Self::read(reader, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                let default = Self::read(reader, ctx)?;
                Ok(Self::Switch(Box::new(SwitchNode {
                    var,
                    immediate,
                    by_value,
                    default,
                })))
            }
            "check" => {
                let count: usize = reader.parse("operator count")?;
                let ops = (0..count)
                    .map(|_| read_operator(reader, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Leaf(ops))
            }
            other => Err(ParseError::UnknownGeneratorTag {
                found: other.into(),
            }),
        }
    }

    /// Operators applicable in `state`, in tree order.
    #[must_use]
    pub fn generate_applicable_ops(&self, ctx: &TaskContext, state: &State) -> Vec<OperatorId> {
        let mut ops = Vec::new();
        self.collect(state, &mut ops);
        ops.retain(|&id| {
            let op = ctx.operator(id);
            let feasible = op.is_numerically_feasible(state.numeric_values());
            if !feasible {
                tracing::trace!(op = %op.name, "operator filtered: decrease below zero");
            }
            feasible
        });
        ops
    }

    fn collect(&self, state: &State, ops: &mut Vec<OperatorId>) {
        match self {
            Self::Leaf(leaf) => ops.extend_from_slice(leaf),
            Self::Switch(node) => {
                node.immediate.collect(state, ops);
                // The numeric sentinel and other out-of-domain values match no case.
                let case = usize::try_from(state.get(node.var))
                    .ok()
                    .and_then(|value| node.by_value.get(value));
                if let Some(subtree) = case {
                    subtree.collect(state, ops);
                }
                node.default.collect(state, ops);
            }
        }
    }

    /// Indented listing of the tree.
    #[must_use]
    pub fn dump(&self, ctx: &TaskContext) -> String {
        let mut out = String::new();
        self.dump_into(ctx, "", &mut out);
        out
    }

    fn dump_into(&self, ctx: &TaskContext, indent: &str, out: &mut String) {
        // Writing to a String cannot fail.
        match self {
            Self::Leaf(leaf) => {
                for &id in leaf {
                    let _ = writeln!(out, "{indent}{}", ctx.operator(id).name);
                }
            }
            Self::Switch(node) => {
                let nested = format!("{indent}  ");
                let _ = writeln!(out, "{indent}switch on {}", ctx.variable(node.var).name);
                let _ = writeln!(out, "{indent}immediately:");
                node.immediate.dump_into(ctx, &nested, out);
                for (value, subtree) in node.by_value.iter().enumerate() {
                    let _ = writeln!(out, "{indent}case {value}:");
                    subtree.dump_into(ctx, &nested, out);
                }
                let _ = writeln!(out, "{indent}always:");
                node.default.dump_into(ctx, &nested, out);
            }
        }
    }
}

fn read_operator(reader: &mut TokenReader<'_>, ctx: &TaskContext) -> Result<OperatorId, ParseError> {
    let raw: i64 = reader.parse("operator index")?;
    usize::try_from(raw)
        .ok()
        .and_then(|index| ctx.operator_id(index))
        .ok_or(ParseError::OperatorOutOfRange {
            op: raw,
            count: ctx.operators().len(),
        })
}
