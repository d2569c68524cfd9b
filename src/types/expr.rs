use std::fmt;

use regex::Regex;

use super::Value;
use crate::methods::BoundMethod;
use crate::resolve::MemberPath;

/// Operator name for case-insensitive regular expression matching.
pub const IS_MATCH: &str = "IsMatch";

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Neq,
        CompareOp::Gt,
        CompareOp::Gte,
        CompareOp::Lt,
        CompareOp::Lte,
    ];

    /// The operator name used in a rule's `operator` field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "Equal",
            CompareOp::Neq => "NotEqual",
            CompareOp::Gt => "GreaterThan",
            CompareOp::Gte => "GreaterThanOrEqual",
            CompareOp::Lt => "LessThan",
            CompareOp::Lte => "LessThanOrEqual",
        }
    }

    /// Exact (case-sensitive) lookup by operator name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether the operator needs an ordering rather than just equality.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

/// Logical combinators folding the children of a composite rule.
///
/// `And`/`Or` evaluate every child; `AndAlso`/`OrElse` stop as soon as the
/// result is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    AndAlso,
    Or,
    OrElse,
}

impl LogicalOp {
    pub const ALL: [LogicalOp; 4] = [
        LogicalOp::And,
        LogicalOp::AndAlso,
        LogicalOp::Or,
        LogicalOp::OrElse,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LogicalOp::And => "And",
            LogicalOp::AndAlso => "AndAlso",
            LogicalOp::Or => "Or",
            LogicalOp::OrElse => "OrElse",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Collection quantifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Quantifier::Any => "Any",
            Quantifier::All => "All",
        }
    }

    /// Case-insensitive lookup by operator name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Quantifier::Any, Quantifier::All]
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(name))
    }
}

/// Compiled expression with all member paths, methods, literals and patterns
/// resolved against the target type.
#[derive(Debug)]
pub(crate) enum CompiledExpr {
    Compare {
        path: MemberPath,
        op: CompareOp,
        value: Value<'static>,
    },
    Match {
        path: MemberPath,
        pattern: Regex,
    },
    Call {
        path: MemberPath,
        method: BoundMethod,
    },
    Quantify {
        path: MemberPath,
        quantifier: Quantifier,
        body: Box<CompiledExpr>,
    },
    And(Vec<CompiledExpr>),
    AndAlso(Vec<CompiledExpr>),
    Or(Vec<CompiledExpr>),
    OrElse(Vec<CompiledExpr>),
}

impl CompiledExpr {
    /// Combine `operands` with `op` into one flat node.
    ///
    /// A single operand is returned as is.
    pub(crate) fn logical(op: LogicalOp, mut operands: Vec<CompiledExpr>) -> CompiledExpr {
        if operands.len() == 1 {
            if let Some(only) = operands.pop() {
                return only;
            }
        }
        match op {
            LogicalOp::And => CompiledExpr::And(operands),
            LogicalOp::AndAlso => CompiledExpr::AndAlso(operands),
            LogicalOp::Or => CompiledExpr::Or(operands),
            LogicalOp::OrElse => CompiledExpr::OrElse(operands),
        }
    }

    /// Append `self` to `out` as an operand of `op`, splicing in the operands
    /// of a nested node with the same operator.
    pub(crate) fn flatten_into(self, op: LogicalOp, out: &mut Vec<CompiledExpr>) {
        match (op, self) {
            (LogicalOp::And, CompiledExpr::And(inner))
            | (LogicalOp::AndAlso, CompiledExpr::AndAlso(inner))
            | (LogicalOp::Or, CompiledExpr::Or(inner))
            | (LogicalOp::OrElse, CompiledExpr::OrElse(inner)) => out.extend(inner),
            (_, expr) => out.push(expr),
        }
    }

    /// Number of nodes in the tree.
    pub(crate) fn node_count(&self) -> usize {
        match self {
            CompiledExpr::Compare { .. }
            | CompiledExpr::Match { .. }
            | CompiledExpr::Call { .. } => 1,
            CompiledExpr::Quantify { body, .. } => 1 + body.node_count(),
            CompiledExpr::And(operands)
            | CompiledExpr::AndAlso(operands)
            | CompiledExpr::Or(operands)
            | CompiledExpr::OrElse(operands) => {
                1 + operands.iter().map(CompiledExpr::node_count).sum::<usize>()
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledExpr::Compare { path, op, value } => write!(f, "({path} {op} {value})"),
            CompiledExpr::Match { path, pattern } => write!(f, "({path} =~ /{pattern}/i)"),
            CompiledExpr::Call { path, method } => write!(f, "{path}.{method}"),
            CompiledExpr::Quantify {
                path,
                quantifier,
                body,
            } => write!(f, "{path}.{}({body})", quantifier.name()),
            CompiledExpr::And(operands) => write_joined(f, operands, "&"),
            CompiledExpr::AndAlso(operands) => write_joined(f, operands, "&&"),
            CompiledExpr::Or(operands) => write_joined(f, operands, "|"),
            CompiledExpr::OrElse(operands) => write_joined(f, operands, "||"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[CompiledExpr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{operand}")?;
    }
    write!(f, ")")
}
