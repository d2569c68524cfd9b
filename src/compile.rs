use regex::RegexBuilder;
use tracing::trace;

use crate::methods::bind_method;
use crate::resolve::{MemberPath, resolve_path};
use crate::types::{
    CompareOp, CompileError, CompiledExpr, IS_MATCH, LogicalOp, Quantifier, Rule, Type, Value,
};

const NULL_LITERAL: &str = "null";

/// Translate one rule node bound to a value of type `ty`.
///
/// Operators are tried in order: quantifier, logical combinator, comparison,
/// regex match, and finally a method of the resolved member's type.
pub(crate) fn compile(ty: &Type, rule: &Rule) -> Result<CompiledExpr, CompileError> {
    trace!(target_type = %ty, operator = %rule.operator, member = ?rule.path(), "translating rule");

    if rule.operator.is_empty() {
        return Err(malformed(rule, "missing operator"));
    }

    if let Some(quantifier) = Quantifier::from_name(&rule.operator) {
        return compile_quantifier(ty, rule, quantifier);
    }

    if let Some(op) = LogicalOp::from_name(&rule.operator) {
        if rule.rules.is_empty() {
            return Err(malformed(rule, "logical operator without child rules"));
        }
        return compile_all(ty, &rule.rules, op);
    }

    let path = resolve_path(ty, rule.path())?;

    if let Some(op) = CompareOp::from_name(&rule.operator) {
        return compile_compare(path, op, rule);
    }

    if rule.operator == IS_MATCH {
        return compile_match(path, rule);
    }

    let method = bind_method(path.ty(), &rule.operator, &rule.inputs)?;
    Ok(CompiledExpr::Call { path, method })
}

/// Translate `rules` and combine them, in order, into one node for `op`.
///
/// Children using the same operator are spliced in, so chains of composites
/// stay one level deep.
pub(crate) fn compile_all(
    ty: &Type,
    rules: &[Rule],
    op: LogicalOp,
) -> Result<CompiledExpr, CompileError> {
    if rules.is_empty() {
        return Err(CompileError::MalformedRuleTree {
            operator: op.name().to_owned(),
            reason: "no rules to combine",
        });
    }
    let mut operands = Vec::with_capacity(rules.len());
    for rule in rules {
        compile(ty, rule)?.flatten_into(op, &mut operands);
    }
    Ok(CompiledExpr::logical(op, operands))
}

fn compile_quantifier(
    ty: &Type,
    rule: &Rule,
    quantifier: Quantifier,
) -> Result<CompiledExpr, CompileError> {
    if rule.rules.is_empty() {
        return Err(malformed(rule, "quantifier without child rules"));
    }
    let path = resolve_path(ty, rule.path())?;
    let element = path
        .ty()
        .element()
        .ok_or_else(|| CompileError::NotACollection {
            member: path.display_name().to_owned(),
            ty: path.ty().to_string(),
        })?;
    let body = compile_all(&element, &rule.rules, LogicalOp::And)?;
    Ok(CompiledExpr::Quantify {
        path,
        quantifier,
        body: Box::new(body),
    })
}

fn compile_compare(
    path: MemberPath,
    op: CompareOp,
    rule: &Rule,
) -> Result<CompiledExpr, CompileError> {
    if op.is_ordering() && !path.ty().is_ordered() {
        return Err(CompileError::OperatorNotSupported {
            operator: rule.operator.clone(),
            ty: path.ty().to_string(),
        });
    }
    let literal = rule
        .target_value
        .as_deref()
        .ok_or_else(|| malformed(rule, "comparison without a target value"))?;
    let value = coerce(literal, path.ty())?;
    Ok(CompiledExpr::Compare { path, op, value })
}

fn compile_match(path: MemberPath, rule: &Rule) -> Result<CompiledExpr, CompileError> {
    if !matches!(path.ty(), Type::String | Type::Any) {
        return Err(CompileError::OperatorNotSupported {
            operator: rule.operator.clone(),
            ty: path.ty().to_string(),
        });
    }
    let pattern = rule
        .target_value
        .as_deref()
        .ok_or_else(|| malformed(rule, "match without a pattern"))?;
    let pattern = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CompileError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
    Ok(CompiledExpr::Match { path, pattern })
}

/// Convert a textual literal to a value of `ty`.
///
/// `null` in any case is the absent value for every type. Enums accept a
/// variant name or ordinal; other types use their standard parse rules,
/// ignoring surrounding whitespace.
pub(crate) fn coerce(literal: &str, ty: &Type) -> Result<Value<'static>, CompileError> {
    if literal.eq_ignore_ascii_case(NULL_LITERAL) {
        return Ok(Value::Null);
    }
    let unparsable = || CompileError::UnparsableLiteral {
        literal: literal.to_owned(),
        ty: ty.to_string(),
    };
    let text = literal.trim();
    match ty {
        Type::String | Type::Any => Ok(Value::from(literal.to_owned())),
        Type::Bool if text.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Type::Bool if text.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        Type::Bool => Err(unparsable()),
        Type::Int => text.parse().map(Value::Int).map_err(|_| unparsable()),
        Type::Float => text.parse().map(Value::Float).map_err(|_| unparsable()),
        Type::Enum(e) => e
            .ordinal(text)
            .or_else(|| text.parse().ok().filter(|i| *i < e.variants.len()))
            .map(Value::Enum)
            .ok_or_else(unparsable),
        Type::Record(_) | Type::List(_) => Err(unparsable()),
    }
}

fn malformed(rule: &Rule, reason: &'static str) -> CompileError {
    CompileError::MalformedRuleTree {
        operator: rule.operator.clone(),
        reason,
    }
}
