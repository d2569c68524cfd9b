use crate::types::{CompiledExpr, Quantifier, Value};

/// Evaluate a compiled expression against an input value.
///
/// Evaluation is total: absent members, type mismatches and a method called
/// on an absent value all produce `false` rather than an error.
pub(crate) fn evaluate(expr: &CompiledExpr, input: &Value<'_>) -> bool {
    match expr {
        CompiledExpr::Compare { path, op, value } => path
            .read(input)
            .compare(*op, value)
            .unwrap_or(false),
        CompiledExpr::Match { path, pattern } => path
            .read(input)
            .as_str()
            .is_some_and(|s| pattern.is_match(s)),
        CompiledExpr::Call { path, method } => {
            let target = path.read(input);
            !target.is_null() && method.call(&target)
        }
        CompiledExpr::Quantify {
            path,
            quantifier,
            body,
        } => match path.read(input) {
            Value::List(items) => match quantifier {
                Quantifier::Any => items.iter().any(|item| evaluate(body, item)),
                Quantifier::All => items.iter().all(|item| evaluate(body, item)),
            },
            _ => false,
        },
        CompiledExpr::And(operands) => operands
            .iter()
            .fold(true, |acc, operand| acc & evaluate(operand, input)),
        CompiledExpr::AndAlso(operands) => operands.iter().all(|operand| evaluate(operand, input)),
        CompiledExpr::Or(operands) => operands
            .iter()
            .fold(false, |acc, operand| acc | evaluate(operand, input)),
        CompiledExpr::OrElse(operands) => operands.iter().any(|operand| evaluate(operand, input)),
    }
}
