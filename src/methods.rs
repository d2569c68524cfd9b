use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::types::{CompareOp, CompileError, Invoker, Method, Type, Value};

static STRING_METHODS: LazyLock<Vec<Method>> = LazyLock::new(|| {
    vec![
        Method::builtin("Contains", vec![Type::String], |target, args| {
            string_args(target, args).is_some_and(|(s, arg)| s.contains(arg))
        }),
        Method::builtin("StartsWith", vec![Type::String], |target, args| {
            string_args(target, args).is_some_and(|(s, arg)| s.starts_with(arg))
        }),
        Method::builtin("EndsWith", vec![Type::String], |target, args| {
            string_args(target, args).is_some_and(|(s, arg)| s.ends_with(arg))
        }),
        Method::builtin("Equals", vec![Type::String], |target, args| {
            string_args(target, args).is_some_and(|(s, arg)| s == arg)
        }),
    ]
});

static LIST_METHODS: LazyLock<Vec<Method>> = LazyLock::new(|| {
    vec![Method::builtin("Contains", vec![Type::Any], |target, args| {
        match (target, args) {
            (Value::List(items), [needle]) => items
                .iter()
                .any(|item| item.compare(CompareOp::Eq, needle) == Some(true)),
            _ => false,
        }
    })]
});

static COMMON_METHODS: LazyLock<Vec<Method>> = LazyLock::new(|| {
    vec![Method::builtin("Equals", vec![Type::Any], |target, args| {
        matches!(args, [arg] if target.compare(CompareOp::Eq, arg) == Some(true))
    })]
});

fn string_args<'v>(
    target: &'v Value<'_>,
    args: &'v [Value<'static>],
) -> Option<(&'v str, &'v str)> {
    match (target, args) {
        (Value::String(s), [Value::String(arg)]) => Some((&**s, &**arg)),
        _ => None,
    }
}

/// A method resolved by name and argument types, with its arguments.
pub(crate) struct BoundMethod {
    name: String,
    invoke: Invoker,
    args: Vec<Value<'static>>,
}

impl BoundMethod {
    pub(crate) fn call(&self, target: &Value<'_>) -> bool {
        (self.invoke)(target, &self.args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Conversion {
    Exact,
    Assignable,
}

fn conversion(param: &Type, arg: &Value<'_>) -> Option<Conversion> {
    match (param, arg) {
        (Type::Any, _) => Some(Conversion::Assignable),
        (Type::Bool, Value::Bool(_))
        | (Type::Int, Value::Int(_))
        | (Type::Float, Value::Float(_))
        | (Type::String, Value::String(_))
        | (Type::List(_), Value::List(_)) => Some(Conversion::Exact),
        (Type::Enum(e), Value::Enum(ordinal)) if *ordinal < e.variants.len() => {
            Some(Conversion::Exact)
        }
        (Type::Record(schema), Value::Record(record)) if schema().accepts(*record) => {
            Some(Conversion::Exact)
        }
        (Type::Float, Value::Int(_)) => Some(Conversion::Assignable),
        (ty, Value::Null) if ty.is_nullable() => Some(Conversion::Assignable),
        _ => None,
    }
}

/// Number of arguments needing a non-exact conversion, or `None` if some
/// argument does not fit its parameter at all.
fn rank(params: &[Type], args: &[Value<'static>]) -> Option<usize> {
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| conversion(param, arg))
        .try_fold(0, |rank, c| {
            c.map(|c| rank + usize::from(c == Conversion::Assignable))
        })
}

#[allow(clippy::cast_precision_loss)]
fn convert_args(params: &[Type], args: &[Value<'static>]) -> Vec<Value<'static>> {
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| match (param, arg) {
            (Type::Float, Value::Int(i)) => Value::Float(*i as f64),
            _ => arg.clone(),
        })
        .collect()
}

fn candidates(ty: &Type) -> impl Iterator<Item = &'static Method> {
    let specific: &'static [Method] = match ty {
        Type::String => STRING_METHODS.as_slice(),
        Type::List(_) => LIST_METHODS.as_slice(),
        Type::Record(schema) => schema().methods(),
        _ => &[],
    };
    specific.iter().chain(COMMON_METHODS.iter())
}

/// Find the method `name` on `ty` that best fits `args`.
///
/// Candidates with matching name and arity are ranked by how many arguments
/// need a non-exact conversion (int to float widening, null to a nullable
/// type, anything to `Any`). The lowest rank wins; a tie is ambiguous.
pub(crate) fn bind_method(
    ty: &Type,
    name: &str,
    args: &[Value<'static>],
) -> Result<BoundMethod, CompileError> {
    let mut best: Option<(usize, &Method)> = None;
    let mut tied = 0;

    for method in candidates(ty).filter(|m| m.name == name && m.params.len() == args.len()) {
        let Some(rank) = rank(&method.params, args) else {
            continue;
        };
        match best {
            Some((best_rank, _)) if rank > best_rank => {}
            Some((best_rank, _)) if rank == best_rank => tied += 1,
            _ => {
                best = Some((rank, method));
                tied = 1;
            }
        }
    }

    let signature = || -> Vec<String> {
        args.iter().map(|a| a.type_name().to_owned()).collect()
    };
    match best {
        None => Err(CompileError::MethodNotFound {
            method: name.to_owned(),
            ty: ty.to_string(),
            signature: signature(),
        }),
        Some(_) if tied > 1 => Err(CompileError::AmbiguousMethod {
            method: name.to_owned(),
            ty: ty.to_string(),
            signature: signature(),
            candidates: tied,
        }),
        Some((_, method)) => Ok(BoundMethod {
            name: name.to_owned(),
            invoke: Arc::clone(&method.invoke),
            args: convert_args(&method.params, args),
        }),
    }
}
