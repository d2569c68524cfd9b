use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use super::expr::CompareOp;
use super::schema::{Record, Type};

/// A value read from a target instance, a coerced rule literal, or a method
/// argument.
///
/// Values borrow from the instance they were read from; literals and inputs
/// stored in a [`Rule`](crate::Rule) are `Value<'static>`.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value<'a> {
    /// An absent value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(Cow<'a, str>),
    /// Ordinal of a variant of an [`EnumType`](super::EnumType).
    Enum(usize),
    /// A sequence of values.
    List(Vec<Value<'a>>),
    /// A nested record, compared by identity.
    #[cfg_attr(feature = "serde", serde(skip))]
    Record(&'a dyn Record),
}

impl<'a> Value<'a> {
    /// The zero value of a declared type: what a member path yields when a
    /// link in it is absent.
    #[must_use]
    pub fn default_for(ty: &Type) -> Value<'static> {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            Type::Float => Value::Float(0.0),
            Type::Enum(_) => Value::Enum(0),
            Type::String | Type::Record(_) | Type::List(_) | Type::Any => Value::Null,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Name of the value's runtime kind, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Enum(_) => "Enum",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
        }
    }

    /// Compare this value to another using the given operator.
    /// Returns `None` for incompatible types or unsupported operations (e.g. Gt on lists).
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value<'_>) -> Option<bool> {
        Some(match op {
            CompareOp::Eq => return self.equals(other),
            CompareOp::Neq => return self.equals(other).map(|eq| !eq),
            CompareOp::Gt => self.partial_cmp_value(other)? == Ordering::Greater,
            CompareOp::Gte => self.partial_cmp_value(other)? != Ordering::Less,
            CompareOp::Lt => self.partial_cmp_value(other)? == Ordering::Less,
            CompareOp::Lte => self.partial_cmp_value(other)? != Ordering::Greater,
        })
    }

    fn equals(&self, other: &Value<'_>) -> Option<bool> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(true),
            (Value::Null, _) | (_, Value::Null) => Some(false),
            (Value::Record(a), Value::Record(b)) => Some(std::ptr::addr_eq(*a, *b)),
            (Value::List(a), Value::List(b)) => Some(
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x.equals(y) == Some(true)),
            ),
            _ => self
                .partial_cmp_value(other)
                .map(|ord| ord == Ordering::Equal),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp_value(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => false,
            (Value::List(a), Value::List(b)) => a == b,
            _ => self.equals(other) == Some(true),
        }
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(Cow::Borrowed(v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::String(Cow::Owned(v))
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Enum(v) => write!(f, "#{v}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(_) => write!(f, "<record>"),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::String(v) => f.debug_tuple("String").field(v).finish(),
            Value::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Record(r) => write!(f, "Record({:p})", *r as *const dyn Record),
        }
    }
}
