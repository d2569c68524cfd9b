use std::fmt;

use super::expr::{CompareOp, IS_MATCH, LogicalOp, Quantifier};
use super::value::Value;

/// A node of a declarative rule tree.
///
/// A leaf rule reads the value at `member_name` (empty for the bound value
/// itself) and applies `operator` to it: a comparison against
/// `target_value`, a regular expression match, or a method called with
/// `inputs`. A composite rule combines its child `rules` with a logical
/// operator, or quantifies them over the elements of a collection member.
///
/// Rules are plain data; build them by hand, with [`member()`] and the
/// combinators below, or deserialize them (with the `serde` feature).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase", default)
)]
pub struct Rule {
    pub member_name: Option<String>,
    pub operator: String,
    pub target_value: Option<String>,
    pub inputs: Vec<Value<'static>>,
    pub rules: Vec<Rule>,
}

impl Rule {
    /// A rule combining `rules` with a logical operator.
    #[must_use]
    pub fn composite(op: LogicalOp, rules: impl IntoIterator<Item = Rule>) -> Rule {
        Rule {
            operator: op.name().to_owned(),
            rules: rules.into_iter().collect(),
            ..Rule::default()
        }
    }

    #[must_use]
    pub fn and(self, other: Rule) -> Rule {
        Rule::composite(LogicalOp::And, [self, other])
    }

    #[must_use]
    pub fn and_also(self, other: Rule) -> Rule {
        Rule::composite(LogicalOp::AndAlso, [self, other])
    }

    #[must_use]
    pub fn or(self, other: Rule) -> Rule {
        Rule::composite(LogicalOp::Or, [self, other])
    }

    #[must_use]
    pub fn or_else(self, other: Rule) -> Rule {
        Rule::composite(LogicalOp::OrElse, [self, other])
    }

    /// The member path with an empty path treated as absent.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.member_name.as_deref().filter(|p| !p.is_empty())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path().unwrap_or("this");
        if !self.rules.is_empty() {
            if Quantifier::from_name(&self.operator).is_some() {
                write!(f, "{path}.{}(", self.operator)?;
                for (i, rule) in self.rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{rule}")?;
                }
                return write!(f, ")");
            }
            write!(f, "(")?;
            for (i, rule) in self.rules.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", self.operator)?;
                }
                write!(f, "{rule}")?;
            }
            return write!(f, ")");
        }
        match &self.target_value {
            Some(target) if self.inputs.is_empty() => {
                write!(f, "({path} {} {target})", self.operator)
            }
            _ => {
                write!(f, "{path}.{}(", self.operator)?;
                for (i, input) in self.inputs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{input}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Intermediate builder for leaf rules on one member path.
/// Created by [`member()`] or [`this()`].
#[derive(Debug, Clone)]
pub struct MemberRule {
    path: Option<String>,
}

impl MemberRule {
    fn compare(self, op: CompareOp, target: impl ToString) -> Rule {
        Rule {
            member_name: self.path,
            operator: op.name().to_owned(),
            target_value: Some(target.to_string()),
            ..Rule::default()
        }
    }

    #[must_use]
    pub fn eq(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Eq, target)
    }

    #[must_use]
    pub fn neq(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Neq, target)
    }

    #[must_use]
    pub fn gt(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Gt, target)
    }

    #[must_use]
    pub fn gte(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Gte, target)
    }

    #[must_use]
    pub fn lt(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Lt, target)
    }

    #[must_use]
    pub fn lte(self, target: impl ToString) -> Rule {
        self.compare(CompareOp::Lte, target)
    }

    /// Equality with the `null` literal.
    #[must_use]
    pub fn is_null(self) -> Rule {
        self.eq("null")
    }

    /// Case-insensitive regular expression match.
    #[must_use]
    pub fn is_match(self, pattern: &str) -> Rule {
        Rule {
            member_name: self.path,
            operator: IS_MATCH.to_owned(),
            target_value: Some(pattern.to_owned()),
            ..Rule::default()
        }
    }

    /// Call a boolean method of the member's type with the given inputs.
    #[must_use]
    pub fn call(self, method: &str, inputs: impl IntoIterator<Item = Value<'static>>) -> Rule {
        Rule {
            member_name: self.path,
            operator: method.to_owned(),
            inputs: inputs.into_iter().collect(),
            ..Rule::default()
        }
    }

    /// True when at least one element satisfies all of `rules`.
    #[must_use]
    pub fn any(self, rules: impl IntoIterator<Item = Rule>) -> Rule {
        self.quantify(Quantifier::Any, rules)
    }

    /// True when every element satisfies all of `rules`.
    #[must_use]
    pub fn all(self, rules: impl IntoIterator<Item = Rule>) -> Rule {
        self.quantify(Quantifier::All, rules)
    }

    fn quantify(self, quantifier: Quantifier, rules: impl IntoIterator<Item = Rule>) -> Rule {
        Rule {
            member_name: self.path,
            operator: quantifier.name().to_owned(),
            rules: rules.into_iter().collect(),
            ..Rule::default()
        }
    }
}

/// Start a leaf rule on a (possibly dotted) member path.
#[must_use]
pub fn member(path: &str) -> MemberRule {
    MemberRule {
        path: Some(path.to_owned()),
    }
}

/// Start a leaf rule on the bound value itself.
#[must_use]
pub fn this() -> MemberRule {
    MemberRule { path: None }
}
