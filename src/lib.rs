//! Compile declarative [`Rule`] trees into reusable predicates over your own
//! types.
//!
//! A type opts in by implementing [`Record`], which exposes a [`Schema`] of
//! named members and methods. Rules name those members by (dotted) path and
//! are checked against the schema once, when compiled; the resulting
//! [`Predicate`] evaluates without failing and may be shared across threads.

mod compile;
mod evaluate;
mod methods;
mod resolve;
mod types;

#[cfg(test)]
mod test_support;

pub use types::{
    AsAny, CompareOp, CompileError, DynPredicate, EnumType, IS_MATCH, LogicalOp, Member, MemberRule,
    Method, Predicate, Quantifier, Record, Rule, Schema, SchemaBuilder, Type, Value, compile,
    compile_dyn, member, this,
};
