mod error;
mod expr;
mod predicate;
mod rule;
mod schema;
mod value;

pub use error::CompileError;
pub(crate) use expr::CompiledExpr;
pub use expr::{CompareOp, IS_MATCH, LogicalOp, Quantifier};
pub use predicate::{DynPredicate, Predicate, compile, compile_dyn};
pub use rule::{MemberRule, Rule, member, this};
pub(crate) use schema::{Accessor, Invoker};
pub use schema::{AsAny, EnumType, Member, Method, Record, Schema, SchemaBuilder, Type};
pub use value::Value;
