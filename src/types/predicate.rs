use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use super::error::CompileError;
use super::expr::{CompiledExpr, LogicalOp};
use super::rule::Rule;
use super::schema::{Record, Type};
use super::value::Value;

/// A compiled, reusable predicate over instances of `T`.
///
/// Member paths, methods, literals and patterns are resolved once at
/// compile time; evaluating never fails. The predicate keeps no reference
/// to the rules it was compiled from and is `Send + Sync`, so one instance
/// can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// # use std::sync::LazyLock;
/// # use rulecraft::{Record, Schema, Type, Value};
/// # struct Person { age: i64 }
/// # impl Record for Person {
/// #     fn schema() -> &'static Schema {
/// #         static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
/// #             Schema::builder::<Person>("Person")
/// #                 .member("Age", Type::Int, |p| Value::Int(p.age))
/// #                 .build()
/// #         });
/// #         &SCHEMA
/// #     }
/// # }
/// use rulecraft::{member, Predicate};
///
/// let adult = Predicate::<Person>::compile(&member("Age").gt(18)).unwrap();
/// assert!(adult.evaluate(&Person { age: 20 }));
/// assert!(!adult.evaluate(&Person { age: 15 }));
/// ```
pub struct Predicate<T> {
    expr: CompiledExpr,
    _target: PhantomData<fn(&T)>,
}

impl<T: Record> Predicate<T> {
    /// Compile a rule tree against `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the rule names an unknown member or
    /// method, carries a literal that does not fit the member's type, or is
    /// otherwise malformed.
    pub fn compile(rule: &Rule) -> Result<Self, CompileError> {
        let expr = build(&Type::record::<T>(), rule)?;
        Ok(Self::new(expr))
    }

    /// Compile a sequence of rules that must all hold.
    ///
    /// Rules are combined with the eager `And`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule fails to compile or `rules` is
    /// empty.
    pub fn compile_all(rules: &[Rule]) -> Result<Self, CompileError> {
        let expr = build_all(&Type::record::<T>(), rules)?;
        Ok(Self::new(expr))
    }

    fn new(expr: CompiledExpr) -> Self {
        Self {
            expr,
            _target: PhantomData,
        }
    }

    #[must_use]
    pub fn evaluate(&self, target: &T) -> bool {
        crate::evaluate::evaluate(&self.expr, &Value::Record(target))
    }

    /// Lazily keep the items that satisfy the predicate.
    pub fn filter<'a, I>(&'a self, items: I) -> impl Iterator<Item = &'a T> + 'a
    where
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: 'a,
    {
        items.into_iter().filter(move |item| self.evaluate(item))
    }

    /// Number of nodes in the compiled expression tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.expr.node_count()
    }
}

impl<T: Record> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predicate<{}>({} nodes)",
            T::schema().name(),
            self.expr.node_count()
        )
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("expr", &format_args!("{}", self.expr))
            .finish()
    }
}

/// A predicate whose target type is only known at runtime.
///
/// Inputs are passed as `&dyn Any` and narrowed to the target type before
/// any member is read. An input of some other type is treated as an absent
/// value.
pub struct DynPredicate {
    target: Type,
    expr: CompiledExpr,
}

impl DynPredicate {
    /// Compile a rule tree against `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on the same conditions as
    /// [`Predicate::compile()`].
    pub fn compile(target: &Type, rule: &Rule) -> Result<Self, CompileError> {
        Ok(Self {
            expr: build(target, rule)?,
            target: target.clone(),
        })
    }

    /// Compile a sequence of rules that must all hold.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if any rule fails to compile or `rules` is
    /// empty.
    pub fn compile_all(target: &Type, rules: &[Rule]) -> Result<Self, CompileError> {
        Ok(Self {
            expr: build_all(target, rules)?,
            target: target.clone(),
        })
    }

    #[must_use]
    pub fn evaluate(&self, input: &dyn Any) -> bool {
        let input = self.target.narrow(input);
        crate::evaluate::evaluate(&self.expr, &input)
    }

    #[must_use]
    pub fn target(&self) -> &Type {
        &self.target
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.expr.node_count()
    }
}

impl fmt::Display for DynPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DynPredicate<{}>({} nodes)",
            self.target,
            self.expr.node_count()
        )
    }
}

impl fmt::Debug for DynPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynPredicate")
            .field("target", &self.target)
            .field("expr", &format_args!("{}", self.expr))
            .finish()
    }
}

fn build(target: &Type, rule: &Rule) -> Result<CompiledExpr, CompileError> {
    let expr = crate::compile::compile(target, rule)?;
    debug!(target_type = %target, nodes = expr.node_count(), "compiled predicate");
    Ok(expr)
}

fn build_all(target: &Type, rules: &[Rule]) -> Result<CompiledExpr, CompileError> {
    let expr = crate::compile::compile_all(target, rules, LogicalOp::And)?;
    debug!(
        target_type = %target,
        rules = rules.len(),
        nodes = expr.node_count(),
        "compiled predicate"
    );
    Ok(expr)
}

/// Compile `rule` against `T`. Shorthand for [`Predicate::compile()`].
///
/// # Errors
///
/// See [`Predicate::compile()`].
pub fn compile<T: Record>(rule: &Rule) -> Result<Predicate<T>, CompileError> {
    Predicate::compile(rule)
}

/// Compile `rule` against a runtime type. Shorthand for
/// [`DynPredicate::compile()`].
///
/// # Errors
///
/// See [`Predicate::compile()`].
pub fn compile_dyn(target: &Type, rule: &Rule) -> Result<DynPredicate, CompileError> {
    DynPredicate::compile(target, rule)
}
