use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::value::Value;

pub(crate) type Accessor = Arc<dyn for<'a> Fn(&'a dyn Record) -> Value<'a> + Send + Sync>;
pub(crate) type Invoker = Arc<dyn for<'a> Fn(&Value<'a>, &[Value<'static>]) -> bool + Send + Sync>;

/// Object-safe access to [`Any`] for record trait objects.
///
/// Implemented for every `'static` type; there is no need to implement it by hand.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type that rules can be compiled against.
///
/// The [`Schema`] is the table of members and methods a rule may name. It is
/// built once per type and shared by every compiled predicate, usually held in
/// a `static` [`LazyLock`](std::sync::LazyLock):
///
/// ```
/// use std::sync::LazyLock;
/// use rulecraft::{Record, Schema, Type, Value};
///
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// impl Record for Person {
///     fn schema() -> &'static Schema {
///         static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
///             Schema::builder::<Person>("Person")
///                 .member("Name", Type::String, |p| Value::from(p.name.as_str()))
///                 .member("Age", Type::Int, |p| Value::Int(p.age))
///                 .build()
///         });
///         &SCHEMA
///     }
/// }
/// ```
pub trait Record: AsAny + Send + Sync + 'static {
    fn schema() -> &'static Schema
    where
        Self: Sized;
}

/// An enumeration type: a named, ordered list of variant names.
///
/// Runtime enum values are [`Value::Enum`] ordinals into `variants`.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumType {
    #[must_use]
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    /// Look up a variant by exact name.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| *v == name)
    }
}

/// Declared type of a member, a method parameter, or a compilation target.
#[derive(Clone)]
pub enum Type {
    Bool,
    Int,
    Float,
    String,
    Enum(&'static EnumType),
    /// A nested record. Held as a function so that schemas may refer to
    /// each other (or themselves) without initialisation order issues.
    Record(fn() -> &'static Schema),
    List(Box<Type>),
    /// Statically unknown; values are compared dynamically.
    Any,
}

impl Type {
    #[must_use]
    pub fn record<T: Record>() -> Self {
        Type::Record(T::schema)
    }

    #[must_use]
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    /// Element type used when quantifying over a value of this type.
    /// `Any` quantifies over elements of unknown type.
    pub(crate) fn element(&self) -> Option<Type> {
        match self {
            Type::List(element) => Some((**element).clone()),
            Type::Any => Some(Type::Any),
            _ => None,
        }
    }

    /// Whether the type can hold an absent value.
    pub(crate) fn is_nullable(&self) -> bool {
        matches!(
            self,
            Type::String | Type::Record(_) | Type::List(_) | Type::Any
        )
    }

    /// Whether `<`, `<=`, `>` and `>=` are defined for the type.
    pub(crate) fn is_ordered(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::String | Type::Enum(_) | Type::Any
        )
    }

    /// Narrow an untyped input to a value of this type. Inputs of any other
    /// Rust type become [`Value::Null`]. `Any` accepts the primitive types.
    pub(crate) fn narrow<'a>(&self, input: &'a dyn Any) -> Value<'a> {
        let narrowed = match self {
            Type::Record(schema) => schema().narrow(input).map(Value::Record),
            Type::Bool => input.downcast_ref::<bool>().map(|b| Value::Bool(*b)),
            Type::Int => input
                .downcast_ref::<i64>()
                .copied()
                .or_else(|| input.downcast_ref::<i32>().map(|i| i64::from(*i)))
                .map(Value::Int),
            Type::Float => input
                .downcast_ref::<f64>()
                .copied()
                .or_else(|| input.downcast_ref::<f32>().map(|f| f64::from(*f)))
                .map(Value::Float),
            Type::String => input
                .downcast_ref::<String>()
                .map(|s| Value::from(s.as_str()))
                .or_else(|| input.downcast_ref::<&'static str>().map(|s| Value::from(*s))),
            Type::Any => [Type::Bool, Type::Int, Type::Float, Type::String]
                .iter()
                .map(|ty| ty.narrow(input))
                .find(|v| !v.is_null()),
            Type::Enum(_) | Type::List(_) => None,
        };
        narrowed.unwrap_or(Value::Null)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Bool, Type::Bool)
            | (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::String, Type::String)
            | (Type::Any, Type::Any) => true,
            (Type::Enum(a), Type::Enum(b)) => std::ptr::eq(*a, *b),
            (Type::Record(a), Type::Record(b)) => std::ptr::eq(a(), b()),
            (Type::List(a), Type::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::String => write!(f, "String"),
            Type::Enum(e) => write!(f, "{}", e.name),
            Type::Record(schema) => write!(f, "{}", schema().name()),
            Type::List(element) => write!(f, "List<{element}>"),
            Type::Any => write!(f, "Any"),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A named member with a typed accessor.
pub struct Member {
    name: String,
    ty: Type,
    pub(crate) get: Accessor,
}

impl Member {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

/// A named boolean method with a fixed parameter list.
pub struct Method {
    pub(crate) name: String,
    pub(crate) params: Vec<Type>,
    pub(crate) invoke: Invoker,
}

impl Method {
    /// A method operating directly on values, used for the built-in tables.
    pub(crate) fn builtin<F>(name: &str, params: Vec<Type>, invoke: F) -> Self
    where
        F: for<'a> Fn(&Value<'a>, &[Value<'static>]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.to_owned(),
            params,
            invoke: Arc::new(invoke),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[Type] {
        &self.params
    }
}

/// Member and method table for one [`Record`] type.
pub struct Schema {
    name: String,
    members: Vec<Member>,
    methods: Vec<Method>,
    narrow: fn(&dyn Any) -> Option<&dyn Record>,
}

impl Schema {
    #[must_use]
    pub fn builder<T: Record>(name: &str) -> SchemaBuilder<T> {
        SchemaBuilder {
            name: name.to_owned(),
            members: Vec::new(),
            methods: Vec::new(),
            _target: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a member by exact name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub(crate) fn narrow<'a>(&self, input: &'a dyn Any) -> Option<&'a dyn Record> {
        (self.narrow)(input)
    }

    /// Whether `record` is an instance of this schema's type.
    pub(crate) fn accepts(&self, record: &dyn Record) -> bool {
        (self.narrow)(record.as_any()).is_some()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "members",
                &self
                    .members
                    .iter()
                    .map(|m| (m.name.as_str(), &m.ty))
                    .collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|m| (m.name.as_str(), &m.params))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for a [`Schema`]. Obtained from [`Schema::builder()`].
#[must_use]
pub struct SchemaBuilder<T> {
    name: String,
    members: Vec<Member>,
    methods: Vec<Method>,
    _target: PhantomData<fn(&T)>,
}

impl<T: Record> SchemaBuilder<T> {
    /// Register a member readable by rules under `name`.
    ///
    /// `ty` is the declared type the accessor's values conform to; rule
    /// literals are coerced to it at compile time.
    pub fn member<F>(mut self, name: &str, ty: Type, get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        let get = accessor(move |record| match record.as_any().downcast_ref::<T>() {
            Some(target) => get(target),
            None => Value::Null,
        });
        self.members.push(Member {
            name: name.to_owned(),
            ty,
            get,
        });
        self
    }

    /// Register a boolean method callable from a rule's operator.
    ///
    /// Arguments are the rule's inputs, already checked against `params`.
    pub fn method<F>(mut self, name: &str, params: Vec<Type>, call: F) -> Self
    where
        F: Fn(&T, &[Value<'static>]) -> bool + Send + Sync + 'static,
    {
        self.methods.push(Method::builtin(name, params, move |target, args| {
            match *target {
                Value::Record(record) => record
                    .as_any()
                    .downcast_ref::<T>()
                    .is_some_and(|t| call(t, args)),
                _ => false,
            }
        }));
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            members: self.members,
            methods: self.methods,
            narrow: narrow_to::<T>,
        }
    }
}

fn accessor<F>(get: F) -> Accessor
where
    F: for<'a> Fn(&'a dyn Record) -> Value<'a> + Send + Sync + 'static,
{
    Arc::new(get)
}

fn narrow_to<T: Record>(input: &dyn Any) -> Option<&dyn Record> {
    input.downcast_ref::<T>().map(|t| t as &dyn Record)
}
