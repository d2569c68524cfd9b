use std::fmt;
use std::sync::Arc;

use crate::types::{Accessor, CompileError, Type, Value};

/// A member path resolved against a declared type: one accessor per segment,
/// plus the zero value returned when a link is absent at runtime.
pub(crate) struct MemberPath {
    path: Option<String>,
    steps: Vec<Accessor>,
    ty: Type,
    default: Value<'static>,
}

/// Resolve a dot-separated member path starting from `root`.
///
/// An absent or empty path is the identity. Every segment must name a member
/// of the previous segment's declared type.
pub(crate) fn resolve_path(root: &Type, path: Option<&str>) -> Result<MemberPath, CompileError> {
    let mut ty = root.clone();
    let mut steps = Vec::new();

    if let Some(path) = path {
        for segment in path.split('.') {
            let Type::Record(schema) = &ty else {
                return Err(CompileError::MemberNotFound {
                    member: segment.to_owned(),
                    ty: ty.to_string(),
                });
            };
            let schema = schema();
            let member = schema
                .member(segment)
                .ok_or_else(|| CompileError::MemberNotFound {
                    member: segment.to_owned(),
                    ty: schema.name().to_owned(),
                })?;
            steps.push(Arc::clone(&member.get));
            ty = member.ty().clone();
        }
    }

    Ok(MemberPath {
        path: path.map(str::to_owned),
        steps,
        default: Value::default_for(&ty),
        ty,
    })
}

impl MemberPath {
    /// Declared type of the value at the end of the path.
    pub(crate) fn ty(&self) -> &Type {
        &self.ty
    }

    pub(crate) fn display_name(&self) -> &str {
        self.path.as_deref().unwrap_or("this")
    }

    /// Read the value at the end of the path. If any link before the last is
    /// absent the declared type's zero value is returned instead.
    pub(crate) fn read<'a>(&self, input: &Value<'a>) -> Value<'a> {
        let Some((first, rest)) = self.steps.split_first() else {
            return input.clone();
        };
        let Value::Record(record) = *input else {
            return self.default.clone();
        };
        let mut current = first(record);
        for step in rest {
            current = match current {
                Value::Record(record) => step(record),
                _ => return self.default.clone(),
            };
        }
        current
    }
}

impl fmt::Debug for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberPath")
            .field("path", &self.display_name())
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::{Record, Schema};

    struct City {
        name: String,
    }

    struct Address {
        city: Option<City>,
        zip: i64,
    }

    struct Person {
        address: Option<Address>,
        active: bool,
    }

    impl Record for City {
        fn schema() -> &'static Schema {
            static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
                Schema::builder::<City>("City")
                    .member("Name", Type::String, |c| Value::from(c.name.as_str()))
                    .build()
            });
            &SCHEMA
        }
    }

    impl Record for Address {
        fn schema() -> &'static Schema {
            static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
                Schema::builder::<Address>("Address")
                    .member("City", Type::record::<City>(), |a| {
                        a.city.as_ref().map_or(Value::Null, |c| Value::Record(c))
                    })
                    .member("Zip", Type::Int, |a| Value::Int(a.zip))
                    .build()
            });
            &SCHEMA
        }
    }

    impl Record for Person {
        fn schema() -> &'static Schema {
            static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
                Schema::builder::<Person>("Person")
                    .member("Address", Type::record::<Address>(), |p| {
                        p.address.as_ref().map_or(Value::Null, |a| Value::Record(a))
                    })
                    .member("Active", Type::Bool, |p| Value::Bool(p.active))
                    .build()
            });
            &SCHEMA
        }
    }

    fn person(address: Option<Address>) -> Person {
        Person {
            address,
            active: true,
        }
    }

    #[test]
    fn empty_path_is_identity() {
        let path = resolve_path(&Type::Int, None).unwrap();
        assert_eq!(path.read(&Value::Int(3)), Value::Int(3));
        assert_eq!(path.ty(), &Type::Int);
    }

    #[test]
    fn single_segment() {
        let path = resolve_path(&Type::record::<Person>(), Some("Active")).unwrap();
        let p = person(None);
        assert_eq!(path.read(&Value::Record(&p)), Value::Bool(true));
    }

    #[test]
    fn nested_segments() {
        let path = resolve_path(&Type::record::<Person>(), Some("Address.City.Name")).unwrap();
        assert_eq!(path.ty(), &Type::String);
        let p = person(Some(Address {
            city: Some(City {
                name: "Paris".into(),
            }),
            zip: 75000,
        }));
        assert_eq!(path.read(&Value::Record(&p)), Value::from("Paris"));
    }

    #[test]
    fn absent_link_yields_type_default() {
        let zip = resolve_path(&Type::record::<Person>(), Some("Address.Zip")).unwrap();
        let name = resolve_path(&Type::record::<Person>(), Some("Address.City.Name")).unwrap();
        let p = person(None);
        assert_eq!(zip.read(&Value::Record(&p)), Value::Int(0));
        assert_eq!(name.read(&Value::Record(&p)), Value::Null);

        let q = person(Some(Address {
            city: None,
            zip: 1,
        }));
        assert_eq!(name.read(&Value::Record(&q)), Value::Null);
    }

    #[test]
    fn absent_root_yields_type_default() {
        let path = resolve_path(&Type::record::<Person>(), Some("Active")).unwrap();
        assert_eq!(path.read(&Value::Null), Value::Bool(false));
    }

    #[test]
    fn unknown_member_is_an_error() {
        let err = resolve_path(&Type::record::<Person>(), Some("Address.Street")).unwrap_err();
        match err {
            CompileError::MemberNotFound { member, ty } => {
                assert_eq!(member, "Street");
                assert_eq!(ty, "Address");
            }
            other => panic!("expected MemberNotFound, got {other:?}"),
        }
    }

    #[test]
    fn member_of_primitive_is_an_error() {
        let err = resolve_path(&Type::record::<Person>(), Some("Active.Value")).unwrap_err();
        assert!(matches!(err, CompileError::MemberNotFound { ty, .. } if ty == "Bool"));
    }
}
