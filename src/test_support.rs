//! Records shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use crate::{EnumType, Record, Schema, Type, Value};

pub(crate) static STATUS: EnumType = EnumType::new("Status", &["Active", "Suspended", "Closed"]);

pub(crate) struct Address {
    pub city: Option<String>,
    pub zip: i64,
}

pub(crate) struct Person {
    pub name: Option<String>,
    pub age: i64,
    pub score: f64,
    pub active: bool,
    pub status: usize,
    pub tags: Vec<String>,
    pub address: Option<Address>,
    pub friends: Vec<Person>,
    pub probes: AtomicUsize,
}

impl Person {
    pub(crate) fn new(name: &str, age: i64) -> Self {
        Self {
            name: Some(name.to_owned()),
            age,
            score: 0.0,
            active: true,
            status: 0,
            tags: Vec::new(),
            address: None,
            friends: Vec::new(),
            probes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    pub(crate) fn with_city(mut self, city: Option<&str>) -> Self {
        self.address = Some(Address {
            city: city.map(str::to_owned),
            zip: 1000,
        });
        self
    }

    pub(crate) fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl Record for Address {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<Address>("Address")
                .member("City", Type::String, |a| Value::from(a.city.as_deref()))
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
                .member("Name", Type::String, |p| Value::from(p.name.as_deref()))
                .member("Age", Type::Int, |p| Value::Int(p.age))
                .member("Score", Type::Float, |p| Value::Float(p.score))
                .member("Active", Type::Bool, |p| Value::Bool(p.active))
                .member("Status", Type::Enum(&STATUS), |p| Value::Enum(p.status))
                .member("Tags", Type::list(Type::String), |p| {
                    Value::List(p.tags.iter().map(|t| Value::from(t.as_str())).collect())
                })
                .member("Address", Type::record::<Address>(), |p| {
                    p.address.as_ref().map_or(Value::Null, |a| Value::Record(a))
                })
                .member("Friends", Type::list(Type::record::<Person>()), |p| {
                    Value::List(p.friends.iter().map(|f| Value::Record(f)).collect())
                })
                // Records each call so tests can observe short-circuiting.
                .method("Probe", vec![Type::Bool], |p, args| {
                    p.probes.fetch_add(1, Ordering::SeqCst);
                    matches!(args, [Value::Bool(true)])
                })
                .build()
        });
        &SCHEMA
    }
}
