use std::sync::LazyLock;

use rulecraft::{Predicate, Record, Schema, Type, Value, member, this};

struct Address {
    city: String,
}

struct User {
    name: String,
    age: i64,
    address: Option<Address>,
    roles: Vec<String>,
}

impl Record for Address {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<Address>("Address")
                .member("City", Type::String, |a| Value::from(a.city.as_str()))
                .build()
        });
        &SCHEMA
    }
}

impl Record for User {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<User>("User")
                .member("Name", Type::String, |u| Value::from(u.name.as_str()))
                .member("Age", Type::Int, |u| Value::Int(u.age))
                .member("Address", Type::record::<Address>(), |u| {
                    u.address.as_ref().map_or(Value::Null, |a| Value::Record(a))
                })
                .member("Roles", Type::list(Type::String), |u| {
                    Value::List(u.roles.iter().map(|r| Value::from(r.as_str())).collect())
                })
                .build()
        });
        &SCHEMA
    }
}

fn main() {
    // Adults in Paris, or anyone holding an admin role
    let rule = member("Age")
        .gte(18)
        .and_also(member("Address.City").eq("Paris"))
        .or_else(member("Roles").any([this().is_match("^admin")]));

    println!("Rule: {rule}");

    let predicate = Predicate::<User>::compile(&rule).expect("failed to compile rule");
    println!("{predicate}");

    let users = [
        User {
            name: "Anna".into(),
            age: 34,
            address: Some(Address {
                city: "Paris".into(),
            }),
            roles: vec![],
        },
        User {
            name: "Bob".into(),
            age: 15,
            address: None,
            roles: vec!["Administrator".into()],
        },
        User {
            name: "Chen".into(),
            age: 41,
            address: None,
            roles: vec!["viewer".into()],
        },
    ];

    for user in &users {
        println!("{:>5}: {}", user.name, predicate.evaluate(user));
    }

    let matched: Vec<_> = predicate.filter(&users).map(|u| u.name.as_str()).collect();
    println!("Matched: {matched:?}");
}
