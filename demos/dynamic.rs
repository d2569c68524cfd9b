use std::any::Any;
use std::sync::LazyLock;

use rulecraft::{Record, Rule, Schema, Type, Value, compile_dyn, member, this};

struct Sensor {
    id: String,
    reading: f64,
}

impl Record for Sensor {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<Sensor>("Sensor")
                .member("Id", Type::String, |s| Value::from(s.id.as_str()))
                .member("Reading", Type::Float, |s| Value::Float(s.reading))
                .method("Exceeds", vec![Type::Float], |s, args| {
                    matches!(args, [Value::Float(limit)] if s.reading > *limit)
                })
                .build()
        });
        &SCHEMA
    }
}

fn main() {
    // The target type is picked at runtime, e.g. from configuration.
    let targets: [(Type, Rule); 3] = [
        (
            Type::record::<Sensor>(),
            member("Id")
                .call("StartsWith", [Value::from("temp-")])
                .and_also(this().call("Exceeds", [Value::Int(30)])),
        ),
        (Type::Int, this().gte(100).and(this().lt(200))),
        (Type::String, this().is_match("^ok$").or(this().is_null())),
    ];

    let inputs: Vec<Box<dyn Any>> = vec![
        Box::new(Sensor {
            id: "temp-kitchen".into(),
            reading: 31.5,
        }),
        Box::new(150_i64),
        Box::new("OK".to_owned()),
        Box::new(3.5_f32),
    ];

    for (ty, rule) in &targets {
        let predicate = match compile_dyn(ty, rule) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("cannot compile {rule} for {ty}: {e}");
                continue;
            }
        };
        println!("{predicate}");
        for (i, input) in inputs.iter().enumerate() {
            println!("  input #{i}: {}", predicate.evaluate(input.as_ref()));
        }
    }

    // Rules are checked against the target type up front.
    let err = compile_dyn(&Type::record::<Sensor>(), &member("Humidity").gt(50)).unwrap_err();
    println!("Rejected: {err}");
}
