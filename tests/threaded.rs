use std::sync::{Arc, LazyLock};
use std::thread;

use rulecraft::{DynPredicate, Predicate, Record, Schema, Type, Value, compile_dyn, member, this};

struct Shipment {
    weight: f64,
    destination: String,
    labels: Vec<String>,
}

impl Record for Shipment {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<Shipment>("Shipment")
                .member("Weight", Type::Float, |s| Value::Float(s.weight))
                .member("Destination", Type::String, |s| {
                    Value::from(s.destination.as_str())
                })
                .member("Labels", Type::list(Type::String), |s| {
                    Value::List(s.labels.iter().map(|l| Value::from(l.as_str())).collect())
                })
                .build()
        });
        &SCHEMA
    }
}

fn shipment(weight: f64, destination: &str, labels: &[&str]) -> Shipment {
    Shipment {
        weight,
        destination: destination.to_owned(),
        labels: labels.iter().map(|l| (*l).to_owned()).collect(),
    }
}

fn heavy_or_fragile_to_europe() -> Predicate<Shipment> {
    Predicate::compile(
        &member("Destination")
            .is_match("^(fr|de|no)-")
            .and_also(
                member("Weight")
                    .gt(20)
                    .or_else(member("Labels").any([this().eq("fragile")])),
            ),
    )
    .unwrap()
}

#[test]
fn evaluate_across_threads() {
    let pred = Arc::new(heavy_or_fragile_to_europe());

    let cases = vec![
        (shipment(25.0, "FR-75001", &[]), true),
        (shipment(2.0, "de-10115", &["fragile"]), true),
        (shipment(2.0, "no-0150", &["bulk"]), false),
        (shipment(50.0, "us-10001", &["fragile"]), false),
    ];

    let handles: Vec<_> = cases
        .into_iter()
        .map(|(s, expected)| {
            let pred = Arc::clone(&pred);
            thread::spawn(move || (pred.evaluate(&s), expected))
        })
        .collect();

    for handle in handles {
        let (actual, expected) = handle.join().unwrap();
        assert_eq!(actual, expected);
    }
}

#[test]
fn many_threads_same_input() {
    let pred = Arc::new(heavy_or_fragile_to_europe());
    let input = Arc::new(shipment(2.0, "fr-13001", &["fragile", "express"]));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let pred = Arc::clone(&pred);
            let input = Arc::clone(&input);
            thread::spawn(move || {
                (0..1_000).all(|_| pred.evaluate(&input))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn compile_concurrently() {
    let handles: Vec<_> = (0..16_i64)
        .map(|limit| {
            thread::spawn(move || {
                let pred = Predicate::<Shipment>::compile(&member("Weight").gte(limit)).unwrap();
                pred.evaluate(&shipment(8.0, "fr-1", &[]))
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected: Vec<bool> = (0..16).map(|limit| limit <= 8).collect();
    assert_eq!(results, expected);
}

#[test]
fn dyn_predicate_across_threads() {
    let pred: Arc<DynPredicate> =
        Arc::new(compile_dyn(&Type::Float, &this().gt("1.5").and(this().lt("9"))).unwrap());

    let handles: Vec<_> = [1.0_f64, 2.0, 8.5, 9.0]
        .into_iter()
        .map(|x| {
            let pred = Arc::clone(&pred);
            thread::spawn(move || pred.evaluate(&x))
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, [false, true, true, false]);
}
