use std::sync::{Arc, LazyLock};
use std::thread;

use rulecraft::{Predicate, Record, Schema, Type, Value, member};

struct Order {
    id: u32,
    total: f64,
    country: String,
}

impl Record for Order {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::builder::<Order>("Order")
                .member("Total", Type::Float, |o| Value::Float(o.total))
                .member("Country", Type::String, |o| Value::from(o.country.as_str()))
                .build()
        });
        &SCHEMA
    }
}

fn main() {
    let needs_review = Arc::new(
        Predicate::<Order>::compile(
            &member("Total")
                .gt(1000)
                .or_else(member("Country").is_match("^(xx|yy)$")),
        )
        .expect("failed to compile rule"),
    );

    let handles: Vec<_> = (0..4_u32)
        .map(|i| {
            let pred = Arc::clone(&needs_review);
            thread::spawn(move || {
                let order = Order {
                    id: i,
                    total: 600.0 * f64::from(i),
                    country: if i == 1 { "XX".into() } else { "fr".into() },
                };
                (order.id, pred.evaluate(&order))
            })
        })
        .collect();

    for handle in handles {
        let (id, review) = handle.join().expect("thread panicked");
        println!("Order {id}: review = {review}");
    }
}
