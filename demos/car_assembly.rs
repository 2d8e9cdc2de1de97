//! Wires a small garage: implicit construction, a memoized singleton,
//! explicit overrides, a value object and a logging filter.
//!
//! Run with `RUST_LOG`-style output by installing any `tracing` subscriber;
//! without one the observer events are simply dropped.

use maniple::{
    filter_fn, Container, ContainerCore, KeyValueResolver, Lifetime, LoggingObserver, MetricsObserver,
    ParameterDescriptor, PropertyDescriptor, ServiceCollection, TypeDescriptor,
};
use std::sync::Arc;

struct Engine {
    size: u32,
}

struct Car {
    engine: Arc<Engine>,
    color: String,
}

#[derive(Default)]
struct Owner {
    name: String,
    age: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(MetricsObserver::new());

    let mut services = ServiceCollection::new();
    services
        .register_type(
            TypeDescriptor::builder("Car")
                .parameter(ParameterDescriptor::typed("engine", "Engine"))
                .parameter(ParameterDescriptor::untyped("color"))
                .constructor(|args| {
                    Ok(Car {
                        engine: args.get::<Engine>(0)?,
                        color: args.cloned::<String>(1)?,
                    })
                }),
        )
        .register_type(
            TypeDescriptor::builder("Owner")
                .default_with(Owner::default)
                .property(PropertyDescriptor::untyped("name"), |o: &mut Owner, v: &String| {
                    o.name = v.clone()
                })
                .property(PropertyDescriptor::untyped("age"), |o: &mut Owner, v: &i32| o.age = *v),
        )
        .add_instance("Engine", Engine { size: 1399 })
        .add_class_with(
            "daily",
            "Car",
            Lifetime::Singleton,
            KeyValueResolver::new().with("color", "silver".to_string()),
        )
        .add_value_object_with(
            "owner",
            "Owner",
            Lifetime::Singleton,
            KeyValueResolver::new().with("name", "Alice".to_string()).with("age", 33i32),
        )
        .add_filter_for(
            "daily",
            filter_fn(|services, next| {
                println!("  (filter) handing over the keys");
                next.activate(services)
            }),
        )
        .add_observer(Arc::new(LoggingObserver::new()))
        .add_observer(metrics.clone());

    let container = services.build();

    let owner = container.get_as::<Owner>("owner")?;
    let car = container.get_as::<Car>("daily")?;
    println!(
        "{} ({}) drives a {} car with a {}cc engine",
        owner.name, owner.age, car.color, car.engine.size
    );

    let again = container.get_as::<Car>("daily")?;
    println!("same car the next day: {}", Arc::ptr_eq(&car, &again));

    match container.get("Car") {
        Ok(_) => println!("an unpainted car appeared"),
        Err(e) => println!("implicit Car failed: {}", e.root_cause()),
    }

    let snapshot = metrics.snapshot();
    println!(
        "{} activations started, {} succeeded, {} failed",
        snapshot.started, snapshot.succeeded, snapshot.failed
    );
    Ok(())
}
