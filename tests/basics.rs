use maniple::{
    Container, ContainerCore, DiError, Lifetime, ParameterDescriptor, ServiceCollection,
    TypeDescriptor, TypedResolver,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Engine {
    size: u32,
}

#[derive(Debug)]
struct Car {
    engine: Arc<Engine>,
}

fn car_type(constructions: Arc<AtomicUsize>) -> TypeDescriptor {
    TypeDescriptor::builder("Car")
        .parameter(ParameterDescriptor::typed("engine", "Engine"))
        .constructor(move |args| {
            constructions.fetch_add(1, Ordering::SeqCst);
            Ok(Car {
                engine: args.get::<Engine>(0)?,
            })
        })
        .build()
}

#[test]
fn test_end_to_end_car_assembly() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services
        .with_parameter_resolver(TypedResolver)
        .register_type(car_type(constructions.clone()))
        .add_instance("Engine", Engine { size: 1399 })
        .add_class("cached-car", "Car", Lifetime::Singleton);

    let container = services.build();

    let car = container.get_as::<Car>("Car").unwrap();
    assert_eq!(car.engine.size, 1399);
    assert_eq!(constructions.load(Ordering::SeqCst), 1);

    let first = container.get_as::<Car>("cached-car").unwrap();
    for _ in 1..16 {
        let again = container.get_as::<Car>("cached-car").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
    assert_eq!(constructions.load(Ordering::SeqCst), 2);
}

#[test]
fn test_implicit_construction_is_transient() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services
        .register_type(car_type(constructions.clone()))
        .add_instance("Engine", Engine { size: 600 });
    let container = services.build();

    let a = container.get_as::<Car>("Car").unwrap();
    let b = container.get_as::<Car>("Car").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.engine, &b.engine));
    assert_eq!(constructions.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unknown_identifier_is_not_found() {
    let container = ServiceCollection::new().build();
    assert!(!container.has("SomeType"));
    match container.get("SomeType") {
        Err(DiError::NotFound(id)) => assert_eq!(id, "SomeType"),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_has_covers_registrations_and_constructible_types() {
    let mut services = ServiceCollection::new();
    services
        .register_type(TypeDescriptor::builder("Clock").default_with(|| 0u64))
        .register_type(TypeDescriptor::builder("Abstract"))
        .add_instance("greeting", "hi");
    let container = services.build();

    assert!(container.has("greeting"));
    assert!(container.has("Clock"));
    assert!(!container.has("Abstract"));
    assert!(container.get("Abstract").unwrap_err().is_not_found());
}

#[test]
fn test_missing_dependency_fails_with_unresolvable_parameter() {
    let mut services = ServiceCollection::new();
    services.register_type(car_type(Arc::new(AtomicUsize::new(0))));
    let container = services.build();

    let err = container.get("Car").unwrap_err();
    match err.root_cause() {
        DiError::UnresolvableParameter { context, name } => {
            assert_eq!(context, "Car");
            assert_eq!(name, "engine");
        }
        other => panic!("unexpected: {}", other),
    }
}

#[test]
fn test_typed_helpers() {
    let mut services = ServiceCollection::new();
    services
        .add_instance_of(String::from("Hello, World!"))
        .add_instance("answer", 42u32);
    let container = services.build();

    assert_eq!(&*container.get_of::<String>().unwrap(), "Hello, World!");
    assert_eq!(*container.get_required::<u32>("answer"), 42);
    match container.get_as::<String>("answer") {
        Err(DiError::TypeMismatch(id)) => assert_eq!(id, "answer"),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_container_is_cheap_to_clone_and_shares_singletons() {
    let mut services = ServiceCollection::new();
    services
        .register_type(TypeDescriptor::builder("Clock").default_with(|| 0u64))
        .add_class("clock", "Clock", Lifetime::Singleton);
    let container = services.build();
    let clone = container.clone();

    assert!(Arc::ptr_eq(
        &container.get("clock").unwrap(),
        &clone.get("clock").unwrap()
    ));
    assert_eq!(container.len(), 1);
}
