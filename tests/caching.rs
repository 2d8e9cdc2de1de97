use maniple::{
    Activator, AnyArc, CachedActivator, Container, ContainerCore, DiError, DiResult, Factory,
    Lifetime, ServiceCollection,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Counted {
    calls: Arc<AtomicUsize>,
}

impl Activator for Counted {
    fn activate(&self, _services: &dyn ContainerCore) -> DiResult<AnyArc> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(n))
    }
}

#[test]
fn test_cached_activator_runs_inner_once_across_sixteen_calls() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cached = CachedActivator::new(Counted { calls: calls.clone() });
    let container = ServiceCollection::new().build();

    let first = cached.activate(&container).unwrap();
    for _ in 1..16 {
        assert!(Arc::ptr_eq(&first, &cached.activate(&container).unwrap()));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_singleton_lifetime_wraps_any_activator() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services
        .add_activator("once", Counted { calls: calls.clone() }, Lifetime::Singleton)
        .add_activator("always", Counted { calls: calls.clone() }, Lifetime::Transient);
    let container = services.build();

    for _ in 0..4 {
        container.get("once").unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let a = container.get_as::<usize>("always").unwrap();
    let b = container.get_as::<usize>("always").unwrap();
    assert_ne!(*a, *b);
}

#[test]
fn test_cached_value_survives_failures_of_other_services() {
    let mut services = ServiceCollection::new();
    services
        .add_factory(
            "stable",
            Factory::builder("stable").build(|_| Ok(vec![1u8, 2, 3])),
            Lifetime::Singleton,
        )
        .add_factory(
            "broken",
            Factory::builder("broken").build(|_| -> Result<u8, maniple::BoxError> { Err("nope".into()) }),
            Lifetime::Singleton,
        );
    let container = services.build();

    let before = container.get("stable").unwrap();
    assert!(container.get("broken").is_err());
    assert!(container.get("broken").is_err());
    assert!(Arc::ptr_eq(&before, &container.get("stable").unwrap()));
}

#[test]
fn test_failed_first_activation_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let mut services = ServiceCollection::new();
    services.add_factory(
        "flaky",
        Factory::builder("flaky").build(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("warming up".into())
            } else {
                Ok("ready")
            }
        }),
        Lifetime::Singleton,
    );
    let container = services.build();

    match container.get("flaky") {
        Err(DiError::ActivationFailure { source, .. }) => {
            assert!(matches!(*source, DiError::ConstructionFailure { .. }))
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
    let ready = container.get_as::<&str>("flaky").unwrap();
    assert_eq!(*ready, "ready");
    container.get("flaky").unwrap();
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
