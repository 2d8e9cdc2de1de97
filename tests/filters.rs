use maniple::{
    filter_fn, AnyArc, Container, ContainerCore, DiError, DiResult, Lifetime, Next,
    ServiceCollection, ServiceFilter, TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Appends its name to a shared log, then delegates.
struct Trace {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl ServiceFilter for Trace {
    fn filter(&self, services: &dyn ContainerCore, next: &Next<'_>) -> DiResult<AnyArc> {
        self.log.lock().unwrap().push(self.name);
        next.activate(services)
    }
}

fn trace(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Trace {
    Trace {
        name,
        log: log.clone(),
    }
}

#[test]
fn test_global_filters_run_before_identifier_filters() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut services = ServiceCollection::new();
    services
        .add_instance("Car", "car")
        .add_filter_for("Car", trace("car-1", &log))
        .add_filter(trace("global-1", &log))
        .add_filter_for("Engine", trace("engine", &log))
        .add_filter_for("Car", trace("car-2", &log))
        .add_filter(trace("global-2", &log));
    let container = services.build();

    container.get("Car").unwrap();
    assert_eq!(*log.lock().unwrap(), ["global-1", "global-2", "car-1", "car-2"]);
}

#[test]
fn test_short_circuit_never_reaches_activator() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = constructions.clone();
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut services = ServiceCollection::new();
    services
        .register_type(TypeDescriptor::builder("Engine").default_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            1399u32
        }))
        .add_filter_for("Engine", filter_fn(|_, _| Ok(Arc::new(600u32) as AnyArc)))
        .add_filter_for("Engine", trace("unreached", &log));
    let container = services.build();

    assert_eq!(*container.get_as::<u32>("Engine").unwrap(), 600);
    assert_eq!(constructions.load(Ordering::SeqCst), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_filter_can_fall_back_on_failure() {
    let mut services = ServiceCollection::new();
    services
        .register_type(
            TypeDescriptor::builder("Config")
                .try_default_with(|| -> Result<String, maniple::BoxError> { Err("file missing".into()) }),
        )
        .add_filter_for(
            "Config",
            filter_fn(|services, next| {
                next.activate(services)
                    .or_else(|_| Ok(Arc::new("defaults".to_string()) as AnyArc))
            }),
        );
    let container = services.build();
    assert_eq!(&*container.get_as::<String>("Config").unwrap(), "defaults");
}

#[test]
fn test_retry_filter_calls_next_again() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let mut services = ServiceCollection::new();
    services
        .register_type(TypeDescriptor::builder("Socket").try_default_with(
            move || -> Result<u16, maniple::BoxError> {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("refused".into())
                } else {
                    Ok(8080)
                }
            },
        ))
        .add_filter_for(
            "Socket",
            filter_fn(|services, next| {
                let mut last = None;
                for _ in 0..3 {
                    match next.activate(services) {
                        Ok(value) => return Ok(value),
                        Err(e) => last = Some(e),
                    }
                }
                Err(last.unwrap_or_else(|| DiError::vetoed("Socket", "no attempts")))
            }),
        );
    let container = services.build();

    assert_eq!(*container.get_as::<u16>("Socket").unwrap(), 8080);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_veto_is_wrapped_at_the_boundary() {
    let mut services = ServiceCollection::new();
    services
        .add_instance("secret", 7u8)
        .add_filter(filter_fn(|_, _| Err(DiError::vetoed("secret", "denied"))));
    let container = services.build();

    match container.get("secret") {
        Err(DiError::ActivationFailure { id, source }) => {
            assert_eq!(id, "secret");
            assert_eq!(source.to_string(), "Activation of 'secret' vetoed: denied");
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_filters_wrap_cached_activator_not_the_reverse() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut services = ServiceCollection::new();
    services
        .register_type(TypeDescriptor::builder("Clock").default_with(|| 0u64))
        .add_class("clock", "Clock", Lifetime::Singleton)
        .add_filter_for("clock", trace("clock", &log));
    let container = services.build();

    let a = container.get("clock").unwrap();
    let b = container.get("clock").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_filter_may_use_the_container() {
    let mut services = ServiceCollection::new();
    services
        .add_instance("prefix", "Dr.".to_string())
        .add_instance("name", "Who".to_string())
        .add_filter_for(
            "name",
            filter_fn(|services, next| {
                let prefix = services.get_as::<String>("prefix")?;
                let name = next.activate(services)?;
                let name = name.downcast_ref::<String>().cloned().unwrap_or_default();
                Ok(Arc::new(format!("{} {}", prefix, name)) as AnyArc)
            }),
        );
    let container = services.build();
    assert_eq!(&*container.get_as::<String>("name").unwrap(), "Dr. Who");
}
