//! Integration tests for `#[injectable]` and constructor location

use std::sync::Arc;

use depwire::{injectable, Container, InjectConstructor, Injectable, TypeKey};

struct Host(String);

struct Port(u16);

struct Endpoint {
    address: String,
}

#[injectable]
impl Endpoint {
    #[inject]
    fn new(host: Arc<Host>, port: Arc<Port>) -> Self {
        Self {
            address: format!("{}:{}", host.0, port.0),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }
}

struct Clock;

#[injectable]
impl Clock {
    #[inject]
    fn system() -> Self {
        Clock
    }
}

struct Unmarked;

#[injectable]
impl Unmarked {
    #[allow(dead_code)]
    fn new() -> Self {
        Unmarked
    }
}

struct Ambiguous;

#[injectable]
impl Ambiguous {
    #[inject]
    fn new() -> Self {
        Ambiguous
    }

    #[inject]
    fn with_defaults() -> Self {
        Ambiguous
    }
}

struct Wrapper<T> {
    inner: Arc<T>,
}

#[injectable]
impl<T: Send + Sync + 'static> Wrapper<T> {
    #[inject]
    fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

#[test]
fn test_generated_constructor_lists_dependencies_in_order() {
    let constructors = Endpoint::inject_constructors();
    assert_eq!(constructors.len(), 1);
    assert_eq!(constructors[0].name(), "new");
    assert_eq!(
        constructors[0].dependencies(),
        &[TypeKey::of::<Host>(), TypeKey::of::<Port>()]
    );
}

#[test]
fn test_arguments_are_passed_in_declaration_order() {
    let mut container = Container::new();
    container.register_instance(Arc::new(Host("localhost".to_string())));
    container.register_instance(Arc::new(Port(5432)));
    container.register_type::<Endpoint>().unwrap();

    let endpoint = container.get::<Endpoint>().unwrap();
    assert_eq!(endpoint.address(), "localhost:5432");
}

#[test]
fn test_constructor_without_parameters() {
    let mut container = Container::new();
    container.register_type::<Clock>().unwrap();

    assert_eq!(Clock::inject_constructors()[0].name(), "system");
    assert!(container.get::<Clock>().is_ok());
}

#[test]
fn test_unmarked_type_fails_at_registration() {
    let mut container = Container::new();

    let error = container.register_type::<Unmarked>().err().unwrap();
    assert!(error.is_inject_constructor_not_found());
    assert!(error.to_string().contains("Unmarked"));
    assert!(container.is_empty());
}

#[test]
fn test_ambiguous_type_fails_at_registration() {
    let mut container = Container::new();

    let error = container.register_type::<Ambiguous>().err().unwrap();
    assert!(error.is_inject_constructor_not_found());
    assert!(error.to_string().contains("found 2"));
    assert!(!container.contains::<Ambiguous>());
}

#[test]
fn test_generic_impl_block() {
    let mut container = Container::new();
    container.register_instance(Arc::new(Port(80)));
    container.register_type::<Wrapper<Port>>().unwrap();

    assert_eq!(container.get::<Wrapper<Port>>().unwrap().inner.0, 80);
}

struct Manual {
    port: Arc<Port>,
}

impl Injectable for Manual {
    fn inject_constructors() -> Vec<InjectConstructor<Self>> {
        vec![InjectConstructor::new(
            "from_port",
            vec![TypeKey::of::<Port>()],
            |arguments| {
                Ok(Manual {
                    port: arguments.next::<Port>()?,
                })
            },
        )]
    }
}

#[test]
fn test_handwritten_injectable() {
    let mut container = Container::new();
    container.register_factory(|| Arc::new(Port(443)));
    container.register_type::<Manual>().unwrap();

    assert_eq!(container.get::<Manual>().unwrap().port.0, 443);
}
