//! Resolution from many threads against a shared container

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use depwire::{injectable, Container, Lifetime};

trait Repository: Send + Sync {
    fn table(&self) -> &str;
}

struct UserRepository;

impl Repository for UserRepository {
    fn table(&self) -> &str {
        "users"
    }
}

struct UserService {
    repository: Arc<dyn Repository>,
}

#[injectable]
impl UserService {
    #[inject]
    fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

#[test]
fn test_concurrent_get_shares_singleton() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut container = Container::new();
    container.register_factory_with::<dyn Repository, _>(Lifetime::Singleton, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Arc::new(UserRepository)
    });
    container.register_type::<UserService>().unwrap();

    let container = Arc::new(container);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                (0..50)
                    .map(|_| container.get::<UserService>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let services: Vec<Arc<UserService>> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(services.len(), 400);
    assert_eq!(built.load(Ordering::SeqCst), 1);
    let first = &services[0].repository;
    assert!(services
        .iter()
        .all(|service| Arc::ptr_eq(&service.repository, first)));
    assert_eq!(first.table(), "users");
}

#[test]
fn test_concurrent_failures_leave_container_usable() {
    let container = Arc::new({
        let mut container = Container::new();
        container.register_type::<UserService>().unwrap();
        container
    });

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let error = container.get::<UserService>().err().unwrap();
                assert!(error.is_provider_not_found());
            });
        }
    });

    assert_eq!(container.len(), 1);
}
