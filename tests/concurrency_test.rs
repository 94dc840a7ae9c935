//! 多线程共享解析器的测试

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use wiring::Resolver;

#[derive(Debug)]
struct SlowService {
    id: usize,
}

#[test]
fn test_resolver_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver>();
}

#[test]
fn test_concurrent_prepare_creates_once() {
    let resolver = Arc::new(Resolver::new());
    let creation_count = Arc::new(AtomicUsize::new(0));
    let count_clone = creation_count.clone();

    resolver
        .register("slow", move |_| {
            thread::sleep(Duration::from_millis(5));
            Ok(SlowService {
                id: count_clone.fetch_add(1, Ordering::SeqCst),
            })
        })
        .unwrap();

    let barrier = Barrier::new(8);
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                barrier.wait();
                resolver.prepare().unwrap();
            });
        }
    });

    assert_eq!(creation_count.load(Ordering::SeqCst), 1);
    assert!(!resolver.is_preparing());
    assert_eq!(resolver.resolve::<SlowService>("slow").unwrap().id, 0);
}

#[test]
fn test_concurrent_resolution_after_prepare_is_identical() {
    let resolver = Arc::new(Resolver::new());
    resolver
        .register("service", |_| Ok(SlowService { id: 7 }))
        .unwrap();
    resolver.prepare().unwrap();

    let expected = resolver.resolve::<SlowService>("service").unwrap();
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let resolver = resolver.clone();
            thread::spawn(move || resolver.resolve::<SlowService>("service").unwrap())
        })
        .collect();

    for handle in handles {
        let service = handle.join().unwrap();
        assert!(Arc::ptr_eq(&service, &expected));
    }
}

#[test]
fn test_concurrent_registration_of_distinct_keys() {
    let resolver = Arc::new(Resolver::new());

    thread::scope(|scope| {
        for worker in 0..4 {
            let resolver = &resolver;
            scope.spawn(move || {
                for i in 0..25 {
                    resolver
                        .register_value(format!("worker{}-{}", worker, i), i)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(resolver.len(), 100);
    assert_eq!(*resolver.resolve::<i32>("worker3-24").unwrap(), 24);
}

#[test]
fn test_concurrent_duplicate_registration_single_winner() {
    let resolver = Resolver::new();
    let winners = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..8_usize {
            let resolver = &resolver;
            let winners = &winners;
            scope.spawn(move || {
                if resolver.register_value("contested", worker).is_ok() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.len(), 1);
}
