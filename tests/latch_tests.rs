//! Latch tests for the concurrent consume-on-read contract.

use std::sync::Arc;
use std::thread;

use wiegand26::IdLatch;

#[test]
fn test_publish_from_another_thread() {
    let latch = Arc::new(IdLatch::new());

    let producer = {
        let latch = Arc::clone(&latch);
        thread::spawn(move || {
            latch.publish(0x2AA_AAAA, 1000);
        })
    };
    producer.join().unwrap();

    assert_eq!(latch.take_fresh(1100, 500), Some((0x2AA_AAAA, 1000)));
}

#[test]
fn test_racing_consumers_take_at_most_once() {
    // The swap-based take means two racing readers can never both receive
    // the same identifier, and neither can see a torn value/timestamp pair.
    for _ in 0..100 {
        let latch = Arc::new(IdLatch::new());
        latch.publish(0x155_5555, 42);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.take_fresh(50, 500))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_some()).count();

        assert_eq!(winners, 1);
        assert!(results.contains(&Some((0x155_5555, 42))));
    }
}

#[test]
fn test_interleaved_publish_take() {
    let latch = IdLatch::new();

    latch.publish(1, 10);
    assert_eq!(latch.take_fresh(20, 500), Some((1, 10)));

    latch.publish(2, 30);
    latch.publish(3, 40); // overwrites 2
    assert_eq!(latch.take_fresh(50, 500), Some((3, 40)));
    assert_eq!(latch.take_fresh(50, 500), None);
}
