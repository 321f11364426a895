//! Concurrent callers against one manager, the way several host threads
//! share the process-wide instance.
//!
//! Run with: cargo test --test concurrency -- --nocapture

use std::sync::{Arc, Barrier};
use std::thread;

use input_source_manager::{CategoryMask, InputSourceManager, MemoryProvider, MemorySource};

const THREADS: usize = 8;

fn shared_manager() -> Arc<InputSourceManager<MemoryProvider>> {
    Arc::new(InputSourceManager::new(MemoryProvider::new(
        vec![
            MemorySource::keyboard("com.apple.keylayout.US", &["en"]),
            MemorySource::keyboard("com.apple.keylayout.ABC", &["en"]),
            MemorySource::keyboard("com.apple.inputmethod.Korean.2SetKorean", &["ko"]),
            MemorySource::palette("com.apple.CharacterPaletteIM"),
        ],
        "com.apple.keylayout.US",
    )))
}

#[test]
fn test_concurrent_initialize_discovers_once() {
    let manager = shared_manager();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let manager = manager.clone();
            let barrier = barrier.clone();
            thread::Builder::new()
                .name(format!("host-{}", i))
                .spawn(move || {
                    barrier.wait();
                    manager.initialize().unwrap();
                    manager
                        .available_ids(CategoryMask::all())
                        .unwrap()
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                })
                .expect("spawn host thread")
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(manager.provider().calls().enumerate, 1);
    for ids in &results {
        assert_eq!(ids, &results[0]);
    }
    assert_eq!(results[0].len(), 4);
}

#[test]
fn test_concurrent_selects_settle_on_a_listed_source() {
    let manager = shared_manager();
    manager.initialize().unwrap();
    let ids: Vec<String> = manager
        .available_ids(CategoryMask::KEYBOARD)
        .unwrap()
        .iter()
        .map(|id| id.to_string())
        .collect();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let manager = manager.clone();
            let target = ids[i % ids.len()].clone();
            thread::spawn(move || manager.select_by_id(&target).unwrap())
        })
        .collect();

    for handle in handles {
        // Racing switches may legitimately fail verification, never error.
        let status = handle.join().unwrap();
        assert!(status.code() == 0 || status.code() == -2, "unexpected {:?}", status);
    }

    let current = manager.current_id().unwrap();
    assert!(ids.contains(&current));
    assert_eq!(manager.registry().unwrap().keyboard().len(), 3);
}
