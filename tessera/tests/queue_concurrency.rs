use tessera::WorkStealingQueue;
use tessera::task::Task;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn test_concurrent_pop_and_steal_lose_nothing() {
    const TASKS: usize = 20_000;
    const STEALERS: usize = 4;

    let queue = Arc::new(WorkStealingQueue::new());
    for i in 0..TASKS {
        queue.push(i);
    }

    let barrier = Arc::new(Barrier::new(STEALERS + 1));

    let stealers: Vec<_> = (0..STEALERS)
        .map(|_| {
            let queue = queue.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();

                let mut taken = Vec::new();
                while !queue.is_empty() {
                    if let Some(value) = queue.try_steal() {
                        taken.push(value);
                    }
                }
                taken
            })
        })
        .collect();

    barrier.wait();

    let mut taken = Vec::new();
    while !queue.is_empty() {
        if let Some(value) = queue.try_pop() {
            taken.push(value);
        }
    }

    for stealer in stealers {
        taken.extend(stealer.join().unwrap());
    }

    assert_eq!(taken.len(), TASKS);

    let unique: HashSet<_> = taken.into_iter().collect();
    assert_eq!(unique.len(), TASKS);
    assert!((0..TASKS).all(|i| unique.contains(&i)));
}

#[test]
fn test_batch_operations_hand_out_each_task_once() {
    const TASKS: usize = 10_000;
    const THREADS: usize = 6;

    let queue = Arc::new(WorkStealingQueue::new());
    for i in 0..TASKS {
        queue.push(i);
    }

    let seen = Arc::new(Mutex::new(Vec::with_capacity(TASKS)));

    let threads: Vec<_> = (0..THREADS)
        .map(|t| {
            let queue = queue.clone();
            let seen = seen.clone();

            thread::spawn(move || {
                let mut batch = Vec::new();

                while !queue.is_empty() {
                    let took = if t % 2 == 0 {
                        queue.try_pop_batch(&mut batch, 1 + t)
                    } else {
                        queue.try_steal_batch(&mut batch, 1 + t)
                    };

                    if took {
                        seen.lock().unwrap().append(&mut batch);
                    }
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    let unique: HashSet<_> = seen.iter().copied().collect();

    assert_eq!(seen.len(), TASKS);
    assert_eq!(unique.len(), TASKS);
}

#[test]
fn test_push_never_drops_under_contention() {
    const PUSHERS: usize = 4;
    const PER_PUSHER: usize = 2_000;

    let queue = Arc::new(WorkStealingQueue::new());
    let done = Arc::new(AtomicBool::new(false));

    // A stealer keeps the guard busy while the pushers insert.
    let stealer = {
        let queue = queue.clone();
        let done = done.clone();

        thread::spawn(move || {
            let mut stolen = 0;
            while !done.load(Ordering::Acquire) || !queue.is_empty() {
                if queue.try_steal().is_some() {
                    stolen += 1;
                }
            }
            stolen
        })
    };

    let pushers: Vec<_> = (0..PUSHERS)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..PER_PUSHER {
                    queue.push(p * PER_PUSHER + i);
                }
            })
        })
        .collect();

    for pusher in pushers {
        pusher.join().unwrap();
    }
    done.store(true, Ordering::Release);

    assert_eq!(stealer.join().unwrap(), PUSHERS * PER_PUSHER);
    assert!(queue.is_empty());
}

#[test]
fn test_try_push_returns_task_on_contention() {
    let queue = Arc::new(WorkStealingQueue::new());
    let accepted = Arc::new(AtomicUsize::new(0));
    let returned = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let queue = queue.clone();
            let accepted = accepted.clone();
            let returned = returned.clone();

            thread::spawn(move || {
                for i in 0..1_000 {
                    let value = t * 1_000 + i;
                    match queue.try_push(value) {
                        Ok(()) => accepted.fetch_add(1, Ordering::SeqCst),
                        Err(back) => {
                            assert_eq!(back, value);
                            returned.fetch_add(1, Ordering::SeqCst)
                        }
                    };
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(
        accepted.load(Ordering::SeqCst) + returned.load(Ordering::SeqCst),
        4_000
    );
    assert_eq!(queue.len(), accepted.load(Ordering::SeqCst));
}

#[test]
fn test_owner_bursts_with_eight_stealers_run_each_task_once() {
    const BURSTS: usize = 500;
    const STEALERS: usize = 8;

    let queue: Arc<WorkStealingQueue> = Arc::new(WorkStealingQueue::new());
    let owner_done = Arc::new(AtomicBool::new(false));
    let flags: Mutex<Vec<Arc<AtomicBool>>> = Mutex::new(Vec::new());
    let executed = Arc::new(AtomicUsize::new(0));
    let duplicates = Arc::new(AtomicUsize::new(0));

    let make_task = || {
        let flag = Arc::new(AtomicBool::new(false));
        flags.lock().unwrap().push(flag.clone());

        let executed = executed.clone();
        let duplicates = duplicates.clone();

        Task::new(move || {
            if flag.swap(true, Ordering::SeqCst) {
                duplicates.fetch_add(1, Ordering::SeqCst);
            }
            executed.fetch_add(1, Ordering::SeqCst);
        })
    };

    let stealers: Vec<_> = (0..STEALERS)
        .map(|_| {
            let queue = queue.clone();
            let owner_done = owner_done.clone();

            thread::spawn(move || {
                while !owner_done.load(Ordering::Acquire) || !queue.is_empty() {
                    match queue.try_steal() {
                        Some(task) => task.run(),
                        None => thread::yield_now(),
                    }
                }
            })
        })
        .collect();

    let mut pushed = 0;
    for _ in 0..BURSTS {
        for _ in 0..fastrand::usize(1..32) {
            queue.push(make_task());
            pushed += 1;
        }

        for _ in 0..fastrand::usize(0..32) {
            if let Some(task) = queue.try_pop() {
                task.run();
            }
        }
    }

    while !queue.is_empty() {
        if let Some(task) = queue.try_pop() {
            task.run();
        }
    }
    owner_done.store(true, Ordering::Release);

    for stealer in stealers {
        stealer.join().unwrap();
    }

    assert_eq!(executed.load(Ordering::SeqCst), pushed);
    assert_eq!(duplicates.load(Ordering::SeqCst), 0);
    assert!(
        flags
            .lock()
            .unwrap()
            .iter()
            .all(|flag| flag.load(Ordering::SeqCst))
    );
}
