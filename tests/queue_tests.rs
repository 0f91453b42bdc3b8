//! BoundedQueue tick semantics

mod common;

use common::{fill, queue, queue_with, random_inputs, read, write};
use syncfifo_core::{FullWritePolicy, Mode, QueueConfig, TickInput};

#[test]
fn test_new_queue_is_empty() {
    let q = queue(4);
    assert_eq!(q.capacity(), 4);
    assert_eq!(q.len(), 0);
    assert!(q.is_empty());
    assert!(!q.is_full());
    assert_eq!(q.write_index(), 0);
    assert_eq!(q.read_index(), 0);
    assert_eq!(*q.output(), 0);
    assert!(q.check_invariants().is_ok());
}

#[test]
fn test_zero_capacity_rejected() {
    let result = syncfifo_core::BoundedQueue::<u64>::new(0);
    assert!(result.is_err());
}

#[test]
fn test_concrete_scenario_depth_four() {
    let mut q = queue(4);

    for v in [10, 20, 30] {
        let out = write(&mut q, v);
        assert!(out.wrote);
        assert!(!out.full);
    }
    let out = write(&mut q, 40);
    assert!(out.full);
    assert_eq!(out.len, 4);

    let out = read(&mut q);
    assert_eq!(out.value, 10);
    assert_eq!(out.len, 3);
    assert!(!out.full);

    let out = q.step(TickInput::write_read(50));
    assert!(out.wrote && out.read);
    assert_eq!(out.value, 20);
    assert_eq!(out.len, 3);
    // Slot 0 held the freed 10 and now holds 50.
    assert_eq!(q.slots()[0], 50);

    let mut tail = Vec::new();
    for _ in 0..3 {
        tail.push(read(&mut q).value);
    }
    assert_eq!(tail, vec![30, 40, 50]);
    assert!(q.is_empty());
    assert_eq!(q.len(), 0);
}

#[test]
fn test_write_into_empty_queue_is_granted() {
    // Pointers coincide on an empty queue; the write still lands.
    let mut q = queue(3);
    let out = write(&mut q, 7);
    assert!(out.wrote);
    assert_eq!(out.len, 1);
    assert!(!out.empty);
    assert_eq!(q.write_index(), 1);
    assert_eq!(q.read_index(), 0);
}

#[test]
fn test_capacity_round_trip() {
    for depth in [1, 2, 3, 5, 8] {
        let mut q = queue(depth);
        let values = fill(&mut q, 100);
        assert!(q.is_full());

        let mut got = Vec::new();
        for i in 0..depth {
            let out = read(&mut q);
            assert!(out.read);
            got.push(out.value);
            assert_eq!(out.empty, i + 1 == depth);
        }
        assert_eq!(got, values);
        assert!(q.is_empty());
    }
}

#[test]
fn test_overflow_attempt_changes_nothing() {
    let mut q = queue(2);
    fill(&mut q, 1);
    let slots_before = q.slots().to_vec();
    let state_before = q.state();

    let out = write(&mut q, 99);
    assert!(!out.wrote);
    assert!(out.full);
    assert_eq!(q.slots(), slots_before.as_slice());
    assert_eq!(q.state(), state_before);
    assert_eq!(q.stats().overflow_attempts, 1);
}

#[test]
fn test_underflow_attempt_changes_nothing() {
    let mut q = queue(2);
    write(&mut q, 5);
    read(&mut q);
    assert!(q.is_empty());
    let state_before = q.state();

    let out = read(&mut q);
    assert!(!out.read);
    assert_eq!(out.value, 5, "output register must hold the last read value");
    assert_eq!(q.state(), state_before);
    assert_eq!(q.stats().underflow_attempts, 1);
}

#[test]
fn test_read_while_empty_with_write_only_writes() {
    let mut q = queue(2);
    let out = q.step(TickInput::write_read(3));
    assert!(out.wrote);
    assert!(!out.read);
    assert_eq!(out.len, 1);
    assert_eq!(out.value, 0);
}

#[test]
fn test_full_write_passes_through_with_read() {
    let mut q = queue(3);
    fill(&mut q, 1); // 1, 2, 3
    assert_eq!(q.write_index(), q.read_index());

    let out = q.step(TickInput::write_read(4));
    assert!(out.wrote, "write admitted because the read frees the slot");
    assert!(out.read);
    assert_eq!(out.value, 1, "read returns the pre-tick slot contents");
    assert!(out.full);
    assert_eq!(out.len, 3);
    assert!(q.check_invariants().is_ok());

    let rest: Vec<u64> = (0..3).map(|_| read(&mut q).value).collect();
    assert_eq!(rest, vec![2, 3, 4]);
}

#[test]
fn test_full_write_blocked_policy() {
    let cfg = QueueConfig {
        depth: 3,
        full_write: FullWritePolicy::Block,
        ..QueueConfig::default()
    };
    let mut q = queue_with(&cfg);
    fill(&mut q, 1);

    let out = q.step(TickInput::write_read(4));
    assert!(!out.wrote);
    assert!(out.read);
    assert_eq!(out.value, 1);
    assert_eq!(out.len, 2);
    assert_eq!(q.stats().overflow_attempts, 1);
}

#[test]
fn test_simultaneous_read_write_keeps_occupancy() {
    let mut q = queue(4);
    write(&mut q, 1);
    write(&mut q, 2);
    for v in 3..20 {
        let before = q.len();
        let out = q.step(TickInput::write_read(v));
        assert!(out.wrote && out.read);
        assert_eq!(out.len, before);
    }
    assert_eq!(q.stats().simultaneous, 17);
}

#[test]
fn test_reset_takes_precedence() {
    let mut q = queue(4);
    fill(&mut q, 10);
    read(&mut q);
    let out = q.step(TickInput {
        reset: true,
        write: true,
        read: true,
        value: 77,
    });
    assert!(!out.wrote && !out.read);
    assert!(out.empty);
    assert!(!out.full);
    assert_eq!(out.len, 0);
    assert_eq!(out.value, 10, "output register unchanged by reset");
    assert_eq!(q.write_index(), 0);
    assert_eq!(q.read_index(), 0);
    assert_eq!(q.mode(), Mode::Reset);

    write(&mut q, 1);
    assert_eq!(q.mode(), Mode::Normal);
    assert_eq!(read(&mut q).value, 1);
}

#[test]
fn test_reset_on_empty_queue() {
    let mut q = queue(1);
    let out = q.step(TickInput::reset());
    assert!(out.empty);
    assert_eq!(q.stats().resets, 1);
}

#[test]
fn test_depth_one_alternation() {
    let mut q = queue(1);
    assert!(write(&mut q, 1).full);
    assert!(!write(&mut q, 2).wrote);
    let out = q.step(TickInput::write_read(3));
    assert_eq!(out.value, 1);
    assert!(out.full);
    assert_eq!(read(&mut q).value, 3);
    assert!(q.is_empty());
}

#[test]
fn test_indices_wrap() {
    let mut q = queue(3);
    for v in 0..10 {
        write(&mut q, v);
        assert_eq!(read(&mut q).value, v);
        assert!(q.write_index() < 3);
        assert!(q.read_index() < 3);
    }
    assert_eq!(q.write_index(), 10 % 3);
    assert_eq!(q.read_index(), 10 % 3);
}

#[test]
fn test_random_ticks_keep_invariants_and_order() {
    for seed in [1u64, 7, 42, 1234] {
        let mut q = queue(5);
        let mut model = std::collections::VecDeque::new();
        for input in random_inputs(seed, 2_000, Some(257)) {
            let before = q.len();
            let out = q.step(input.clone());

            assert!(out.len <= q.capacity());
            assert!(q.check_invariants().is_ok());
            assert_eq!(out.full, out.len == q.capacity());
            assert_eq!(out.empty, out.len == 0);

            if input.reset {
                model.clear();
                assert_eq!(out.len, 0);
                continue;
            }
            if out.read {
                assert_eq!(Some(out.value), model.pop_front());
            }
            if out.wrote {
                model.push_back(input.value);
            }
            if out.wrote && out.read {
                assert_eq!(out.len, before);
            }
            assert_eq!(out.len, model.len());
        }
    }
}

#[test]
fn test_stats_counters() {
    let mut q = queue(2);
    write(&mut q, 1);
    write(&mut q, 2);
    write(&mut q, 3); // dropped
    read(&mut q);
    read(&mut q);
    read(&mut q); // dropped
    q.step(TickInput::reset());

    let s = q.stats();
    assert_eq!(s.ticks, 7);
    assert_eq!(s.writes, 2);
    assert_eq!(s.reads, 2);
    assert_eq!(s.overflow_attempts, 1);
    assert_eq!(s.underflow_attempts, 1);
    assert_eq!(s.resets, 1);
    assert_eq!(s.peak_occupancy, 2);
    assert_eq!(s.dropped(), 2);
}

#[test]
fn test_step_with_matches_step() {
    let mut a = queue(4);
    let mut b = queue(4);
    let inputs = random_inputs(99, 200, None);
    for input in inputs {
        let x = a.step(input.clone());
        let y = b.step_with(input.reset, input.write, input.read, input.value);
        assert_eq!(x, y);
    }
}

#[test]
fn test_generic_payload() {
    let mut q = syncfifo_core::BoundedQueue::<String>::new(2).unwrap();
    q.step(TickInput::write("a".to_string()));
    q.step(TickInput::write("b".to_string()));
    let out = q.step(TickInput::read());
    assert_eq!(out.value, "a");
    let out = q.step(TickInput::idle());
    assert_eq!(out.value, "a");
    assert_eq!(out.len, 1);
}

#[test]
fn test_stats_merge_and_reset() {
    let mut a = queue(2);
    let mut b = queue(3);
    fill(&mut a, 0);
    fill(&mut b, 0);
    read(&mut b);

    let merged = a.stats().merge(b.stats());
    assert_eq!(merged.writes, 5);
    assert_eq!(merged.reads, 1);
    assert_eq!(merged.ticks, 6);
    assert_eq!(merged.peak_occupancy, 3);

    let mut s = merged.clone();
    s.reset_counters();
    assert_eq!(s, syncfifo_core::QueueStats::default());
}
