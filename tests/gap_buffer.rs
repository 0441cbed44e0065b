//! Gap buffer behaviour tests
//!
//! Differential runs against a plain vector model, algebraic laws for cursor
//! movement and run insertion, and growth edge cases.

mod common;

use common::{assert_invariants, buffer_with, content, ModelBuffer, XorShift};
use gapvis::GapBuffer;

// ========================================================================
// Differential Tests
// ========================================================================

fn run_differential(seed: u64, capacity: usize, steps: usize) {
    let mut rng = XorShift::new(seed);
    let mut buffer = GapBuffer::with_capacity(capacity).unwrap();
    let mut model = ModelBuffer::default();

    for step in 0..steps {
        match rng.below(7) {
            0 | 1 => {
                let unit = rng.unit();
                buffer.insert(unit).unwrap();
                model.insert(unit);
            }
            2 => {
                let len = rng.below(12) as usize;
                let run: Vec<u8> = (0..len).map(|_| rng.unit()).collect();
                buffer.insert_slice(&run).unwrap();
                model.insert_slice(&run);
            }
            3 => {
                let delta = rng.below(41) as isize - 20;
                buffer.move_cursor(delta);
                model.move_cursor(delta);
            }
            4 => {
                if rng.below(2) == 0 {
                    buffer.step_forward();
                    model.move_cursor(1);
                } else {
                    buffer.step_backward();
                    model.move_cursor(-1);
                }
            }
            5 => {
                buffer.delete_forward();
                model.delete_forward();
            }
            _ => {
                buffer.delete_backward();
                model.delete_backward();
            }
        }

        assert_invariants(&buffer);
        assert_eq!(
            buffer.to_vec(),
            model.text,
            "content diverged at step {} (seed {})",
            step,
            seed
        );
        assert_eq!(buffer.cursor(), model.cursor, "cursor diverged at step {}", step);
    }
}

#[test]
fn test_differential_small_capacity() {
    for seed in 1..=20 {
        run_differential(seed, 1, 400);
    }
}

#[test]
fn test_differential_large_capacity() {
    for seed in 100..110 {
        run_differential(seed, 64, 400);
    }
}

#[test]
fn test_differential_long_run() {
    run_differential(0xDEADBEEF, 4, 5_000);
}

// ========================================================================
// Laws
// ========================================================================

#[test]
fn test_move_inverse_law() {
    let mut rng = XorShift::new(7);
    for _ in 0..200 {
        let len = rng.below(30) as usize;
        let text: String = (0..len).map(|_| rng.unit() as char).collect();
        let mut buffer = buffer_with(&text, 1 + rng.below(8) as usize);
        buffer.move_cursor(-(rng.below(len as u64 + 1) as isize));

        let front = buffer.cursor();
        let before = buffer.to_vec();
        // Unclamped distance in either direction
        let delta = if rng.below(2) == 0 {
            rng.below(buffer.back_len() as u64 + 1) as isize
        } else {
            -(rng.below(front as u64 + 1) as isize)
        };

        assert_eq!(buffer.move_cursor(delta), delta.unsigned_abs());
        buffer.move_cursor(-delta);
        assert_eq!(buffer.cursor(), front);
        assert_eq!(buffer.to_vec(), before);
    }
}

#[test]
fn test_run_insertion_matches_single_insertions() {
    let mut rng = XorShift::new(11);
    for _ in 0..200 {
        let prefix: String = (0..rng.below(20)).map(|_| rng.unit() as char).collect();
        let run: Vec<u8> = (0..rng.below(40)).map(|_| rng.unit()).collect();
        let capacity = 1 + rng.below(16) as usize;
        let back = rng.below(prefix.len() as u64 + 1) as isize;

        let mut batched = buffer_with(&prefix, capacity);
        batched.move_cursor(-back);
        let mut single = batched.clone();

        batched.insert_slice(&run).unwrap();
        for &unit in &run {
            single.insert(unit).unwrap();
        }

        assert_eq!(batched.to_vec(), single.to_vec());
        assert_eq!(batched.cursor(), single.cursor());
        assert_invariants(&batched);
    }
}

#[test]
fn test_growth_preserves_content() {
    let mut buffer = buffer_with("abcdefgh", 8);
    buffer.move_cursor(-3);
    assert_eq!(buffer.gap_len(), 0);
    let before = buffer.to_vec();
    let back_before = buffer.back_segment().to_vec();

    buffer.insert(b'!').unwrap();

    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.back_segment(), back_before.as_slice());
    let mut expected = before.clone();
    expected.insert(5, b'!');
    assert_eq!(buffer.to_vec(), expected);
    // Growth added 8 slots of gap, one of which was consumed
    assert_eq!(buffer.gap_len(), 7);
}

// ========================================================================
// Scenarios
// ========================================================================

#[test]
fn test_scenario_insert_run_into_single_slot() {
    let mut buffer = GapBuffer::with_capacity(1).unwrap();
    buffer.insert_slice(b"ab").unwrap();
    assert_eq!(content(&buffer), "ab");
    assert_eq!(buffer.cursor(), 2);
}

#[test]
fn test_scenario_insert_mid_sentence() {
    let mut buffer = buffer_with("This is a buffer.", 1);
    buffer.move_cursor(-7);
    buffer.insert_slice(b"gap ").unwrap();
    assert_eq!(content(&buffer), "This is a gap buffer.");
}

#[test]
fn test_scenario_backspace_on_empty() {
    let mut buffer = GapBuffer::with_capacity(1).unwrap();
    assert!(!buffer.delete_backward());
    assert_eq!(buffer.cursor(), 0);
}

#[test]
fn test_scenario_step_forward_on_empty() {
    let mut buffer = GapBuffer::with_capacity(1).unwrap();
    assert!(!buffer.step_forward());
    assert_eq!(buffer.cursor(), 0);
    assert_eq!(buffer.gap_len(), 1);
    assert_eq!(buffer.capacity(), 1);
}

#[test]
fn test_scenario_ten_inserts_from_four() {
    let mut buffer = GapBuffer::with_capacity(4).unwrap();
    for unit in b"0123456789" {
        buffer.insert(*unit).unwrap();
    }
    assert!(buffer.capacity() >= 10);
    assert_eq!(content(&buffer), "0123456789");
}

// ========================================================================
// Boundaries
// ========================================================================

#[test]
fn test_delete_forward_at_end_is_noop() {
    let mut buffer = buffer_with("abc", 4);
    let gap = buffer.gap_len();
    assert!(!buffer.delete_forward());
    assert_eq!(buffer.gap_len(), gap);
    assert_eq!(content(&buffer), "abc");
}

#[test]
fn test_delete_backward_at_start_is_noop() {
    let mut buffer = buffer_with("abc", 4);
    buffer.move_cursor(-3);
    assert!(!buffer.delete_backward());
    assert_eq!(buffer.cursor(), 0);
    assert_eq!(content(&buffer), "abc");
}

#[test]
fn test_move_clamps_both_ways() {
    let mut buffer = buffer_with("abc", 4);
    assert_eq!(buffer.move_cursor(isize::MIN), 3);
    assert_eq!(buffer.cursor(), 0);
    assert_eq!(buffer.move_cursor(isize::MAX), 3);
    assert_eq!(buffer.cursor(), 3);
}

#[test]
fn test_deleted_units_are_not_read_back() {
    let mut buffer = buffer_with("abcdef", 8);
    buffer.move_cursor(-3);
    buffer.delete_forward();
    buffer.delete_backward();
    assert_eq!(content(&buffer), "abef");
    assert_eq!(buffer.front_segment(), b"ab");
    assert_eq!(buffer.back_segment(), b"ef");
    assert_eq!(buffer.get(2), Some(b'e'));
    assert_eq!(buffer.get(4), None);
}

#[test]
fn test_empty_run_leaves_state_untouched() {
    let mut buffer = GapBuffer::with_capacity(1).unwrap();
    buffer.insert(b'x').unwrap();
    buffer.insert_slice(b"").unwrap();
    assert_eq!(buffer.capacity(), 1);
    assert_eq!(buffer.cursor(), 1);
}

#[test]
fn test_capacity_never_shrinks() {
    let mut buffer = buffer_with("a long enough line of text", 2);
    let capacity = buffer.capacity();
    while buffer.delete_backward() {}
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), capacity);
}
