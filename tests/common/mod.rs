//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use gapvis::script::FrameSink;
use gapvis::GapBuffer;

/// Plain vector plus cursor index, the obvious way to store editable text
#[derive(Debug, Clone, Default)]
pub struct ModelBuffer {
    pub text: Vec<u8>,
    pub cursor: usize,
}

impl ModelBuffer {
    pub fn insert(&mut self, unit: u8) {
        self.text.insert(self.cursor, unit);
        self.cursor += 1;
    }

    pub fn insert_slice(&mut self, units: &[u8]) {
        for &unit in units {
            self.insert(unit);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, self.text.len() as isize) as usize;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn delete_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }
}

/// Small deterministic xorshift generator so failures reproduce
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish value in `0..bound`
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    pub fn unit(&mut self) -> u8 {
        b'a' + self.below(26) as u8
    }
}

/// Buffer holding `text` with the cursor at the end
pub fn buffer_with(text: &str, capacity: usize) -> GapBuffer {
    let mut buffer = GapBuffer::with_capacity(capacity).unwrap();
    buffer.insert_slice(text.as_bytes()).unwrap();
    buffer
}

pub fn content(buffer: &GapBuffer) -> String {
    String::from_utf8(buffer.to_vec()).unwrap()
}

pub fn assert_invariants(buffer: &GapBuffer) {
    assert!(
        buffer.cursor() + buffer.gap_len() <= buffer.capacity(),
        "front + gap exceeds total: {:?}",
        buffer
    );
    assert_eq!(
        buffer.cursor() + buffer.back_len(),
        buffer.capacity() - buffer.gap_len()
    );
    assert_eq!(buffer.len(), buffer.front_segment().len() + buffer.back_segment().len());
}

/// Records text, cursor and capacity for every frame
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<(String, usize, usize)>,
}

impl FrameSink for FrameLog {
    fn frame(&mut self, buffer: &GapBuffer) -> anyhow::Result<()> {
        assert_invariants(buffer);
        self.frames
            .push((content(buffer), buffer.cursor(), buffer.capacity()));
        Ok(())
    }
}
