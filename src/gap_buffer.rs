//! Gap buffer storage engine
//!
//! Stores raw byte units in one contiguous allocation with an unused "gap"
//! parked at the cursor:
//!
//! ```text
//!  storage: [ front segment | gap (garbage) | back segment ]
//!            0..front         front..front+gap  front+gap..total
//! ```
//!
//! The logical content is the front segment followed by the back segment.
//! Inserting at the cursor writes into the gap, deleting widens it, and moving
//! the cursor copies units across the gap. Capacity only grows, always by
//! doubling, so N insertions cost O(N) copying in total.

use std::fmt;
use std::io::{self, Write};

/// Errors raised by the gap buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapBufferError {
    /// Backing storage of `requested` slots could not be obtained
    AllocationFailure { requested: usize },
}

impl fmt::Display for GapBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { requested } => {
                write!(f, "failed to allocate gap buffer storage of {} slots", requested)
            }
        }
    }
}

impl std::error::Error for GapBufferError {}

/// One logical unit together with where it lives in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Index into the backing storage
    pub physical: usize,
    /// Offset into the logical content
    pub logical: usize,
    pub unit: u8,
}

/// Single-cursor gap buffer over byte units.
///
/// The cursor always sits at the start of the gap, so `cursor() == front`.
#[derive(Clone)]
pub struct GapBuffer {
    storage: Vec<u8>,
    front: usize,
    gap: usize,
}

fn allocate(total: usize) -> Result<Vec<u8>, GapBufferError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(total)
        .map_err(|_| GapBufferError::AllocationFailure { requested: total })?;
    storage.resize(total, 0);
    Ok(storage)
}

impl GapBuffer {
    /// Create an empty buffer. A capacity of zero is bumped to one slot.
    pub fn with_capacity(capacity: usize) -> Result<Self, GapBufferError> {
        let total = capacity.max(1);
        let storage = allocate(total)?;
        Ok(Self {
            storage,
            front: 0,
            gap: total,
        })
    }

    /// Logical cursor offset (number of units before the gap)
    #[inline]
    pub fn cursor(&self) -> usize {
        self.front
    }

    /// Allocated slots, including the gap
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Unused slots at the cursor
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap
    }

    /// Logical units after the cursor
    #[inline]
    pub fn back_len(&self) -> usize {
        self.storage.len() - self.front - self.gap
    }

    /// Logical length of the content
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len() - self.gap
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical index where the back segment starts
    #[inline]
    fn back_start(&self) -> usize {
        self.front + self.gap
    }

    /// Content before the cursor
    pub fn front_segment(&self) -> &[u8] {
        &self.storage[..self.front]
    }

    /// Content after the cursor
    pub fn back_segment(&self) -> &[u8] {
        &self.storage[self.back_start()..]
    }

    /// Unit at a logical offset, `None` past the end of content
    pub fn get(&self, logical: usize) -> Option<u8> {
        if logical < self.front {
            Some(self.storage[logical])
        } else if logical < self.len() {
            Some(self.storage[logical + self.gap])
        } else {
            None
        }
    }

    /// Every logical unit in order, front segment first, with its physical slot
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let gap = self.gap;
        let front = self.front_segment().iter().enumerate().map(|(i, &unit)| Cell {
            physical: i,
            logical: i,
            unit,
        });
        let base = self.front;
        let back = self.back_segment().iter().enumerate().map(move |(i, &unit)| Cell {
            physical: base + gap + i,
            logical: base + i,
            unit,
        });
        front.chain(back)
    }

    /// Grow by doubling until the gap holds at least `needed` units.
    ///
    /// The slots added by growth join the gap; the back segment is moved so
    /// that it keeps its distance from the end of storage.
    fn reserve_gap(&mut self, needed: usize) -> Result<(), GapBufferError> {
        if self.gap >= needed {
            return Ok(());
        }

        let old_total = self.storage.len();
        let mut new_total = old_total;
        while new_total - old_total + self.gap < needed {
            new_total = new_total
                .checked_mul(2)
                .ok_or(GapBufferError::AllocationFailure {
                    requested: usize::MAX,
                })?;
        }

        let added = new_total - old_total;
        self.storage
            .try_reserve_exact(added)
            .map_err(|_| GapBufferError::AllocationFailure {
                requested: new_total,
            })?;
        self.storage.resize(new_total, 0);

        let back_start = self.back_start();
        self.storage
            .copy_within(back_start..old_total, back_start + added);
        self.gap += added;

        tracing::debug!(
            old_total,
            new_total,
            front = self.front,
            gap = self.gap,
            "gap buffer grew"
        );
        Ok(())
    }

    /// Insert one unit at the cursor and advance past it
    pub fn insert(&mut self, unit: u8) -> Result<(), GapBufferError> {
        self.reserve_gap(1)?;
        self.storage[self.front] = unit;
        self.front += 1;
        self.gap -= 1;
        Ok(())
    }

    /// Insert a run of units at the cursor, growing at most once
    pub fn insert_slice(&mut self, units: &[u8]) -> Result<(), GapBufferError> {
        if units.is_empty() {
            return Ok(());
        }
        self.reserve_gap(units.len())?;
        let end = self.front + units.len();
        self.storage[self.front..end].copy_from_slice(units);
        self.front = end;
        self.gap -= units.len();
        Ok(())
    }

    /// Move the cursor by `delta` units, clamped to the content.
    ///
    /// Returns how far the cursor actually moved.
    pub fn move_cursor(&mut self, delta: isize) -> usize {
        let front = self.front;
        let back_start = self.back_start();
        if delta < 0 {
            let n = delta.unsigned_abs().min(front);
            self.storage.copy_within(front - n..front, back_start - n);
            self.front -= n;
            n
        } else {
            let n = delta.unsigned_abs().min(self.back_len());
            self.storage.copy_within(back_start..back_start + n, front);
            self.front += n;
            n
        }
    }

    /// Move the cursor one unit left. Returns false at the start of content.
    pub fn step_backward(&mut self) -> bool {
        if self.front == 0 {
            return false;
        }
        let dst = self.back_start() - 1;
        self.storage[dst] = self.storage[self.front - 1];
        self.front -= 1;
        true
    }

    /// Move the cursor one unit right. Returns false at the end of content.
    pub fn step_forward(&mut self) -> bool {
        if self.back_len() == 0 {
            return false;
        }
        let src = self.back_start();
        self.storage[self.front] = self.storage[src];
        self.front += 1;
        true
    }

    /// Delete the unit after the cursor. Returns false at the end of content.
    pub fn delete_forward(&mut self) -> bool {
        if self.back_len() == 0 {
            return false;
        }
        self.gap += 1;
        true
    }

    /// Delete the unit before the cursor. Returns false at the start of content.
    pub fn delete_backward(&mut self) -> bool {
        if self.front == 0 {
            return false;
        }
        self.front -= 1;
        self.gap += 1;
        true
    }

    /// Logical content as an owned vector
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.front_segment());
        out.extend_from_slice(self.back_segment());
        out
    }

    /// Write the logical content to `out`
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.front_segment())?;
        out.write_all(self.back_segment())
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapBuffer")
            .field("front", &self.front)
            .field("gap", &self.gap)
            .field("total", &self.storage.len())
            .field("content", &String::from_utf8_lossy(&self.to_vec()))
            .finish()
    }
}
