//! Run-length scanline buffers
//!
//! A scanline buffer describes an arbitrary filled shape as a list of 1-D
//! segments, one per line. Each segment is stored as two consecutive words
//! `(offset, length)` in a block borrowed from the [`MemoryPool`], so no
//! heap is needed no matter how many shapes are drawn over time.
//!
//! The buffer owns its block for its whole lifetime and hands it back on
//! drop. If the pool is exhausted at construction the buffer stays unowned
//! and every operation reports [`ScanlineError::PoolExhausted`] without
//! touching anything.

use core::cell::Cell;

use crate::pool::{BlockHandle, MemoryPool, PoolError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which axis a segment spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Segments run along X, one line per row
    Horizontal,
    /// Segments run along Y, one line per column
    #[default]
    Vertical,
}

/// Order in which line indices are assigned while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// First stored segment lands on line 0
    #[default]
    Forward,
    /// First stored segment lands on the last line
    Reverse,
}

/// One run: `length` pixels starting `offset` pixels from the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub offset: u16,
    pub length: u16,
}

impl Segment {
    /// Create a new segment
    pub const fn new(offset: u16, length: u16) -> Self {
        Self { offset, length }
    }
}

/// Scanline buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanlineError {
    /// The buffer never got a block from the pool
    PoolExhausted,
    /// The owned block is full; the segment was dropped
    BufferOverflow,
}

impl From<PoolError> for ScanlineError {
    fn from(e: PoolError) -> Self {
        match e {
            PoolError::Exhausted => ScanlineError::PoolExhausted,
        }
    }
}

/// Words used by one stored segment
const SEGMENT_WORDS: usize = 2;

/// Segment list stored in a single pool block
///
/// Not `Clone`: copying a buffer would duplicate block ownership.
pub struct ScanlineBuffer<'p, const BLOCKS: usize, const WORDS: usize> {
    block: Option<BlockHandle<'p, BLOCKS, WORDS>>,
    orientation: Orientation,
    origin_x: u16,
    origin_y: u16,
    /// Word offset of the next free slot in the block
    cursor: usize,
}

impl<'p, const BLOCKS: usize, const WORDS: usize> ScanlineBuffer<'p, BLOCKS, WORDS> {
    /// Create a buffer, claiming one block from `pool`
    ///
    /// Never fails: when the pool is exhausted the buffer is left unowned
    /// and degrades to a no-op. Check [`is_allocated`](Self::is_allocated)
    /// to tell the two apart.
    pub fn new(pool: &'p MemoryPool<BLOCKS, WORDS>) -> Self {
        Self {
            block: pool.acquire_block().ok(),
            orientation: Orientation::default(),
            origin_x: 0,
            origin_y: 0,
            cursor: 0,
        }
    }

    /// Create a buffer with the given orientation
    pub fn with_orientation(pool: &'p MemoryPool<BLOCKS, WORDS>, orientation: Orientation) -> Self {
        let mut buffer = Self::new(pool);
        buffer.orientation = orientation;
        buffer
    }

    /// Check whether the buffer owns a block
    pub fn is_allocated(&self) -> bool {
        self.block.is_some()
    }

    /// Index of the owned block, if any
    pub fn block_index(&self) -> Option<usize> {
        self.block.as_ref().map(BlockHandle::index)
    }

    /// Segment orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Set the segment orientation
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Logical anchor set by the caller
    pub fn origin(&self) -> (u16, u16) {
        (self.origin_x, self.origin_y)
    }

    /// Set the logical anchor used by anchored renders
    pub fn set_origin(&mut self, x: u16, y: u16) {
        self.origin_x = x;
        self.origin_y = y;
    }

    /// Append a segment
    ///
    /// No bounds checking against the screen is done; keeping
    /// `offset + length` on the panel is the caller's job.
    pub fn append(&mut self, offset: u16, length: u16) -> Result<(), ScanlineError> {
        let Some(words) = self.words() else {
            return Err(ScanlineError::PoolExhausted);
        };

        if self.cursor + SEGMENT_WORDS > WORDS {
            #[cfg(feature = "defmt")]
            defmt::debug!("scanline full at {} words, segment dropped", self.cursor);
            return Err(ScanlineError::BufferOverflow);
        }

        words[self.cursor].set(offset);
        words[self.cursor + 1].set(length);
        self.cursor += SEGMENT_WORDS;
        Ok(())
    }

    /// Append a segment value
    pub fn push(&mut self, segment: Segment) -> Result<(), ScanlineError> {
        self.append(segment.offset, segment.length)
    }

    /// Discard all segments, keeping the block
    pub fn reset(&mut self) -> Result<(), ScanlineError> {
        if self.block.is_none() {
            return Err(ScanlineError::PoolExhausted);
        }
        self.cursor = 0;
        Ok(())
    }

    /// Word offset of the next free slot
    pub fn write_cursor(&self) -> usize {
        self.cursor
    }

    /// Words available in the owned block (0 when unowned)
    pub fn capacity_words(&self) -> usize {
        if self.is_allocated() {
            WORDS
        } else {
            0
        }
    }

    /// Number of stored segments
    pub fn segment_count(&self) -> usize {
        self.cursor / SEGMENT_WORDS
    }

    /// Check whether no segments are stored
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Iterate stored segments in insertion order
    pub fn segments(&self) -> Segments<'_> {
        let words: &[Cell<u16>] = match self.words() {
            Some(words) => &words[..self.cursor],
            None => &[],
        };
        Segments { words }
    }

    fn words(&self) -> Option<&'p [Cell<u16>; WORDS]> {
        self.block.as_ref().map(BlockHandle::words)
    }
}

impl<const BLOCKS: usize, const WORDS: usize> Drop for ScanlineBuffer<'_, BLOCKS, WORDS> {
    fn drop(&mut self) {
        if let Some(handle) = self.block.take() {
            handle.release();
        }
    }
}

impl<const BLOCKS: usize, const WORDS: usize> core::fmt::Debug
    for ScanlineBuffer<'_, BLOCKS, WORDS>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScanlineBuffer")
            .field("block", &self.block_index())
            .field("orientation", &self.orientation)
            .field("origin", &self.origin())
            .field("segments", &self.segment_count())
            .finish()
    }
}

/// Read-only traversal of a buffer's segments
#[derive(Clone)]
pub struct Segments<'a> {
    words: &'a [Cell<u16>],
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        match self.words {
            [offset, length, rest @ ..] => {
                self.words = rest;
                Some(Segment::new(offset.get(), length.get()))
            }
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.words.len() / SEGMENT_WORDS;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Segments<'_> {}
