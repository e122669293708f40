//! Fixed-capacity render queue
//!
//! CPU-side staging for the render queue storage buffer. A frame goes through
//! `Idle -> Writing -> Published`:
//! - `begin` resets the write cursor and opens the queue for writing
//! - `submit` encodes one entity into the next slot
//! - `end` closes the queue; the first `len()` records are now valid for the
//!   GPU program until the next `begin`
//!
//! Reading is only allowed while Published and writing only while Writing.
//! Any other order is a programming error and is reported as
//! `RenderError::AccessOrder` without touching the buffer.

use super::encode::encode;
use super::gpu_types::QueueRecord;
use crate::consts::MAX_RENDER_QUEUE;
use crate::error::RenderError;
use crate::scene::{Renderable, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Writing,
    Published,
}

pub struct RenderQueue {
    /// Always `capacity` long; slots past the cursor are zeroed
    records: Vec<QueueRecord>,
    cursor: usize,
    state: QueueState,
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RENDER_QUEUE)
    }

    /// Queue holding `capacity` records, clamped to `1..=MAX_RENDER_QUEUE`
    pub fn with_capacity(capacity: usize) -> Self {
        let clamped = capacity.clamp(1, MAX_RENDER_QUEUE);
        if clamped != capacity {
            log::warn!(
                "Render queue capacity {} out of range, using {}",
                capacity,
                clamped
            );
        }
        Self {
            records: vec![QueueRecord::EMPTY; clamped],
            cursor: 0,
            state: QueueState::Idle,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn state(&self) -> QueueState {
        self.state
    }

    /// Records written so far this frame
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Open the queue for a new frame.
    ///
    /// Calling this again before `end` discards what was written so far and
    /// starts over from slot 0.
    pub fn begin(&mut self) {
        if self.state == QueueState::Writing {
            log::warn!(
                "Render queue begin without end, discarding {} records",
                self.cursor
            );
        }
        self.clear_written();
        self.state = QueueState::Writing;
    }

    /// Encode one entity into the next free slot
    pub fn submit(&mut self, transform: &Transform, renderable: &Renderable) -> Result<(), RenderError> {
        self.expect_state("submit", QueueState::Writing)?;
        if self.cursor >= self.capacity() {
            return Err(RenderError::QueueFull {
                capacity: self.capacity(),
            });
        }
        self.records[self.cursor] = encode(transform, renderable)?;
        self.cursor += 1;
        Ok(())
    }

    /// Close the queue; returns the number of valid records
    pub fn end(&mut self) -> Result<u32, RenderError> {
        self.expect_state("end", QueueState::Writing)?;
        self.state = QueueState::Published;
        Ok(self.cursor as u32)
    }

    /// Drop a half-written frame. Nothing is published.
    pub fn abort(&mut self) {
        if self.state == QueueState::Writing {
            self.clear_written();
            self.state = QueueState::Idle;
        }
    }

    /// Consumer is done with the published frame
    pub fn release(&mut self) -> Result<(), RenderError> {
        self.expect_state("release", QueueState::Published)?;
        self.state = QueueState::Idle;
        Ok(())
    }

    /// Valid records of the published frame
    pub fn published(&self) -> Result<&[QueueRecord], RenderError> {
        self.expect_state("read", QueueState::Published)?;
        Ok(&self.records[..self.cursor])
    }

    /// Whole buffer as uploaded to the GPU (all `capacity` slots)
    pub fn gpu_bytes(&self) -> Result<&[u8], RenderError> {
        self.expect_state("read", QueueState::Published)?;
        Ok(bytemuck::cast_slice(&self.records))
    }

    /// Begin and hand out a scoped writer
    pub fn writer(&mut self) -> QueueWriter<'_> {
        self.begin();
        QueueWriter {
            queue: self,
            finished: false,
        }
    }

    fn clear_written(&mut self) {
        self.records[..self.cursor].fill(QueueRecord::EMPTY);
        self.cursor = 0;
    }

    fn expect_state(&self, operation: &'static str, expected: QueueState) -> Result<(), RenderError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RenderError::AccessOrder {
                operation,
                state: self.state,
            })
        }
    }
}

/// Write access to a `RenderQueue` between begin and end.
///
/// Dropping the writer without calling `finish` (an early `?` return, a panic)
/// aborts the frame and leaves the queue Idle, so it is never stuck in the
/// Writing state.
pub struct QueueWriter<'a> {
    queue: &'a mut RenderQueue,
    finished: bool,
}

impl QueueWriter<'_> {
    pub fn submit(&mut self, transform: &Transform, renderable: &Renderable) -> Result<(), RenderError> {
        self.queue.submit(transform, renderable)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.queue.capacity() - self.queue.len()
    }

    /// End the frame and publish it
    pub fn finish(mut self) -> Result<u32, RenderError> {
        self.finished = true;
        self.queue.end()
    }
}

impl Drop for QueueWriter<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!(
                "Render queue write aborted after {} records",
                self.queue.len()
            );
            self.queue.abort();
        }
    }
}
