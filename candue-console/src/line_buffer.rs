//! Accumulation of received bytes into a command line

use heapless::Vec;

/// Size of the command line buffer
pub const LINE_CAPACITY: usize = 80;
/// The longest line which is passed on for processing
///
/// The final slot of the buffer is reserved, so the write cursor never moves past it.
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// What to do with bytes which arrive once the line is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the excess bytes, keeping the start of the line
    #[default]
    DropExcess,
    /// Replace the last byte in the line with each excess byte
    OverwriteLast,
}

/// A bounded command line with a write cursor
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buf: Vec<u8, LINE_CAPACITY>,
    policy: OverflowPolicy,
}

impl LineBuffer {
    /// Create an empty line with the given overflow policy
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            buf: Vec::new(),
            policy,
        }
    }

    /// Append a byte at the cursor
    ///
    /// Overflow is silent, and handled according to the policy.
    pub fn push(&mut self, byte: u8) {
        if self.buf.len() < MAX_LINE_LEN {
            // Cannot fail, the length was checked above
            self.buf.push(byte).ok();
        } else if self.policy == OverflowPolicy::OverwriteLast {
            if let Some(last) = self.buf.last_mut() {
                *last = byte;
            }
        }
    }

    /// The cursor position, which is also the length of the line
    pub fn cursor(&self) -> usize {
        self.buf.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The bytes received so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Reset the cursor to the start of the line
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Remove the completed line, leaving the buffer empty
    pub fn take(&mut self) -> Vec<u8, LINE_CAPACITY> {
        core::mem::take(&mut self.buf)
    }

    /// The overflow policy in use
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
