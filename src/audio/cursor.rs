//! Read position over the compressed input.

use crate::error::{Error, Result};

/// Tracks the unconsumed tail of an immutable compressed stream.
///
/// The remaining length only ever shrinks, by exactly the byte length of
/// each frame the decoder reports.
#[derive(Debug, Clone)]
pub struct StreamCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> StreamCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The unconsumed byte range, handed to the decoder.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.data.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn advance(&mut self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::CursorUnderflow {
                requested: n,
                remaining,
            });
        }
        self.position += n;
        Ok(())
    }
}
