// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content buffers.
//!
//! A text widget owns one buffer exclusively. Drawers only ever see it through
//! [`Reader`], borrowed for the duration of a single query.

use alloc::vec::Vec;
use core::fmt;

/// Errors from buffer reads and edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// An offset past the end of the buffer.
    #[error("offset {offset} is out of bounds for length {len}")]
    OutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },
    /// A range that is reversed or extends past the end of the buffer.
    #[error("range {start}..{end} is invalid for length {len}")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },
}

/// Read access to a linear byte buffer.
pub trait Reader {
    /// Number of bytes in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns up to `n` bytes starting at `offset`.
    ///
    /// The result is shorter than `n` when the buffer ends first. An `offset`
    /// equal to the length yields an empty slice.
    fn read_n_slice_at(&self, offset: usize, n: usize) -> Result<&[u8], BufferError>;
}

/// Edit access to a linear byte buffer.
pub trait Writer {
    /// Inserts `data` before the byte at `offset`.
    fn insert(&mut self, offset: usize, data: &[u8]) -> Result<(), BufferError>;

    /// Deletes the bytes in `start..end`.
    fn delete(&mut self, start: usize, end: usize) -> Result<(), BufferError>;
}

/// A buffer that can be both read and edited.
pub trait ReadWriter: Reader + Writer {}

impl<T: Reader + Writer + ?Sized> ReadWriter for T {}

/// A [`ReadWriter`] over a contiguous `Vec<u8>`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BytesReadWriter {
    bytes: Vec<u8>,
}

impl BytesReadWriter {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// The whole content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for BytesReadWriter {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&str> for BytesReadWriter {
    fn from(s: &str) -> Self {
        Self {
            bytes: s.as_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for BytesReadWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesReadWriter")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl Reader for BytesReadWriter {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read_n_slice_at(&self, offset: usize, n: usize) -> Result<&[u8], BufferError> {
        let len = self.bytes.len();
        if offset > len {
            return Err(BufferError::OutOfBounds { offset, len });
        }
        let end = offset.saturating_add(n).min(len);
        Ok(&self.bytes[offset..end])
    }
}

impl Writer for BytesReadWriter {
    fn insert(&mut self, offset: usize, data: &[u8]) -> Result<(), BufferError> {
        let len = self.bytes.len();
        if offset > len {
            return Err(BufferError::OutOfBounds { offset, len });
        }
        self.bytes.splice(offset..offset, data.iter().copied());
        Ok(())
    }

    fn delete(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.bytes.len();
        if start > end || end > len {
            return Err(BufferError::InvalidRange { start, end, len });
        }
        self.bytes.drain(start..end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferError, BytesReadWriter, Reader, Writer};

    #[test]
    fn reads_are_clamped_to_the_end() {
        let b = BytesReadWriter::from("hello");
        assert_eq!(b.read_n_slice_at(1, 3).unwrap(), b"ell");
        assert_eq!(b.read_n_slice_at(3, 100).unwrap(), b"lo");
        assert_eq!(b.read_n_slice_at(5, 1).unwrap(), b"");
        assert_eq!(
            b.read_n_slice_at(6, 1),
            Err(BufferError::OutOfBounds { offset: 6, len: 5 })
        );
    }

    #[test]
    fn insert_and_delete_edit_in_place() {
        let mut b = BytesReadWriter::from("held");
        b.insert(3, b"lo wor").unwrap();
        assert_eq!(b.as_bytes(), b"hello world");
        b.delete(0, 6).unwrap();
        assert_eq!(b.as_bytes(), b"world");
        b.insert(5, b"!").unwrap();
        assert_eq!(b.as_bytes(), b"world!");
    }

    #[test]
    fn bad_positions_leave_the_buffer_alone() {
        let mut b = BytesReadWriter::from("abc");
        assert_eq!(
            b.insert(4, b"x"),
            Err(BufferError::OutOfBounds { offset: 4, len: 3 })
        );
        assert_eq!(
            b.delete(2, 1),
            Err(BufferError::InvalidRange {
                start: 2,
                end: 1,
                len: 3
            })
        );
        assert_eq!(
            b.delete(0, 4),
            Err(BufferError::InvalidRange {
                start: 0,
                end: 4,
                len: 3
            })
        );
        assert_eq!(b.as_bytes(), b"abc");
    }
}
