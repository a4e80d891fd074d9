//! Buffer traits for little-endian scalar access.
//!
//! This module provides:
//! - [`ReadBuffer`] trait for read-only buffer access
//! - [`WriteBuffer`] trait for read-write buffer access
//!
//! Scalars are addressed by offset and byte width instead of by Rust type,
//! since the widths come from the primitive registry at run time.

use crate::types::PrimitiveType;
use crate::value::Scalar;

/// Trait for read-only buffer access.
///
/// All read methods use little-endian byte order.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize;

    /// Returns true if the buffer is empty.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads an unsigned little-endian integer of `width` bytes (at most 8).
    ///
    /// # Arguments
    /// * `offset` - Byte offset to read from
    /// * `width` - Number of bytes to read
    #[inline]
    fn get_uint_le(&self, offset: usize, width: usize) -> u64 {
        self.get_bytes(offset, width)
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (i * 8)))
    }

    /// Reads a primitive's bit pattern and interprets it per its representation.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to read from
    /// * `primitive` - Registered primitive describing width and representation
    #[inline]
    fn get_scalar(&self, offset: usize, primitive: &PrimitiveType) -> Scalar {
        let bits = self.get_uint_le(offset, primitive.byte_width);
        Scalar::from_bits(bits, primitive.repr, primitive.byte_width)
    }

    /// Returns a slice of bytes at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to read
    #[inline(always)]
    fn get_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.as_slice()[offset..offset + len]
    }
}

/// Trait for read-write buffer access.
///
/// All write methods use little-endian byte order.
pub trait WriteBuffer: ReadBuffer {
    /// Returns the buffer as a mutable byte slice.
    fn as_mut_slice(&mut self) -> &mut [u8];

    /// Writes the low `width` bytes of `value`, least significant byte first.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `width` - Number of bytes to write
    /// * `value` - Bit pattern to write
    #[inline]
    fn put_uint_le(&mut self, offset: usize, width: usize, value: u64) {
        let bytes = value.to_le_bytes();
        self.as_mut_slice()[offset..offset + width].copy_from_slice(&bytes[..width]);
    }
}

/// Implement ReadBuffer for byte slices.
impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}

/// Implement WriteBuffer for byte slices.
impl WriteBuffer for [u8] {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}

/// Implement ReadBuffer for `Vec<u8>`.
impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Implement WriteBuffer for `Vec<u8>`.
impl WriteBuffer for Vec<u8> {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}
