//! Shared serialize/deserialize/size/describe capability.

use std::fmt;

use crate::{Cursor, errors::Result};

/// A structure with a fixed on-wire layout.
///
/// `Display` is the describe operation: a diagnostic rendering of every
/// field, never parsed back.
///
/// # Invariants
///
/// - `serialized_size` depends only on the concrete type, never on field
///   values.
/// - `serialize` writes the fields in wire order starting at the cursor
///   position and fails before touching the buffer if fewer than
///   `serialized_size` bytes remain.
/// - `deserialize` reads the same fields with the same widths and returns the
///   decoded value with the number of bytes the structure occupies.
pub trait WireFormat: Sized + fmt::Display {
    /// Bytes this value occupies once serialized
    fn serialized_size(&self) -> usize;

    /// Write this value at the cursor position.
    ///
    /// # Errors
    ///
    /// [`crate::ProtocolError::BufferTooShort`] if the cursor has less than
    /// `serialized_size` bytes left.
    fn serialize<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()>;

    /// Read a value at the cursor position.
    ///
    /// Returns the value and the number of bytes it occupies.
    ///
    /// # Errors
    ///
    /// [`crate::ProtocolError::BufferTooShort`] if the buffer ends inside the
    /// structure. Dispatching decoders also report unknown discriminators.
    fn deserialize<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<(Self, usize)>;
}

/// Widen a flag to its 16-bit wire slot.
pub(crate) fn flag_to_wire(flag: bool) -> u16 {
    u16::from(flag)
}

/// Any non-zero wire value reads back as set.
pub(crate) fn flag_from_wire(raw: u16) -> bool {
    raw != 0
}
