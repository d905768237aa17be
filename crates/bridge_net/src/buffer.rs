//! Fixed-width binary buffer.
//!
//! All binary formats on the control channel are built from the same
//! primitives: little-endian integers and floats, `u8` booleans, and strings
//! carried as a `u32` byte length followed by UTF-8 bytes.

use bridge_component::Entity;
use glam::Vec2;

use crate::error::WireError;

/// Appends primitives to a growable byte buffer.
#[derive(Debug, Default, Clone)]
pub struct DataWriter {
    buffer: Vec<u8>,
}

impl DataWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create an empty writer with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a string as `u32` byte length + UTF-8 bytes.
    ///
    /// Strings longer than `u32::MAX` bytes are truncated at a character
    /// boundary.
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        let mut end = value.len().min(u32::MAX as usize);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        self.write_u32(end as u32);
        self.buffer.extend_from_slice(&value.as_bytes()[..end]);
        self
    }

    /// Write a position as two `f32`.
    pub fn write_vec2(&mut self, value: Vec2) -> &mut Self {
        self.write_f32(value.x).write_f32(value.y)
    }

    /// Write an entity handle as its raw `u64`.
    pub fn write_entity(&mut self, entity: Entity) -> &mut Self {
        self.write_u64(entity.id())
    }

    /// Write an optional entity, with `0` meaning `None`.
    pub fn write_opt_entity(&mut self, entity: Option<Entity>) -> &mut Self {
        self.write_u64(entity.map_or(0, Entity::id))
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the writer and return the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Reads primitives from a byte slice, front to back.
#[derive(Debug)]
pub struct DataReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> DataReader<'a> {
    /// Start reading at the beginning of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], WireError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(WireError::UnexpectedEof { needed, remaining });
        }
        let slice = &self.bytes[self.cursor..self.cursor + needed];
        self.cursor += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes(self.take_array()?))
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// NaN and infinities are rejected.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        let value = f32::from_le_bytes(self.take_array()?);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(WireError::NonFinite)
        }
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| WireError::InvalidUtf8)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2, WireError> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        Ok(Vec2::new(x, y))
    }

    /// Read an entity handle. A zero reads as [`Entity::INVALID`].
    pub fn read_entity(&mut self) -> Result<Entity, WireError> {
        Ok(Entity::from_raw(self.read_u64()?))
    }

    /// Read an optional entity, with `0` meaning `None`.
    pub fn read_opt_entity(&mut self) -> Result<Option<Entity>, WireError> {
        Ok(Entity::from_wire(self.read_u64()?))
    }

    /// Fail if any bytes are left unread.
    pub fn finish(self) -> Result<(), WireError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut w = DataWriter::new();
        w.write_u16(0x0102).write_i32(-2);
        assert_eq!(w.into_bytes(), vec![0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_string_is_length_prefixed() {
        let mut w = DataWriter::new();
        w.write_str("hail");
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..4], &[4, 0, 0, 0]);
        assert_eq!(&bytes[4..], b"hail");

        let mut r = DataReader::new(&bytes);
        assert_eq!(r.read_string().unwrap(), "hail");
        assert!(r.finish().is_ok());
    }

    #[test]
    fn test_truncated_read_reports_eof() {
        let mut r = DataReader::new(&[1, 2]);
        assert_eq!(
            r.read_f32(),
            Err(WireError::UnexpectedEof {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_string_length_beyond_buffer() {
        let mut w = DataWriter::new();
        w.write_u32(100).write_u8(b'x');
        let bytes = w.into_bytes();
        let mut r = DataReader::new(&bytes);
        assert!(matches!(
            r.read_string(),
            Err(WireError::UnexpectedEof { needed: 100, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [2, 0, 0, 0, 0xC3, 0x28];
        let mut r = DataReader::new(&bytes);
        assert_eq!(r.read_string(), Err(WireError::InvalidUtf8));
    }

    #[test]
    fn test_optional_entity_zero_is_none() {
        let mut w = DataWriter::new();
        w.write_opt_entity(None).write_opt_entity(Some(Entity(9)));
        let bytes = w.into_bytes();
        let mut r = DataReader::new(&bytes);
        assert_eq!(r.read_opt_entity().unwrap(), None);
        assert_eq!(r.read_opt_entity().unwrap(), Some(Entity(9)));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut w = DataWriter::new();
        w.write_f32(f32::NAN).write_f32(f32::INFINITY).write_vec2(Vec2::new(1.0, f32::NEG_INFINITY));
        let bytes = w.into_bytes();
        let mut r = DataReader::new(&bytes);
        assert_eq!(r.read_f32(), Err(WireError::NonFinite));
        assert_eq!(r.read_f32(), Err(WireError::NonFinite));
        assert_eq!(r.read_vec2(), Err(WireError::NonFinite));
    }

    #[test]
    fn test_trailing_bytes_detected() {
        let r = DataReader::new(&[0, 0]);
        assert_eq!(r.finish(), Err(WireError::TrailingBytes(2)));
    }
}
