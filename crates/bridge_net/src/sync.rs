//! Server → client binary sync: the custom-function catalog and one-shot
//! directives.
//!
//! The catalog is always sent whole. Clients replace their copy on every
//! message, so a dropped update heals itself with the next change.

use bridge_component::{CrewPosition, CustomFunctionType};

use crate::buffer::{DataReader, DataWriter};
use crate::error::WireError;

/// One scripted crew-station affordance as seen by clients.
///
/// The callback stays on the server; clients only learn enough to draw the
/// control and send back its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFunctionEntry {
    pub kind: CustomFunctionType,
    pub crew_position: CrewPosition,
    pub name: String,
    pub caption: String,
}

impl CustomFunctionEntry {
    fn write(&self, w: &mut DataWriter) {
        w.write_u8(self.kind.to_wire())
            .write_u8(self.crew_position.to_wire())
            .write_str(&self.name)
            .write_str(&self.caption);
    }

    fn read(r: &mut DataReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            kind: CustomFunctionType::try_from(r.read_u8()?)?,
            crew_position: CrewPosition::try_from(r.read_u8()?)?,
            name: r.read_string()?,
            caption: r.read_string()?,
        })
    }
}

/// Encode the full catalog: `u32` count, then each entry as
/// `u8 type, u8 crewPosition, string name, string caption`.
#[must_use]
pub fn encode_custom_functions(entries: &[CustomFunctionEntry]) -> Vec<u8> {
    let mut w = DataWriter::with_capacity(4 + entries.len() * 24);
    w.write_u32(entries.len() as u32);
    for entry in entries {
        entry.write(&mut w);
    }
    w.into_bytes()
}

/// Decode a full catalog written by [`encode_custom_functions`].
///
/// # Errors
///
/// Returns [`WireError`] on truncated data, bad enum bytes or trailing bytes.
pub fn decode_custom_functions(bytes: &[u8]) -> Result<Vec<CustomFunctionEntry>, WireError> {
    let mut r = DataReader::new(bytes);
    let count = r.read_u32()? as usize;
    // Every entry is at least 10 bytes, so a forged count cannot force a huge
    // allocation.
    let mut entries = Vec::with_capacity(count.min(r.remaining() / 10));
    for _ in 0..count {
        entries.push(CustomFunctionEntry::read(&mut r)?);
    }
    r.finish()?;
    Ok(entries)
}

/// A one-shot instruction from the server to the clients of one ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerDirective {
    /// Play a sound on the ship's main screen.
    PlaySound(String),
}

impl ServerDirective {
    /// Directive tag for [`ServerDirective::PlaySound`].
    pub const PLAY_CLIENT_SOUND: u16 = 0x0001;

    /// Encode as `u16 tag` + payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = DataWriter::new();
        match self {
            ServerDirective::PlaySound(name) => {
                w.write_u16(Self::PLAY_CLIENT_SOUND).write_str(name);
            }
        }
        w.into_bytes()
    }

    /// Decode a directive.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnknownDirective`] for unknown tags, or any other
    /// [`WireError`] for a malformed payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = DataReader::new(bytes);
        let directive = match r.read_u16()? {
            Self::PLAY_CLIENT_SOUND => ServerDirective::PlaySound(r.read_string()?),
            other => return Err(WireError::UnknownDirective(other)),
        };
        r.finish()?;
        Ok(directive)
    }
}
