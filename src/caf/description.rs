// Audio description chunk ("desc")

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use super::{FourCC, FileHeader, ChunkHeader};
use crate::error::Result;
use crate::utils::io::ReadContext;

/// Fixed 32-byte stream format record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioDescription {
    pub sample_rate: f64,
    pub format_id: FourCC,
    pub format_flags: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub channels_per_packet: u32,
    pub bits_per_channel: u32,
}

impl AudioDescription {
    pub const SIZE: usize = 32;

    /// Offset of `frames_per_packet` inside the record
    pub const FRAMES_PER_PACKET_OFFSET: u64 = 20;

    /// Absolute file offset of `frames_per_packet` when the description is
    /// the first chunk, as CAF requires
    pub const FRAMES_PER_PACKET_FILE_OFFSET: u64 =
        (FileHeader::SIZE + ChunkHeader::SIZE) as u64 + Self::FRAMES_PER_PACKET_OFFSET;

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let what = "audio description chunk";
        let sample_rate = reader.read_f64::<BigEndian>().context(what)?;
        let mut format_id = [0u8; 4];
        reader.read_exact(&mut format_id).context(what)?;

        Ok(AudioDescription {
            sample_rate,
            format_id: FourCC(format_id),
            format_flags: reader.read_u32::<BigEndian>().context(what)?,
            bytes_per_packet: reader.read_u32::<BigEndian>().context(what)?,
            frames_per_packet: reader.read_u32::<BigEndian>().context(what)?,
            channels_per_packet: reader.read_u32::<BigEndian>().context(what)?,
            bits_per_channel: reader.read_u32::<BigEndian>().context(what)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_f64::<BigEndian>(self.sample_rate)?;
        writer.write_all(self.format_id.as_bytes())?;
        writer.write_u32::<BigEndian>(self.format_flags)?;
        writer.write_u32::<BigEndian>(self.bytes_per_packet)?;
        writer.write_u32::<BigEndian>(self.frames_per_packet)?;
        writer.write_u32::<BigEndian>(self.channels_per_packet)?;
        writer.write_u32::<BigEndian>(self.bits_per_channel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caf::FORMAT_OPUS;
    use std::io::Cursor;

    #[test]
    fn test_layout() {
        let desc = AudioDescription {
            sample_rate: 48000.0,
            format_id: FORMAT_OPUS,
            format_flags: 0,
            bytes_per_packet: 0,
            frames_per_packet: 960,
            channels_per_packet: 2,
            bits_per_channel: 0,
        };
        let mut buffer = Vec::new();
        desc.write(&mut buffer).unwrap();

        assert_eq!(buffer.len(), AudioDescription::SIZE);
        assert_eq!(&buffer[0..8], &48000.0f64.to_be_bytes());
        assert_eq!(&buffer[8..12], b"opus");
        let offset = AudioDescription::FRAMES_PER_PACKET_OFFSET as usize;
        assert_eq!(&buffer[offset..offset + 4], &960u32.to_be_bytes());
        assert_eq!(AudioDescription::FRAMES_PER_PACKET_FILE_OFFSET, 40);

        assert_eq!(AudioDescription::read(&mut Cursor::new(buffer)).unwrap(), desc);
    }
}
