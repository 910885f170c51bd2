// Channel layout chunk ("chan")

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::error::Result;
use crate::utils::io::ReadContext;

/// Layout described by the channel descriptions that follow
pub const LAYOUT_TAG_USE_DESCRIPTIONS: u32 = 0;
/// Standard mono stream
pub const LAYOUT_TAG_MONO: u32 = (100 << 16) | 1;
/// Standard stereo stream (L R)
pub const LAYOUT_TAG_STEREO: u32 = (101 << 16) | 2;

/// Pick a layout tag from a channel count.
///
/// Only mono and stereo are mapped; everything else gets tag 0.
pub fn layout_tag_for_channels(channels: u32) -> u32 {
    match channels {
        1 => LAYOUT_TAG_MONO,
        2 => LAYOUT_TAG_STEREO,
        _ => LAYOUT_TAG_USE_DESCRIPTIONS,
    }
}

/// One 20-byte channel description record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelDescription {
    pub label: u32,
    pub flags: u32,
    pub coordinates: [f32; 3],
}

impl ChannelDescription {
    pub const SIZE: usize = 20;

    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let what = "channel description";
        let label = reader.read_u32::<BigEndian>().context(what)?;
        let flags = reader.read_u32::<BigEndian>().context(what)?;
        let mut coordinates = [0f32; 3];
        reader.read_f32_into::<BigEndian>(&mut coordinates).context(what)?;
        Ok(ChannelDescription {
            label,
            flags,
            coordinates,
        })
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.label)?;
        writer.write_u32::<BigEndian>(self.flags)?;
        for coordinate in self.coordinates {
            writer.write_f32::<BigEndian>(coordinate)?;
        }
        Ok(())
    }
}

/// Channel layout: tag, bitmap, then the channel descriptions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelLayout {
    pub layout_tag: u32,
    pub bitmap: u32,
    pub descriptions: Vec<ChannelDescription>,
}

impl ChannelLayout {
    /// Layout with only a tag, as written for Opus streams
    pub fn for_channels(channels: u32) -> Self {
        ChannelLayout {
            layout_tag: layout_tag_for_channels(channels),
            bitmap: 0,
            descriptions: Vec::new(),
        }
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let what = "channel layout chunk";
        let layout_tag = reader.read_u32::<BigEndian>().context(what)?;
        let bitmap = reader.read_u32::<BigEndian>().context(what)?;
        let count = reader.read_u32::<BigEndian>().context(what)?;

        let mut descriptions = Vec::new();
        for _ in 0..count {
            descriptions.push(ChannelDescription::read(reader)?);
        }

        Ok(ChannelLayout {
            layout_tag,
            bitmap,
            descriptions,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.layout_tag)?;
        writer.write_u32::<BigEndian>(self.bitmap)?;
        writer.write_u32::<BigEndian>(self.descriptions.len() as u32)?;
        for description in &self.descriptions {
            description.write(writer)?;
        }
        Ok(())
    }

    pub fn encoded_len(&self) -> u64 {
        12 + (self.descriptions.len() * ChannelDescription::SIZE) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tags() {
        assert_eq!(layout_tag_for_channels(1), 6_553_601);
        assert_eq!(layout_tag_for_channels(2), 6_619_138);
        assert_eq!(layout_tag_for_channels(6), 0);
        assert_eq!(layout_tag_for_channels(0), 0);
    }

    #[test]
    fn test_round_trip_with_descriptions() {
        let layout = ChannelLayout {
            layout_tag: LAYOUT_TAG_USE_DESCRIPTIONS,
            bitmap: 0,
            descriptions: vec![
                ChannelDescription {
                    label: 1,
                    flags: 0,
                    coordinates: [0.0, 1.5, -2.0],
                },
                ChannelDescription {
                    label: 2,
                    flags: 1,
                    coordinates: [0.25, 0.0, 0.0],
                },
            ],
        };
        let mut buffer = Vec::new();
        layout.write(&mut buffer).unwrap();
        assert_eq!(buffer.len() as u64, layout.encoded_len());
        assert_eq!(buffer.len(), 52);
        assert_eq!(&buffer[8..12], &2u32.to_be_bytes());

        assert_eq!(ChannelLayout::read(&mut Cursor::new(buffer)).unwrap(), layout);
    }

    #[test]
    fn test_missing_descriptions() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&0u32.to_be_bytes());
        buffer.extend_from_slice(&0u32.to_be_bytes());
        buffer.extend_from_slice(&3u32.to_be_bytes());
        buffer.extend_from_slice(&[0u8; 20]);
        assert!(matches!(
            ChannelLayout::read(&mut Cursor::new(buffer)),
            Err(crate::Error::IncompleteData(_))
        ));
    }
}
