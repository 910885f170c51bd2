// CAF chunk header and the closed set of chunk payloads

use std::io::{BufRead, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use super::{chunk_types, AudioData, AudioDescription, ChannelLayout, FourCC, InformationList, PacketTable};
use crate::error::{Error, Result};
use crate::utils::io::{read_vec, ReadContext};

/// Chunk size sentinel: the audio data runs to the end of the stream
pub const SIZE_TO_END: i64 = -1;

/// CAF chunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub chunk_type: FourCC,
    /// Byte length of the content that follows, or `SIZE_TO_END`
    pub chunk_size: i64,
}

impl ChunkHeader {
    pub const SIZE: usize = 12;

    /// Read a chunk header
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut chunk_type = [0u8; 4];
        reader.read_exact(&mut chunk_type).context("chunk header")?;
        let chunk_type = FourCC(chunk_type);
        let chunk_size = reader.read_i64::<BigEndian>().context("chunk header")?;

        if chunk_size < SIZE_TO_END {
            return Err(Error::validation(format!(
                "chunk '{}' has negative size {}",
                chunk_type, chunk_size
            )));
        }
        if chunk_size == SIZE_TO_END && chunk_type != chunk_types::AUDIO_DATA {
            return Err(Error::validation(format!(
                "chunk '{}' uses the open-ended size reserved for audio data",
                chunk_type
            )));
        }

        Ok(ChunkHeader {
            chunk_type,
            chunk_size,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.chunk_type.as_bytes())?;
        writer.write_i64::<BigEndian>(self.chunk_size)?;
        Ok(())
    }
}

/// Decoded chunk payload
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkContents {
    AudioDescription(AudioDescription),
    ChannelLayout(ChannelLayout),
    Information(InformationList),
    AudioData(AudioData),
    PacketTable(PacketTable),
    Midi(Vec<u8>),
    /// Any other chunk type, kept byte for byte
    Unknown(Vec<u8>),
}

impl ChunkContents {
    /// Decode the payload that follows `header`
    pub fn read<R: BufRead>(reader: &mut R, header: &ChunkHeader) -> Result<Self> {
        let contents = match header.chunk_type {
            chunk_types::AUDIO_DESCRIPTION => {
                ChunkContents::AudioDescription(AudioDescription::read(reader)?)
            }
            chunk_types::CHANNEL_LAYOUT => ChunkContents::ChannelLayout(ChannelLayout::read(reader)?),
            chunk_types::INFORMATION => ChunkContents::Information(InformationList::read(reader)?),
            chunk_types::AUDIO_DATA => {
                ChunkContents::AudioData(AudioData::read(reader, header.chunk_size)?)
            }
            chunk_types::PACKET_TABLE => ChunkContents::PacketTable(PacketTable::read(reader)?),
            chunk_types::MIDI => {
                ChunkContents::Midi(read_vec(reader, header.chunk_size as u64, "midi chunk")?)
            }
            other => {
                debug!(chunk_type = %other, size = header.chunk_size, "unknown chunk type");
                ChunkContents::Unknown(read_vec(reader, header.chunk_size as u64, "unknown chunk")?)
            }
        };
        Ok(contents)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            ChunkContents::AudioDescription(desc) => desc.write(writer),
            ChunkContents::ChannelLayout(layout) => layout.write(writer),
            ChunkContents::Information(info) => info.write(writer),
            ChunkContents::AudioData(data) => data.write(writer),
            ChunkContents::PacketTable(table) => table.write(writer),
            ChunkContents::Midi(bytes) | ChunkContents::Unknown(bytes) => {
                writer.write_all(bytes)?;
                Ok(())
            }
        }
    }

    /// Number of bytes `write` produces
    pub fn encoded_len(&self) -> u64 {
        match self {
            ChunkContents::AudioDescription(_) => AudioDescription::SIZE as u64,
            ChunkContents::ChannelLayout(layout) => layout.encoded_len(),
            ChunkContents::Information(info) => info.encoded_len(),
            ChunkContents::AudioData(data) => data.encoded_len(),
            ChunkContents::PacketTable(table) => table.encoded_len(),
            ChunkContents::Midi(bytes) | ChunkContents::Unknown(bytes) => bytes.len() as u64,
        }
    }
}

/// CAF chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub header: ChunkHeader,
    pub contents: ChunkContents,
}

impl Chunk {
    /// Build a chunk whose declared size matches its encoded contents
    pub fn new(chunk_type: FourCC, contents: ChunkContents) -> Self {
        let chunk_size = contents.encoded_len() as i64;
        Chunk {
            header: ChunkHeader {
                chunk_type,
                chunk_size,
            },
            contents,
        }
    }

    pub fn audio_description(desc: AudioDescription) -> Self {
        Self::new(chunk_types::AUDIO_DESCRIPTION, ChunkContents::AudioDescription(desc))
    }

    pub fn channel_layout(layout: ChannelLayout) -> Self {
        Self::new(chunk_types::CHANNEL_LAYOUT, ChunkContents::ChannelLayout(layout))
    }

    pub fn information(info: InformationList) -> Self {
        Self::new(chunk_types::INFORMATION, ChunkContents::Information(info))
    }

    pub fn audio_data(data: AudioData) -> Self {
        Self::new(chunk_types::AUDIO_DATA, ChunkContents::AudioData(data))
    }

    pub fn packet_table(table: PacketTable) -> Self {
        Self::new(chunk_types::PACKET_TABLE, ChunkContents::PacketTable(table))
    }

    /// Read one chunk (header and contents)
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self> {
        let header = ChunkHeader::read(reader)?;
        let contents = ChunkContents::read(reader, &header)?;
        Ok(Chunk { header, contents })
    }

    /// Write the stored header followed by the contents.
    ///
    /// The header is written as stored, so a decoded chunk re-encodes to the
    /// same bytes, including the open-ended size sentinel.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header.write(writer)?;
        self.contents.write(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_round_trip() {
        let header = ChunkHeader {
            chunk_type: chunk_types::AUDIO_DATA,
            chunk_size: SIZE_TO_END,
        };
        let mut buffer = Vec::new();
        header.write(&mut buffer).unwrap();
        assert_eq!(buffer, b"data\xff\xff\xff\xff\xff\xff\xff\xff");
        assert_eq!(ChunkHeader::read(&mut Cursor::new(buffer)).unwrap(), header);
    }

    #[test]
    fn test_sentinel_only_for_audio_data() {
        let mut buffer = b"midi".to_vec();
        buffer.extend_from_slice(&(-1i64).to_be_bytes());
        assert!(matches!(
            ChunkHeader::read(&mut Cursor::new(buffer)),
            Err(Error::StreamValidation(_))
        ));
    }

    #[test]
    fn test_negative_size_rejected() {
        let mut buffer = b"data".to_vec();
        buffer.extend_from_slice(&(-2i64).to_be_bytes());
        assert!(matches!(
            ChunkHeader::read(&mut Cursor::new(buffer)),
            Err(Error::StreamValidation(_))
        ));
    }

    #[test]
    fn test_unknown_chunk_preserved() {
        let mut buffer = b"free".to_vec();
        buffer.extend_from_slice(&5i64.to_be_bytes());
        buffer.extend_from_slice(&[1, 2, 3, 4, 5]);

        let chunk = Chunk::read(&mut Cursor::new(buffer.clone())).unwrap();
        assert_eq!(chunk.contents, ChunkContents::Unknown(vec![1, 2, 3, 4, 5]));

        let mut out = Vec::new();
        chunk.write(&mut out).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_midi_chunk_is_opaque() {
        let mut buffer = b"midi".to_vec();
        buffer.extend_from_slice(&3i64.to_be_bytes());
        buffer.extend_from_slice(b"MTh");

        let chunk = Chunk::read(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(chunk.contents, ChunkContents::Midi(b"MTh".to_vec()));
    }

    #[test]
    fn test_truncated_unknown_chunk() {
        let mut buffer = b"free".to_vec();
        buffer.extend_from_slice(&10i64.to_be_bytes());
        buffer.extend_from_slice(&[0; 4]);
        assert!(matches!(
            Chunk::read(&mut Cursor::new(buffer)),
            Err(Error::IncompleteData(_))
        ));
    }
}
