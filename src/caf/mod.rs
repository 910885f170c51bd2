// Core Audio Format (CAF) support
//
// CAF File Structure (all integers big-endian):
// - File Header (8 bytes)
//   - File Type: "caff" (4 bytes)
//   - File Version: 1 (i16)
//   - File Flags: 0 (i16)
// - Chunks, each:
//   - Chunk Type: FourCC (4 bytes)
//   - Chunk Size: i64, byte length of the content that follows
//     (-1 = audio data running to the end of the file)
//   - Content
//
// Reference:
// - https://developer.apple.com/library/archive/documentation/MusicAudio/Reference/CAFSpec/

pub mod chunk;
pub mod data;
pub mod description;
pub mod information;
pub mod layout;
pub mod packet_table;
pub mod varint;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::io::{at_eof, ReadContext};

pub use chunk::{Chunk, ChunkContents, ChunkHeader};
pub use data::AudioData;
pub use description::AudioDescription;
pub use information::InformationList;
pub use layout::{ChannelDescription, ChannelLayout};
pub use packet_table::{PacketTable, PacketTableHeader};

/// Four raw bytes naming a file or chunk type
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Diagnostics only; non-printable bytes are escaped
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

impl Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// CAF file type signature
pub const CAF_SIGNATURE: FourCC = FourCC::new(b"caff");

/// Opus format id for the audio description chunk
pub const FORMAT_OPUS: FourCC = FourCC::new(b"opus");

/// Chunk types this crate interprets
pub mod chunk_types {
    use super::FourCC;

    pub const AUDIO_DESCRIPTION: FourCC = FourCC::new(b"desc");
    pub const CHANNEL_LAYOUT: FourCC = FourCC::new(b"chan");
    pub const INFORMATION: FourCC = FourCC::new(b"info");
    pub const AUDIO_DATA: FourCC = FourCC::new(b"data");
    pub const PACKET_TABLE: FourCC = FourCC::new(b"pakt");
    pub const MIDI: FourCC = FourCC::new(b"midi");
}

/// CAF file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub file_type: FourCC,
    pub version: i16,
    pub flags: i16,
}

impl Default for FileHeader {
    fn default() -> Self {
        FileHeader {
            file_type: CAF_SIGNATURE,
            version: 1,
            flags: 0,
        }
    }
}

impl FileHeader {
    pub const SIZE: usize = 8;

    /// Read the file header, rejecting anything that is not "caff"
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut file_type = [0u8; 4];
        reader.read_exact(&mut file_type).context("caf file header")?;
        if FourCC(file_type) != CAF_SIGNATURE {
            return Err(Error::validation("invalid caff header"));
        }

        let version = reader.read_i16::<BigEndian>().context("caf file header")?;
        let flags = reader.read_i16::<BigEndian>().context("caf file header")?;

        Ok(FileHeader {
            file_type: FourCC(file_type),
            version,
            flags,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.file_type.as_bytes())?;
        writer.write_i16::<BigEndian>(self.version)?;
        writer.write_i16::<BigEndian>(self.flags)?;
        Ok(())
    }
}

/// A whole CAF file: header plus chunks in file order
#[derive(Debug, Clone, PartialEq)]
pub struct CafFile {
    pub header: FileHeader,
    pub chunks: Vec<Chunk>,
}

impl CafFile {
    /// Decode a CAF stream until it ends.
    ///
    /// A clean end of stream between chunks terminates the file; running out
    /// inside a chunk is `IncompleteData`.
    pub fn decode<R: BufRead>(reader: &mut R) -> Result<Self> {
        let header = FileHeader::read(reader)?;
        let mut chunks = Vec::new();

        while !at_eof(reader)? {
            chunks.push(Chunk::read(reader)?);
        }

        Ok(CafFile { header, chunks })
    }

    /// Decode a CAF file from disk
    pub fn decode_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::decode(&mut reader)
    }

    /// Encode header and chunks in their stored order
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header.write(writer)?;
        for chunk in &self.chunks {
            chunk.write(writer)?;
        }
        Ok(())
    }

    /// Encode into a new byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode(&mut buffer)?;
        Ok(buffer)
    }

    /// First chunk of the given type
    pub fn find_chunk(&self, chunk_type: FourCC) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.header.chunk_type == chunk_type)
    }
}
