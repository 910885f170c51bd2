// Audio data chunk ("data")

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::chunk::SIZE_TO_END;
use crate::error::{Error, Result};
use crate::utils::io::{read_vec, ReadContext};

/// Edit count followed by the raw packet bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioData {
    pub edit_count: u32,
    pub data: Vec<u8>,
}

impl AudioData {
    /// Size of the edit count that precedes the audio bytes
    pub const EDIT_COUNT_SIZE: u64 = 4;

    /// Read the payload of a data chunk declared as `chunk_size` bytes
    pub fn read<R: Read>(reader: &mut R, chunk_size: i64) -> Result<Self> {
        if chunk_size != SIZE_TO_END && (chunk_size as u64) < Self::EDIT_COUNT_SIZE {
            return Err(Error::validation(format!(
                "data chunk size {} is smaller than its edit count",
                chunk_size
            )));
        }

        let edit_count = reader.read_u32::<BigEndian>().context("audio data chunk")?;
        let data = if chunk_size == SIZE_TO_END {
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            data
        } else {
            read_vec(reader, chunk_size as u64 - Self::EDIT_COUNT_SIZE, "audio data")?
        };

        Ok(AudioData { edit_count, data })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.edit_count)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    pub fn encoded_len(&self) -> u64 {
        Self::EDIT_COUNT_SIZE + self.data.len() as u64
    }
}
