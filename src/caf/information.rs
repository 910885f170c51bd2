// Information chunk ("info")
//
// Layout: number of entries (u32), then that many key/value pairs, each a
// NUL-terminated byte string.

use std::io::{BufRead, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;
use crate::utils::io::{read_cstring, ReadContext};

/// Key announcing the muxing application
pub const KEY_ENCODER: &str = "encoder";

/// Ordered key/value strings, stored without their NUL terminators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformationList {
    pub entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl InformationList {
    /// List holding one entry
    pub fn single(key: &str, value: &str) -> Self {
        InformationList {
            entries: vec![(key.as_bytes().to_vec(), value.as_bytes().to_vec())],
        }
    }

    /// Value of the first entry with `key`
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u32::<BigEndian>().context("information chunk")?;
        let mut entries = Vec::new();
        for _ in 0..count {
            let key = read_cstring(reader, "information key")?;
            let value = read_cstring(reader, "information value")?;
            entries.push((key, value));
        }
        Ok(InformationList { entries })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.entries.len() as u32)?;
        for (key, value) in &self.entries {
            writer.write_all(key)?;
            writer.write_u8(0)?;
            writer.write_all(value)?;
            writer.write_u8(0)?;
        }
        Ok(())
    }

    pub fn encoded_len(&self) -> u64 {
        let strings: usize = self
            .entries
            .iter()
            .map(|(key, value)| key.len() + value.len() + 2)
            .sum();
        4 + strings as u64
    }
}
