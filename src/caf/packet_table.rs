// Packet table chunk ("pakt")
//
// Layout: 24-byte header, then one varint byte-size per packet.

use std::io::{BufRead, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use super::varint;
use crate::error::{Error, Result};
use crate::utils::io::ReadContext;

/// Packet table header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PacketTableHeader {
    pub number_packets: i64,
    pub number_valid_frames: i64,
    pub priming_frames: i32,
    pub remainder_frames: i32,
}

impl PacketTableHeader {
    pub const SIZE: usize = 24;
}

/// Packet table: header plus exactly `number_packets` entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketTable {
    pub header: PacketTableHeader,
    pub entries: Vec<u64>,
}

impl PacketTable {
    /// Table for packets of a single fixed frame size
    pub fn for_packets(packet_sizes: Vec<u64>, frames_per_packet: u32) -> Self {
        let count = packet_sizes.len() as i64;
        PacketTable {
            header: PacketTableHeader {
                number_packets: count,
                number_valid_frames: i64::from(frames_per_packet) * count,
                priming_frames: 0,
                remainder_frames: 0,
            },
            entries: packet_sizes,
        }
    }

    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self> {
        let what = "packet table header";
        let header = PacketTableHeader {
            number_packets: reader.read_i64::<BigEndian>().context(what)?,
            number_valid_frames: reader.read_i64::<BigEndian>().context(what)?,
            priming_frames: reader.read_i32::<BigEndian>().context(what)?,
            remainder_frames: reader.read_i32::<BigEndian>().context(what)?,
        };
        if header.number_packets < 0 {
            return Err(Error::validation(format!(
                "packet table declares {} packets",
                header.number_packets
            )));
        }

        let mut entries = Vec::new();
        for _ in 0..header.number_packets {
            entries.push(varint::decode(reader)?);
        }

        Ok(PacketTable { header, entries })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.check_entry_count()?;

        writer.write_i64::<BigEndian>(self.header.number_packets)?;
        writer.write_i64::<BigEndian>(self.header.number_valid_frames)?;
        writer.write_i32::<BigEndian>(self.header.priming_frames)?;
        writer.write_i32::<BigEndian>(self.header.remainder_frames)?;
        for &entry in &self.entries {
            varint::write(writer, entry)?;
        }
        Ok(())
    }

    /// Header size plus the encoded length of every entry
    pub fn encoded_len(&self) -> u64 {
        let entries: usize = self.entries.iter().map(|&e| varint::encoded_len(e)).sum();
        (PacketTableHeader::SIZE + entries) as u64
    }

    fn check_entry_count(&self) -> Result<()> {
        if self.entries.len() as i64 != self.header.number_packets {
            return Err(Error::invariant(format!(
                "packet table header declares {} packets but holds {} entries",
                self.header.number_packets,
                self.entries.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_round_trip() {
        let table = PacketTable::for_packets(vec![3, 127, 128, 300], 960);
        assert_eq!(table.header.number_valid_frames, 3840);

        let mut buffer = Vec::new();
        table.write(&mut buffer).unwrap();
        assert_eq!(buffer.len() as u64, table.encoded_len());
        assert_eq!(buffer.len(), 24 + 1 + 1 + 2 + 2);

        assert_eq!(PacketTable::read(&mut Cursor::new(buffer)).unwrap(), table);
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let mut table = PacketTable::for_packets(vec![10, 20], 960);
        table.header.number_packets = 3;
        let mut buffer = Vec::new();
        assert!(matches!(
            table.write(&mut buffer),
            Err(Error::InvariantViolation(_))
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_missing_entries() {
        let table = PacketTable::for_packets(vec![10, 20], 960);
        let mut buffer = Vec::new();
        table.write(&mut buffer).unwrap();
        buffer.pop();
        assert!(matches!(
            PacketTable::read(&mut Cursor::new(buffer)),
            Err(Error::IncompleteData(_))
        ));
    }
}
