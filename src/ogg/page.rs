use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use super::{crc, LACING_CONTINUE, OGG_HEADER_TYPE_BOS, OGG_SIGNATURE};
use crate::error::{Error, Result};
use crate::utils::io::{read_exact_or_eof, read_vec, ReadContext};

/// OGG Page Header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    pub segment_table: Vec<u8>,
}

/// OGG Page with its lacing resolved into packets
#[derive(Debug, Clone)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub packets: Vec<Vec<u8>>,
}

/// Packet boundaries recovered from a segment table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lacing {
    /// Lengths of the packets completed inside the page
    pub packets: Vec<usize>,
    /// Bytes of a trailing run of 255-byte segments that never terminates
    /// inside this page (a packet continued on the next page)
    pub unterminated: usize,
}

/// Walk a segment table: runs of 255 accumulate, the first entry below 255
/// (including 0) closes the packet.
pub fn lace_packets(segment_table: &[u8]) -> Lacing {
    let mut lacing = Lacing::default();
    let mut current = 0usize;
    for &size in segment_table {
        current += size as usize;
        if size < LACING_CONTINUE {
            lacing.packets.push(current);
            current = 0;
        }
    }
    lacing.unterminated = current;
    lacing
}

impl OggPageHeader {
    /// Fixed part of the header, before the segment table
    pub const SIZE: usize = 27;

    const CRC_RANGE: std::ops::Range<usize> = 22..26;

    /// Parse the fixed header fields
    fn parse(raw: &[u8; Self::SIZE], segment_table: Vec<u8>) -> Self {
        OggPageHeader {
            version: raw[4],
            header_type: raw[5],
            granule_position: LittleEndian::read_u64(&raw[6..14]),
            bitstream_serial: LittleEndian::read_u32(&raw[14..18]),
            page_sequence: LittleEndian::read_u32(&raw[18..22]),
            crc: LittleEndian::read_u32(&raw[Self::CRC_RANGE]),
            segment_table,
        }
    }

    /// Calculate total page data size from segment table
    pub fn data_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }
}

impl OggPage {
    /// Read the next page from a reader.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly before a new page
    /// header; a header, segment table or packet cut short is
    /// `IncompleteData`.
    pub fn read<R: Read>(reader: &mut R, verify_checksum: bool) -> Result<Option<Self>> {
        let mut raw = [0u8; OggPageHeader::SIZE];
        if !read_exact_or_eof(reader, &mut raw, "ogg page header")? {
            return Ok(None);
        }

        if &raw[0..4] != OGG_SIGNATURE {
            return Err(Error::validation("bad header signature"));
        }

        let mut segment_table = vec![0u8; raw[26] as usize];
        reader
            .read_exact(&mut segment_table)
            .context("ogg segment table")?;
        let header = OggPageHeader::parse(&raw, segment_table);

        let lacing = lace_packets(&header.segment_table);
        let mut packets = Vec::with_capacity(lacing.packets.len());
        for &len in &lacing.packets {
            packets.push(read_vec(reader, len as u64, "ogg packet")?);
        }

        // Packets continued across pages are not stitched; drop the
        // fragment but keep the reader aligned on the next page.
        let mut fragment = Vec::new();
        if lacing.unterminated > 0 {
            warn!(
                page = header.page_sequence,
                bytes = lacing.unterminated,
                "dropping packet fragment continued on the next page"
            );
            fragment = read_vec(reader, lacing.unterminated as u64, "ogg packet fragment")?;
        }

        if verify_checksum {
            raw[OggPageHeader::CRC_RANGE].fill(0);
            let mut computed = crc::update(0, &raw);
            computed = crc::update(computed, &header.segment_table);
            for packet in &packets {
                computed = crc::update(computed, packet);
            }
            computed = crc::update(computed, &fragment);

            if computed != header.crc {
                return Err(Error::validation(format!(
                    "page {} checksum mismatch: stored {:#010x}, computed {:#010x}",
                    header.page_sequence, header.crc, computed
                )));
            }
        }

        Ok(Some(OggPage { header, packets }))
    }

    /// First packet of the page, if any
    pub fn first_packet(&self) -> Option<&[u8]> {
        self.packets.first().map(|p| p.as_slice())
    }
}
