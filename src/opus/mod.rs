// OPUS format support (in OGG container)
//
// OPUS File Structure:
// - Uses OGG container (similar to OGG Vorbis)
// - Identification header: "OpusHead" (8 bytes) in first page, 19-byte packet
// - Comment header: "OpusTags" (8 bytes) followed by Vorbis Comment in second page
// - Audio data pages, one or more Opus packets each
//
// Reference:
// - https://opus-codec.org/docs/
// - RFC 6716, Section 3.1: TOC byte
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::ogg::OggPage;

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Length of the identification packet for channel mapping family 0
pub const ID_HEADER_LEN: usize = 19;

/// Opus always decodes at 48 kHz, whatever the input rate was
pub const OPUS_SAMPLE_RATE: u32 = 48_000;

/// Identification header ("OpusHead")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpusIdHeader {
    pub version: u8,
    pub channels: u8,
    pub pre_skip: u16,
    pub input_sample_rate: u32,
    pub output_gain: u16,
    pub channel_mapping_family: u8,
}

impl OpusIdHeader {
    /// Parse the identification packet
    pub fn parse(packet: &[u8]) -> Result<Self> {
        if packet.len() != ID_HEADER_LEN {
            return Err(Error::validation("payload for id page must be 19 bytes"));
        }
        if !is_id_header(packet) {
            return Err(Error::validation("bad payload signature"));
        }

        Ok(OpusIdHeader {
            version: packet[8],
            channels: packet[9],
            pre_skip: LittleEndian::read_u16(&packet[10..12]),
            input_sample_rate: LittleEndian::read_u32(&packet[12..16]),
            output_gain: LittleEndian::read_u16(&packet[16..18]),
            channel_mapping_family: packet[18],
        })
    }
}

/// Check for the identification header signature
pub fn is_id_header(packet: &[u8]) -> bool {
    packet.starts_with(OPUS_SIGNATURE)
}

/// Check for the comment header signature
pub fn is_comment_header(packet: &[u8]) -> bool {
    packet.starts_with(OPUS_TAGS)
}

/// Samples per channel (at 48 kHz) coded by one frame, from a TOC byte.
///
/// The top five bits select the configuration: 0-11 are SILK-only
/// (10/20/40/60 ms), 12-15 hybrid (10/20 ms), 16-31 CELT-only
/// (2.5/5/10/20 ms).
pub fn frame_size(toc: u8) -> u32 {
    let config = u32::from(toc >> 3);
    if config < 12 {
        960 * ((config & 3) + 1)
    } else if config < 16 {
        480 << (config & 1)
    } else {
        120 << (config & 3)
    }
}

/// Detect if file is OPUS format
pub fn is_opus_file<P: AsRef<Path>>(path: P) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut reader = BufReader::new(file);
    match OggPage::read(&mut reader, false) {
        Ok(Some(page)) => page.first_packet().is_some_and(is_id_header),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_packet() -> Vec<u8> {
        let mut packet = OPUS_SIGNATURE.to_vec();
        packet.push(1); // version
        packet.push(2); // channels
        packet.extend_from_slice(&312u16.to_le_bytes());
        packet.extend_from_slice(&44_100u32.to_le_bytes());
        packet.extend_from_slice(&0xfff0u16.to_le_bytes());
        packet.push(0);
        packet
    }

    #[test]
    fn test_parse_id_header() {
        let header = OpusIdHeader::parse(&id_packet()).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.channels, 2);
        assert_eq!(header.pre_skip, 312);
        assert_eq!(header.input_sample_rate, 44_100);
        assert_eq!(header.output_gain, 0xfff0);
        assert_eq!(header.channel_mapping_family, 0);
    }

    #[test]
    fn test_parse_wrong_length() {
        let mut packet = id_packet();
        packet.push(0);
        let err = OpusIdHeader::parse(&packet).unwrap_err();
        assert!(err.to_string().contains("19 bytes"));
    }

    #[test]
    fn test_parse_wrong_signature() {
        let mut packet = id_packet();
        packet[0] = b'X';
        let err = OpusIdHeader::parse(&packet).unwrap_err();
        assert!(err.to_string().contains("bad payload signature"));
    }

    #[test]
    fn test_frame_size_silk() {
        assert_eq!(frame_size(0 << 3), 960);
        assert_eq!(frame_size(1 << 3), 1920);
        assert_eq!(frame_size(11 << 3), 3840);
    }

    #[test]
    fn test_frame_size_hybrid() {
        assert_eq!(frame_size(12 << 3), 480);
        assert_eq!(frame_size(13 << 3), 960);
    }

    #[test]
    fn test_frame_size_celt() {
        assert_eq!(frame_size(16 << 3), 120);
        assert_eq!(frame_size(31 << 3), 960);
        // Low three bits (stereo flag, frame count code) are ignored
        assert_eq!(frame_size((31 << 3) | 0x07), 960);
    }
}
