// Synthetic Ogg/Opus streams for integration tests
#![allow(dead_code)]

use opuscaf::ogg::{crc, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS};

pub const SERIAL: u32 = 0x5eed;

/// One Ogg page with a valid checksum; every packet is laced as complete
pub fn ogg_page(header_type: u8, sequence: u32, granule: u64, packets: &[Vec<u8>]) -> Vec<u8> {
    let mut segment_table = Vec::new();
    for packet in packets {
        segment_table.extend(std::iter::repeat(255u8).take(packet.len() / 255));
        segment_table.push((packet.len() % 255) as u8);
    }
    assert!(segment_table.len() <= 255, "too many segments for one page");

    let mut page = b"OggS".to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]);
    page.push(segment_table.len() as u8);
    page.extend(segment_table);
    for packet in packets {
        page.extend_from_slice(packet);
    }

    let sum = crc::checksum(&page);
    page[22..26].copy_from_slice(&sum.to_le_bytes());
    page
}

/// 19-byte identification header
pub fn opus_head(channels: u8, pre_skip: u16, input_sample_rate: u32) -> Vec<u8> {
    let mut packet = b"OpusHead".to_vec();
    packet.push(1);
    packet.push(channels);
    packet.extend_from_slice(&pre_skip.to_le_bytes());
    packet.extend_from_slice(&input_sample_rate.to_le_bytes());
    packet.extend_from_slice(&0u16.to_le_bytes());
    packet.push(0);
    packet
}

/// Comment header with a vendor string and no comments
pub fn opus_tags() -> Vec<u8> {
    let vendor = b"libopus 1.4";
    let mut packet = b"OpusTags".to_vec();
    packet.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    packet.extend_from_slice(vendor);
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet
}

/// Audio packet: a TOC byte followed by filler
pub fn audio_packet(toc: u8, len: usize) -> Vec<u8> {
    let mut packet = vec![toc];
    packet.extend((1..len).map(|i| (i % 251) as u8));
    packet
}

/// Complete stream: id page, comment page, then one page per entry of
/// `audio_pages` (the last one flagged end of stream)
pub fn opus_stream(channels: u8, audio_pages: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let mut stream = ogg_page(OGG_HEADER_TYPE_BOS, 0, 0, &[opus_head(channels, 312, 48_000)]);
    stream.extend(ogg_page(0, 1, 0, &[opus_tags()]));

    for (i, packets) in audio_pages.iter().enumerate() {
        let header_type = if i + 1 == audio_pages.len() { OGG_HEADER_TYPE_EOS } else { 0 };
        let granule = 960 * (i as u64 + 1);
        stream.extend(ogg_page(header_type, 2 + i as u32, granule, packets));
    }
    stream
}

/// Concatenated packet bytes, in stream order
pub fn concat(audio_pages: &[Vec<Vec<u8>>]) -> Vec<u8> {
    audio_pages.iter().flatten().flatten().copied().collect()
}

/// Packet sizes, in stream order
pub fn sizes(audio_pages: &[Vec<Vec<u8>>]) -> Vec<u64> {
    audio_pages.iter().flatten().map(|p| p.len() as u64).collect()
}
