// Ogg/Opus -> CAF transcoding
//
// Output layout, in order:
// - File header ("caff", version 1)
// - desc: 48 kHz "opus", frames per packet patched once known
// - chan: mono/stereo tag, no descriptions
// - info: single "encoder" entry
// - data: open-ended size while streaming, patched to 4 + audio bytes
// - pakt: one varint per packet
//
// Single forward pass over the input. The only writes behind the current
// position are the two patches after the packet table is out.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;
use tracing::{debug, info};

use crate::caf::chunk::SIZE_TO_END;
use crate::caf::information::KEY_ENCODER;
use crate::caf::{
    chunk_types, AudioData, AudioDescription, ChannelLayout, Chunk, ChunkHeader, FileHeader,
    InformationList, PacketTable, FORMAT_OPUS,
};
use crate::error::Result;
use crate::ogg::{OggDemuxer, OggPage};
use crate::opus::{self, OPUS_SAMPLE_RATE};

/// Encoder string written by the reference muxer
pub const DEFAULT_ENCODER: &str = "Lavf60.3.100";

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Check the CRC of every Ogg page
    pub verify_checksums: bool,
    /// Value announced under "encoder" in the information chunk
    pub encoder: String,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        TranscodeOptions {
            verify_checksums: false,
            encoder: DEFAULT_ENCODER.to_string(),
        }
    }
}

impl TranscodeOptions {
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    pub fn encoder<S: Into<String>>(mut self, encoder: S) -> Self {
        self.encoder = encoder.into();
        self
    }
}

/// What a conversion produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscodeSummary {
    pub channels: u8,
    pub input_sample_rate: u32,
    pub pre_skip: u16,
    pub frame_size: u32,
    pub packet_count: u64,
    pub audio_bytes: u64,
    /// Audio pages copied (header pages excluded)
    pub pages: u64,
}

/// Ogg/Opus to CAF remuxer
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: TranscodeOptions,
}

impl Transcoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Transcoder { options }
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Stream the CAF file into a seekable sink.
    ///
    /// Output starts at the sink's current position; both patched offsets
    /// are relative to it. On return the sink is positioned after the
    /// packet table.
    pub fn transcode<R: Read, W: Write + Seek>(&self, input: R, mut output: W) -> Result<TranscodeSummary> {
        let (mut demuxer, id_header) = OggDemuxer::open_with(input, self.options.verify_checksums)?;

        let start = output.stream_position()?;
        let mut writer = BufWriter::new(&mut output);

        FileHeader::default().write(&mut writer)?;
        Chunk::audio_description(AudioDescription {
            sample_rate: f64::from(OPUS_SAMPLE_RATE),
            format_id: FORMAT_OPUS,
            format_flags: 0,
            bytes_per_packet: 0,
            frames_per_packet: 0,
            channels_per_packet: u32::from(id_header.channels),
            bits_per_channel: 0,
        })
        .write(&mut writer)?;
        Chunk::channel_layout(ChannelLayout::for_channels(u32::from(id_header.channels)))
            .write(&mut writer)?;
        Chunk::information(InformationList::single(KEY_ENCODER, &self.options.encoder))
            .write(&mut writer)?;

        // Size field sits right after the data chunk's FourCC
        let data_size_offset = writer.stream_position()? + 4;
        ChunkHeader {
            chunk_type: chunk_types::AUDIO_DATA,
            chunk_size: SIZE_TO_END,
        }
        .write(&mut writer)?;
        writer.write_u32::<BigEndian>(0)?;

        let mut summary = TranscodeSummary {
            channels: id_header.channels,
            input_sample_rate: id_header.input_sample_rate,
            pre_skip: id_header.pre_skip,
            ..Default::default()
        };
        let mut packet_sizes = Vec::new();
        let mut frame_size = None;

        while let Some(page) = demuxer.next_page()? {
            if is_header_page(&page) {
                debug!(page = page.header.page_sequence, "skipping opus header page");
                continue;
            }

            if frame_size.is_none() {
                frame_size = page.first_packet().and_then(|p| p.first()).map(|&toc| opus::frame_size(toc));
            }

            for packet in &page.packets {
                writer.write_all(packet)?;
                packet_sizes.push(packet.len() as u64);
                summary.audio_bytes += packet.len() as u64;
            }
            summary.pages += 1;
        }

        summary.frame_size = frame_size.unwrap_or(0);
        summary.packet_count = packet_sizes.len() as u64;
        Chunk::packet_table(PacketTable::for_packets(packet_sizes, summary.frame_size))
            .write(&mut writer)?;
        writer.flush()?;

        let end = writer.stream_position()?;
        writer.seek(SeekFrom::Start(start + AudioDescription::FRAMES_PER_PACKET_FILE_OFFSET))?;
        writer.write_u32::<BigEndian>(summary.frame_size)?;
        writer.seek(SeekFrom::Start(data_size_offset))?;
        writer.write_i64::<BigEndian>((AudioData::EDIT_COUNT_SIZE + summary.audio_bytes) as i64)?;
        writer.seek(SeekFrom::Start(end))?;
        writer.flush()?;

        info!(
            channels = summary.channels,
            frame_size = summary.frame_size,
            packets = summary.packet_count,
            audio_bytes = summary.audio_bytes,
            "opus stream converted"
        );
        Ok(summary)
    }

    /// Build the whole CAF file in memory, patches included
    pub fn transcode_to_vec<R: Read>(&self, input: R) -> Result<(Vec<u8>, TranscodeSummary)> {
        let mut buffer = Cursor::new(Vec::new());
        let summary = self.transcode(input, &mut buffer)?;
        Ok((buffer.into_inner(), summary))
    }

    /// Convert into a sink that cannot seek, with one final write
    pub fn transcode_buffered<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<TranscodeSummary> {
        let (bytes, summary) = self.transcode_to_vec(input)?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(summary)
    }
}

/// Identification or comment header page, which carries no audio
fn is_header_page(page: &OggPage) -> bool {
    match page.first_packet() {
        Some(packet) => {
            opus::is_comment_header(packet)
                || (page.header.page_sequence <= 2 && opus::is_id_header(packet))
        }
        None => false,
    }
}

/// Convert an Ogg/Opus file on disk into a CAF file
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &TranscodeOptions,
) -> Result<TranscodeSummary> {
    let reader = BufReader::new(File::open(input)?);
    let file = File::create(output)?;
    Transcoder::new(options.clone()).transcode(reader, file)
}

/// Same as `convert_file`, but assemble the output in memory first
pub fn convert_file_in_memory<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &TranscodeOptions,
) -> Result<TranscodeSummary> {
    let reader = BufReader::new(File::open(input)?);
    let (bytes, summary) = Transcoder::new(options.clone()).transcode_to_vec(reader)?;
    std::fs::write(output, bytes)?;
    Ok(summary)
}
