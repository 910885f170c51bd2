use std::io::Read;

use super::OggPage;
use crate::error::{Error, Result};
use crate::opus::OpusIdHeader;

/// Sequential page reader over an Ogg/Opus stream.
///
/// Opening consumes and validates the identification page; every later
/// page is handed out once, in stream order.
pub struct OggDemuxer<R> {
    reader: R,
    verify_checksums: bool,
    finished: bool,
}

impl<R: Read> OggDemuxer<R> {
    /// Open a stream and read its identification header
    pub fn open(reader: R) -> Result<(Self, OpusIdHeader)> {
        Self::open_with(reader, false)
    }

    /// Open a stream, optionally checking every page CRC
    pub fn open_with(reader: R, verify_checksums: bool) -> Result<(Self, OpusIdHeader)> {
        let mut demuxer = OggDemuxer {
            reader,
            verify_checksums,
            finished: false,
        };

        let page = demuxer
            .next_page()?
            .ok_or_else(|| Error::incomplete("stream holds no ogg page"))?;

        if !page.header.is_bos() {
            return Err(Error::validation("wrong header, expected beginning of stream"));
        }

        let packet = page
            .first_packet()
            .ok_or_else(|| Error::validation("payload for id page must be 19 bytes"))?;
        let header = OpusIdHeader::parse(packet)?;

        Ok((demuxer, header))
    }

    /// Read the next page.
    ///
    /// `Ok(None)` marks the ordinary end of the stream; once that or an
    /// error has been returned, the demuxer stays finished.
    pub fn next_page(&mut self) -> Result<Option<OggPage>> {
        if self.finished {
            return Ok(None);
        }

        let page = OggPage::read(&mut self.reader, self.verify_checksums);
        if !matches!(page, Ok(Some(_))) {
            self.finished = true;
        }
        page
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for OggDemuxer<R> {
    type Item = Result<OggPage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}
