// opuscaf - remux Ogg/Opus streams into Core Audio Format files
//
// Layers, bottom up:
// - ogg: page framing, lacing and checksums
// - opus: identification header and TOC byte helpers
// - caf: typed chunk model with a symmetric codec
// - transcode: single-pass Ogg/Opus -> CAF writer

pub mod caf;
pub mod error;
pub mod ogg;
pub mod opus;
pub mod transcode;
pub mod utils;

pub use caf::CafFile;
pub use error::{Error, Result};
pub use ogg::OggDemuxer;
pub use opus::OpusIdHeader;
pub use transcode::{
    convert_file, convert_file_in_memory, TranscodeOptions, TranscodeSummary, Transcoder,
    DEFAULT_ENCODER,
};
