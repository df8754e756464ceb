//! Audio frame headers.
//!
//! We only decode frame headers, never the audio samples inside a frame.

mod header;
pub use header::{
	decode_frame_header, is_sync_code, BlockingStrategy, FlacFrame, FrameContext, FramePosition,
};

mod number;
pub use number::{decode_coded_number, encode_coded_number};

mod scan;
pub use scan::{FrameScanReport, FrameScanner};

pub mod tables;
pub use tables::ChannelAssignment;
