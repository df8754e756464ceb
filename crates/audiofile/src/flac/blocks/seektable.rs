use serde::Serialize;

use crate::{
	common::cursor::{ByteCursor, Endianness},
	flac::errors::FlacDecodeError,
};

use super::FlacMetablockDecode;

/// One point in a seek table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeekPoint {
	/// The first sample in the target frame,
	/// or [`SeekPoint::PLACEHOLDER`].
	pub sample_number: u64,

	/// Offset, in bytes, from the first byte of the first frame
	/// to the first byte of the target frame
	pub stream_offset: u64,

	/// Number of samples in the target frame
	pub frame_samples: u16,
}

impl SeekPoint {
	/// The sample number of a placeholder point
	pub const PLACEHOLDER: u64 = 0xFFFF_FFFF_FFFF_FFFF;

	/// The length of one encoded seek point
	pub const LEN: usize = 18;

	/// Is this a placeholder point?
	pub fn is_placeholder(&self) -> bool {
		self.sample_number == Self::PLACEHOLDER
	}
}

/// A seektable block in a flac file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlacSeektableBlock {
	/// The seek points in this table, in file order
	pub points: Vec<SeekPoint>,
}

impl FlacMetablockDecode for FlacSeektableBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);
		let mut points = Vec::new();

		// A partial point at the end is ignored
		while d.remaining() >= SeekPoint::LEN {
			points.push(SeekPoint {
				sample_number: d.read_u64(Endianness::Big)?,
				stream_offset: d.read_u64(Endianness::Big)?,
				frame_samples: d.read_u16(Endianness::Big)?,
			});
		}

		Ok(Self { points })
	}
}
