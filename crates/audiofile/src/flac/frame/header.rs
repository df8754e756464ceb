use serde::Serialize;

use super::{
	number::decode_coded_number,
	tables::{BlockSizeCode, ChannelAssignment, SampleRateCode, SampleSizeCode},
};
use crate::{
	common::cursor::{ByteCursor, Endianness},
	flac::{
		blocks::FlacStreaminfoBlock,
		crc::crc8,
		errors::{FlacDecodeError, FrameHeaderError},
	},
};

/// How a stream divides its samples into frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockingStrategy {
	/// Every frame (except maybe the last) has the same block size.
	/// Frame headers hold frame numbers.
	Fixed,

	/// Block sizes may change between frames.
	/// Frame headers hold sample numbers.
	Variable,
}

impl BlockingStrategy {
	/// Read the blocking strategy from the second byte of a frame
	pub fn from_sync_byte(byte: u8) -> Self {
		if byte & 0b0000_0001 == 0 {
			Self::Fixed
		} else {
			Self::Variable
		}
	}
}

/// The position of a frame in its stream, as stored in its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FramePosition {
	/// A zero-based frame number, used by fixed-blocksize streams
	FrameNumber(u64),

	/// The number of the first sample in this frame,
	/// used by variable-blocksize streams
	SampleNumber(u64),
}

/// A decoded frame header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlacFrame {
	/// The offset of this frame's first byte in the file
	pub offset: usize,

	/// The length of this frame's header, from the sync code through the CRC byte
	pub header_len: usize,

	/// The number of samples in this frame
	pub block_size: u32,

	/// This frame's sample rate, in Hz
	pub sample_rate: u32,

	/// This frame's channel layout
	pub channels: ChannelAssignment,

	/// Bits per sample
	pub bits_per_sample: u8,

	/// The frame or sample number in this frame's header
	pub position: FramePosition,
}

impl FlacFrame {
	/// This frame's sample rate, in kHz
	pub fn sample_rate_khz(&self) -> f64 {
		f64::from(self.sample_rate) / 1000.0
	}
}

/// Everything outside the frame that we need to decode a frame header
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
	/// The stream's streaminfo block. Escape codes fall back to this.
	pub streaminfo: &'a FlacStreaminfoBlock,

	/// The stream's blocking strategy
	pub strategy: BlockingStrategy,

	/// The number of frames we've accepted so far
	pub frames_accepted: u64,
}

/// Is there a frame sync code at `data[offset]`?
pub fn is_sync_code(data: &[u8], offset: usize) -> bool {
	matches!(
		data.get(offset..offset + 2),
		Some([0xFF, 0xF8..=0xFB])
	)
}

/// Try to decode the frame header at `data[offset]`.
///
/// On success, returns the frame and the offset of the first byte after its header.
/// This never modifies `ctx`, the caller decides what to do with the result.
pub fn decode_frame_header(
	data: &[u8],
	offset: usize,
	ctx: &FrameContext<'_>,
) -> Result<(FlacFrame, usize), FrameHeaderError> {
	let mut d = ByteCursor::new_at(data, offset);
	let header: [u8; 4] = d.read_array()?;

	if !is_sync_code(&header, 0) {
		return Err(FlacDecodeError::BadSyncBytes.into());
	}

	if BlockingStrategy::from_sync_byte(header[1]) != ctx.strategy {
		return Err(FlacDecodeError::BlockingStrategyMismatch.into());
	}

	let (number, number_len) = decode_coded_number(data, offset + 4)?;
	d.skip(number_len)?;

	let block_size = match BlockSizeCode::from_code(header[2] >> 4) {
		BlockSizeCode::Streaminfo => ctx.streaminfo.max_block_size,
		BlockSizeCode::Samples(x) => x,
		BlockSizeCode::ExtraByte => u32::from(d.read_u8()?) + 1,
		BlockSizeCode::ExtraWord => u32::from(d.read_u16(Endianness::Big)?) + 1,
	};

	let sample_rate = match SampleRateCode::from_code(header[2]) {
		SampleRateCode::Streaminfo => ctx.streaminfo.sample_rate,
		SampleRateCode::Hz(x) => x,
		SampleRateCode::ExtraKhzByte => u32::from(d.read_u8()?) * 1000,
		SampleRateCode::ExtraHzWord => u32::from(d.read_u16(Endianness::Big)?),
		SampleRateCode::ExtraDecaHzWord => u32::from(d.read_u16(Endianness::Big)?) * 10,
		SampleRateCode::Reserved => return Err(FlacDecodeError::ReservedSampleRate.into()),
	};

	let channels = ChannelAssignment::from_code(header[3] >> 4)?;

	let sample_size_code = (header[3] >> 1) & 0b111;
	let bits_per_sample = match SampleSizeCode::from_code(sample_size_code) {
		SampleSizeCode::Streaminfo => ctx.streaminfo.bits_per_sample,
		SampleSizeCode::Bits(x) => x,
		SampleSizeCode::Reserved => {
			return Err(FlacDecodeError::ReservedSampleSize(sample_size_code).into())
		}
	};

	let position = match ctx.strategy {
		BlockingStrategy::Fixed => {
			if number != ctx.frames_accepted {
				return Err(FlacDecodeError::OutOfSequenceFrame {
					expected: ctx.frames_accepted,
					found: number,
				}
				.into());
			}
			FramePosition::FrameNumber(number)
		}
		BlockingStrategy::Variable => FramePosition::SampleNumber(number),
	};

	let crc_offset = d.position();
	let stored = d.read_u8()?;
	let computed = crc8(&data[offset..crc_offset]);
	if computed != stored {
		return Err(FrameHeaderError::Checksum { computed, stored });
	}

	let next = d.position();
	return Ok((
		FlacFrame {
			offset,
			header_len: next - offset,
			block_size,
			sample_rate,
			channels,
			bits_per_sample,
			position,
		},
		next,
	));
}
