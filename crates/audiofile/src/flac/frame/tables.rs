//! Lookup tables for the packed fields of a frame header.
//!
//! Each code maps to a value, to "use the streaminfo value",
//! to "read the value from extra header bytes", or to "reserved".

use serde_with::SerializeDisplay;
use std::fmt::Display;

use crate::flac::errors::FlacDecodeError;

/// The meaning of a 4-bit block size code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSizeCode {
	/// Use the streaminfo maximum block size
	Streaminfo,

	/// A block size in samples
	Samples(u32),

	/// Read an 8-bit (block size - 1) after the coded number
	ExtraByte,

	/// Read a 16-bit (block size - 1) after the coded number
	ExtraWord,
}

impl BlockSizeCode {
	/// Look up a block size code. Only the low four bits are used.
	pub fn from_code(code: u8) -> Self {
		return match code & 0x0F {
			0 => Self::Streaminfo,
			1 => Self::Samples(192),
			x @ 2..=5 => Self::Samples(576 << (x - 2)),
			6 => Self::ExtraByte,
			7 => Self::ExtraWord,
			x => Self::Samples(256 << (x - 8)),
		};
	}
}

/// The meaning of a 4-bit sample rate code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRateCode {
	/// Use the streaminfo sample rate
	Streaminfo,

	/// A sample rate in Hz
	Hz(u32),

	/// Read an 8-bit sample rate in kHz
	ExtraKhzByte,

	/// Read a 16-bit sample rate in Hz
	ExtraHzWord,

	/// Read a 16-bit sample rate in tens of Hz
	ExtraDecaHzWord,

	/// Invalid, to prevent sync-fooling strings of 1s
	Reserved,
}

impl SampleRateCode {
	/// Look up a sample rate code. Only the low four bits are used.
	pub fn from_code(code: u8) -> Self {
		return match code & 0x0F {
			0 => Self::Streaminfo,
			1 => Self::Hz(88_200),
			2 => Self::Hz(176_400),
			3 => Self::Hz(192_000),
			4 => Self::Hz(8_000),
			5 => Self::Hz(16_000),
			6 => Self::Hz(22_050),
			7 => Self::Hz(24_000),
			8 => Self::Hz(32_000),
			9 => Self::Hz(44_100),
			10 => Self::Hz(48_000),
			11 => Self::Hz(96_000),
			12 => Self::ExtraKhzByte,
			13 => Self::ExtraHzWord,
			14 => Self::ExtraDecaHzWord,
			_ => Self::Reserved,
		};
	}
}

/// The meaning of a 3-bit sample size code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSizeCode {
	/// Use the streaminfo bits per sample
	Streaminfo,

	/// Bits per sample
	Bits(u8),

	/// Reserved
	Reserved,
}

impl SampleSizeCode {
	/// Look up a sample size code. Only the low three bits are used.
	pub fn from_code(code: u8) -> Self {
		return match code & 0x07 {
			0 => Self::Streaminfo,
			1 => Self::Bits(8),
			2 => Self::Bits(12),
			4 => Self::Bits(16),
			5 => Self::Bits(20),
			6 => Self::Bits(24),
			_ => Self::Reserved,
		};
	}
}

/// How a frame's channels are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay)]
pub enum ChannelAssignment {
	/// Independent channels. Holds the channel count.
	Independent(u8),

	/// Left and side channels
	LeftSide,

	/// Right and side channels
	RightSide,

	/// Mid and side channels
	MidSide,
}

impl ChannelAssignment {
	/// Look up a 4-bit channel assignment code
	pub fn from_code(code: u8) -> Result<Self, FlacDecodeError> {
		return Ok(match code & 0x0F {
			x @ 0..=7 => Self::Independent(x + 1),
			8 => Self::LeftSide,
			9 => Self::RightSide,
			10 => Self::MidSide,
			x => return Err(FlacDecodeError::ReservedChannelAssignment(x)),
		});
	}

	/// The number of channels in this assignment
	pub fn channels(&self) -> u8 {
		match self {
			Self::Independent(x) => *x,
			Self::LeftSide | Self::RightSide | Self::MidSide => 2,
		}
	}
}

impl Display for ChannelAssignment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Independent(x) => write!(f, "{x}"),
			Self::LeftSide => write!(f, "left/side stereo"),
			Self::RightSide => write!(f, "right/side stereo"),
			Self::MidSide => write!(f, "mid/side stereo"),
		}
	}
}
