//! FLAC metablock headers
use serde::Serialize;

use crate::flac::errors::{FlacDecodeError, FlacEncodeError};

/// A type of flac metadata block
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum FlacMetablockType {
	/// Stream parameters. Always present.
	Streaminfo,

	/// Zeroed space for later edits
	Padding,

	/// Data for a third-party application
	Application,

	/// Seek points
	Seektable,

	/// Vorbis comment tags
	VorbisComment,

	/// A cue sheet
	Cuesheet,

	/// An embedded picture
	Picture,

	/// A block type code we don't know.
	/// These are skipped, not rejected.
	Unknown(u8),
}

impl FlacMetablockType {
	/// Map the low seven bits of a block header's first byte to a block type
	pub fn from_id(id: u8) -> Self {
		return match id & 0b0111_1111 {
			0 => FlacMetablockType::Streaminfo,
			1 => FlacMetablockType::Padding,
			2 => FlacMetablockType::Application,
			3 => FlacMetablockType::Seektable,
			4 => FlacMetablockType::VorbisComment,
			5 => FlacMetablockType::Cuesheet,
			6 => FlacMetablockType::Picture,
			x => FlacMetablockType::Unknown(x),
		};
	}

	/// The seven-bit type code of this block type
	pub fn to_id(&self) -> u8 {
		return match self {
			FlacMetablockType::Streaminfo => 0,
			FlacMetablockType::Padding => 1,
			FlacMetablockType::Application => 2,
			FlacMetablockType::Seektable => 3,
			FlacMetablockType::VorbisComment => 4,
			FlacMetablockType::Cuesheet => 5,
			FlacMetablockType::Picture => 6,
			FlacMetablockType::Unknown(x) => x & 0b0111_1111,
		};
	}
}

/// The header of a flac metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacMetablockHeader {
	/// The type of block this is
	pub block_type: FlacMetablockType,

	/// The length of this block, in bytes
	/// (not including this header)
	pub length: u32,

	/// If true, this is the last metadata block
	pub is_last: bool,
}

impl FlacMetablockHeader {
	/// The length of an encoded header, in bytes
	pub const LEN: usize = 4;

	/// Try to decode the given bytes as a flac metablock header
	pub fn decode(header: &[u8]) -> Result<Self, FlacDecodeError> {
		if header.len() != Self::LEN {
			return Err(FlacDecodeError::MalformedBlock);
		}

		return Ok(Self {
			block_type: FlacMetablockType::from_id(header[0]),
			length: u32::from_be_bytes([0, header[1], header[2], header[3]]),
			is_last: header[0] & 0b1000_0000 == 0b1000_0000,
		});
	}

	/// Try to encode this header
	pub fn encode(&self, target: &mut impl std::io::Write) -> Result<(), FlacEncodeError> {
		let mut block_type = self.block_type.to_id();
		if self.is_last {
			block_type |= 0b1000_0000;
		};

		let x = self.length.to_be_bytes();
		target.write_all(&[block_type, x[1], x[2], x[3]])?;

		return Ok(());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decode_header() {
		let h = FlacMetablockHeader::decode(&[0x84, 0x00, 0x01, 0x02]).unwrap();
		assert_eq!(h.block_type, FlacMetablockType::VorbisComment);
		assert_eq!(h.length, 0x0102);
		assert!(h.is_last);

		let h = FlacMetablockHeader::decode(&[0x7F, 0xFF, 0xFF, 0xFF]).unwrap();
		assert_eq!(h.block_type, FlacMetablockType::Unknown(127));
		assert_eq!(h.length, 0xFF_FFFF);
		assert!(!h.is_last);

		assert!(FlacMetablockHeader::decode(&[0x00, 0x00, 0x22]).is_err());
	}

	#[test]
	fn encode_header() {
		let h = FlacMetablockHeader {
			block_type: FlacMetablockType::Picture,
			length: 1000,
			is_last: true,
		};

		let mut out = Vec::new();
		h.encode(&mut out).unwrap();
		assert_eq!(out, [0x86, 0x00, 0x03, 0xE8]);
		assert_eq!(FlacMetablockHeader::decode(&out).unwrap(), h);
	}
}
