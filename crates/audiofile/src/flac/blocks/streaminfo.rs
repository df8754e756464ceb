use serde::Serialize;

use crate::{
	common::cursor::{BitReader, BitWriter, ByteCursor, Endianness},
	flac::errors::{FlacDecodeError, FlacEncodeError},
};

use super::{FlacMetablockDecode, FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType};

/// A streaminfo block in a flac file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlacStreaminfoBlock {
	/// The minimum block size (in samples) used in the stream.
	pub min_block_size: u32,

	/// The maximum block size (in samples) used in the stream.
	/// (Minimum blocksize == maximum blocksize) implies a fixed-blocksize stream.
	pub max_block_size: u32,

	/// The minimum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub min_frame_size: u32,

	/// The maximum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub max_frame_size: u32,

	/// Sample rate in Hz.
	/// Zero is out of spec, but we decode it anyway.
	pub sample_rate: u32,

	/// Number of channels. FLAC supports from 1 to 8 channels
	pub channels: u8,

	/// Bits per sample. FLAC supports from 4 to 32 bits per sample.
	pub bits_per_sample: u8,

	/// Total samples in stream.
	/// 'Samples' means inter-channel sample, i.e. one second of 44.1Khz audio
	/// will have 44100 samples regardless of the number of channels.
	/// A value of zero here means the number of total samples is unknown.
	pub total_samples: u64,

	/// MD5 signature of the unencoded audio data.
	pub md5_signature: [u8; 16],
}

impl FlacStreaminfoBlock {
	/// The length of a streaminfo block, without its header
	pub const LEN: u32 = 34;
}

impl FlacMetablockDecode for FlacStreaminfoBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		let min_block_size = d.read_u16(Endianness::Big)?.into();
		let max_block_size = d.read_u16(Endianness::Big)?.into();
		let min_frame_size = d.read_u24(Endianness::Big)?;
		let max_frame_size = d.read_u24(Endianness::Big)?;

		let packed = d.read_bytes(8)?;
		let mut bits = BitReader::new(packed);

		// These reads can't fail, `packed` is exactly 64 bits.
		let sample_rate = bits.read_bits(20)? as u32;
		let channels = bits.read_bits(3)? as u8 + 1;
		let bits_per_sample = bits.read_bits(5)? as u8 + 1;
		let total_samples = bits.read_bits(36)?;

		let md5_signature = d.read_array::<16>()?;

		Ok(Self {
			min_block_size,
			max_block_size,
			min_frame_size,
			max_frame_size,
			sample_rate,
			channels,
			bits_per_sample,
			total_samples,
			md5_signature,
		})
	}
}

impl FlacMetablockEncode for FlacStreaminfoBlock {
	fn get_len(&self) -> u32 {
		Self::LEN
	}

	fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl std::io::Write,
	) -> Result<(), FlacEncodeError> {
		if with_header {
			let header = FlacMetablockHeader {
				block_type: FlacMetablockType::Streaminfo,
				length: self.get_len(),
				is_last,
			};
			header.encode(target)?;
		}

		let mut w = BitWriter::new();
		w.write_bits(self.min_block_size.into(), 16);
		w.write_bits(self.max_block_size.into(), 16);
		w.write_bits(self.min_frame_size.into(), 24);
		w.write_bits(self.max_frame_size.into(), 24);
		w.write_bits(self.sample_rate.into(), 20);
		w.write_bits(u64::from(self.channels.saturating_sub(1)), 3);
		w.write_bits(u64::from(self.bits_per_sample.saturating_sub(1)), 5);
		w.write_bits(self.total_samples, 36);

		target.write_all(&w.finish())?;
		target.write_all(&self.md5_signature)?;

		return Ok(());
	}
}
