//! Read metadata and frame headers from flac files.
//!
//! Start with [`AudioStream::open`].

pub mod blockindex;
pub mod blocks;
pub mod crc;
pub mod errors;
pub mod frame;
pub mod options;

mod stream;
pub use stream::{AudioStream, FlacBlockError};

/// Builders for test data.
/// These write flac structures byte by byte, without going through our decoders.
#[cfg(test)]
pub(crate) mod tests {
	use super::{
		blockindex::FLAC_MAGIC,
		blocks::{FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType, FlacStreaminfoBlock},
		crc::crc8,
		frame::encode_coded_number,
	};

	/// A streaminfo block with the given properties, with a header.
	pub fn encode_streaminfo(
		block_size: u32,
		sample_rate: u32,
		channels: u8,
		bits_per_sample: u8,
		total_samples: u64,
	) -> Vec<u8> {
		let si = FlacStreaminfoBlock {
			min_block_size: block_size,
			max_block_size: block_size,
			min_frame_size: 0,
			max_frame_size: 0,
			sample_rate,
			channels,
			bits_per_sample,
			total_samples,
			md5_signature: [0; 16],
		};

		let mut out = Vec::new();
		si.encode(true, true, &mut out).unwrap();
		out
	}

	/// The streaminfo block most tests use: 4096-sample blocks of 16-bit stereo at 44.1kHz
	pub fn test_streaminfo() -> FlacStreaminfoBlock {
		FlacStreaminfoBlock {
			min_block_size: 4096,
			max_block_size: 4096,
			min_frame_size: 14,
			max_frame_size: 16_384,
			sample_rate: 44_100,
			channels: 2,
			bits_per_sample: 16,
			total_samples: 0,
			md5_signature: [0; 16],
		}
	}

	/// A metablock header followed by `content`
	pub fn encode_block(block_type: FlacMetablockType, is_last: bool, content: &[u8]) -> Vec<u8> {
		let header = FlacMetablockHeader {
			block_type,
			length: content.len().try_into().unwrap(),
			is_last,
		};

		let mut out = Vec::new();
		header.encode(&mut out).unwrap();
		out.extend(content);
		out
	}

	/// A vorbis comment with the given raw `NAME=value` entries
	pub fn encode_comment(vendor: &str, entries: &[&str]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend(u32::try_from(vendor.len()).unwrap().to_le_bytes());
		out.extend(vendor.as_bytes());
		out.extend(u32::try_from(entries.len()).unwrap().to_le_bytes());
		for e in entries {
			out.extend(u32::try_from(e.len()).unwrap().to_le_bytes());
			out.extend(e.as_bytes());
		}
		out
	}

	/// A 500x400 24-bit picture block
	pub fn encode_picture(picture_type: u32, mime: &str, description: &str, img: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend(picture_type.to_be_bytes());
		out.extend(u32::try_from(mime.len()).unwrap().to_be_bytes());
		out.extend(mime.as_bytes());
		out.extend(u32::try_from(description.len()).unwrap().to_be_bytes());
		out.extend(description.as_bytes());
		out.extend(500u32.to_be_bytes());
		out.extend(400u32.to_be_bytes());
		out.extend(24u32.to_be_bytes());
		out.extend(0u32.to_be_bytes());
		out.extend(u32::try_from(img.len()).unwrap().to_be_bytes());
		out.extend(img);
		out
	}

	/// A track in a test cuesheet
	pub struct TestTrack {
		pub offset: u64,
		pub number: u8,
		pub isrc: &'static str,
		pub flags: u8,

		/// `(offset, number)`
		pub indices: &'static [(u64, u8)],
	}

	fn padded(s: &str, len: usize) -> Vec<u8> {
		let mut out = s.as_bytes().to_vec();
		assert!(out.len() <= len);
		out.resize(len, 0);
		out
	}

	pub fn encode_cuesheet(catalog: &str, lead_in: u64, is_cd: bool, tracks: &[TestTrack]) -> Vec<u8> {
		let mut out = padded(catalog, 128);
		out.extend(lead_in.to_be_bytes());
		out.push(if is_cd { 0b1000_0000 } else { 0 });
		out.extend([0u8; 258]);
		out.push(tracks.len().try_into().unwrap());

		for t in tracks {
			out.extend(t.offset.to_be_bytes());
			out.push(t.number);
			out.extend(padded(t.isrc, 12));
			out.push(t.flags);
			out.extend([0u8; 13]);
			out.push(t.indices.len().try_into().unwrap());

			for (offset, number) in t.indices {
				out.extend(offset.to_be_bytes());
				out.push(*number);
				out.extend([0u8; 3]);
			}
		}

		out
	}

	/// The raw fields of a frame header.
	/// Codes are written as-is, so reserved values may be used.
	#[derive(Debug, Clone)]
	pub struct TestFrame {
		pub variable: bool,
		pub block_size_code: u8,
		pub sample_rate_code: u8,
		pub channel_code: u8,
		pub sample_size_code: u8,

		/// Frame number or sample number, depending on `variable`
		pub number: u64,

		/// Written after the coded number, before the crc
		pub extra: Vec<u8>,
	}

	impl Default for TestFrame {
		fn default() -> Self {
			// 4096 samples, 44.1kHz, stereo, 16 bits
			Self {
				variable: false,
				block_size_code: 12,
				sample_rate_code: 9,
				channel_code: 1,
				sample_size_code: 4,
				number: 0,
				extra: Vec::new(),
			}
		}
	}

	/// A frame header with a correct crc
	pub fn encode_frame_header(frame: &TestFrame) -> Vec<u8> {
		let mut out = vec![
			0xFF,
			0xF8 | u8::from(frame.variable),
			(frame.block_size_code << 4) | (frame.sample_rate_code & 0x0F),
			(frame.channel_code << 4) | ((frame.sample_size_code & 0b111) << 1),
		];
		out.extend(encode_coded_number(frame.number).unwrap());
		out.extend(&frame.extra);
		out.push(crc8(&out));
		out
	}

	/// Assembles a complete flac file
	pub struct FlacBuilder {
		blocks: Vec<(FlacMetablockType, Vec<u8>)>,
		audio: Vec<u8>,
	}

	impl FlacBuilder {
		/// A file that starts with a 16-bit stereo 44.1kHz streaminfo block
		pub fn new() -> Self {
			let si = encode_streaminfo(4096, 44_100, 2, 16, 0);
			Self::without_streaminfo()
				.block(FlacMetablockType::Streaminfo, &si[FlacMetablockHeader::LEN..])
		}

		pub fn without_streaminfo() -> Self {
			Self {
				blocks: Vec::new(),
				audio: Vec::new(),
			}
		}

		pub fn block(mut self, block_type: FlacMetablockType, content: &[u8]) -> Self {
			self.blocks.push((block_type, content.to_vec()));
			self
		}

		pub fn audio(mut self, audio: &[u8]) -> Self {
			self.audio.extend(audio);
			self
		}

		/// Write this file. The final block is marked as last.
		pub fn build(self) -> Vec<u8> {
			let mut out = FLAC_MAGIC.to_vec();
			let n = self.blocks.len();
			for (i, (block_type, content)) in self.blocks.into_iter().enumerate() {
				out.extend(encode_block(block_type, i + 1 == n, &content));
			}
			out.extend(self.audio);
			out
		}
	}
}
