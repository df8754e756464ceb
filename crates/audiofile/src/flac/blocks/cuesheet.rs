use serde::Serialize;

use crate::{
	common::cursor::{ByteCursor, Endianness},
	flac::errors::FlacDecodeError,
};

use super::FlacMetablockDecode;

/// An index point in a cuesheet track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CuesheetIndex {
	/// Offset in samples, relative to the track offset
	pub offset: u64,

	/// The index point number
	pub number: u8,
}

/// A track in a cuesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuesheetTrack {
	/// Offset in samples, relative to the beginning of the stream
	pub offset: u64,

	/// Track number
	pub number: u8,

	/// This track's ISRC, without padding.
	/// Empty if there is none.
	pub isrc: String,

	/// False if this is a data track
	pub is_audio: bool,

	/// True if this track has pre-emphasis
	pub pre_emphasis: bool,

	/// This track's index points, in file order
	pub indices: Vec<CuesheetIndex>,
}

/// A cuesheet meta in a flac file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlacCuesheetBlock {
	/// The media catalog number, without padding
	pub catalog_number: String,

	/// The number of lead-in samples
	pub lead_in: u64,

	/// True if this cuesheet corresponds to a compact disc
	pub is_cd: bool,

	/// Tracks, in file order
	pub tracks: Vec<CuesheetTrack>,
}

/// Decode a fixed-width, NUL-padded string field
fn padded_string(data: &[u8]) -> Result<String, FlacDecodeError> {
	let mut s = String::from_utf8(data.to_vec())?;
	let len = s.trim_end_matches('\0').len();
	s.truncate(len);
	return Ok(s);
}

impl FlacMetablockDecode for FlacCuesheetBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		let catalog_number = padded_string(d.read_bytes(128)?)?;
		let lead_in = d.read_u64(Endianness::Big)?;
		let is_cd = d.read_u8()? & 0b1000_0000 != 0;
		d.skip(258)?;
		let n_tracks = d.read_u8()?;

		let mut tracks = Vec::with_capacity(n_tracks.into());
		for _ in 0..n_tracks {
			let offset = d.read_u64(Endianness::Big)?;
			let number = d.read_u8()?;
			let isrc = padded_string(d.read_bytes(12)?)?;

			let flags = d.read_u8()?;
			let is_audio = flags & 0b1000_0000 == 0;
			let pre_emphasis = flags & 0b0100_0000 != 0;

			d.skip(13)?;
			let n_indices = d.read_u8()?;

			let mut indices = Vec::with_capacity(n_indices.into());
			for _ in 0..n_indices {
				let offset = d.read_u64(Endianness::Big)?;
				let number = d.read_u8()?;
				d.skip(3)?;
				indices.push(CuesheetIndex { offset, number });
			}

			tracks.push(CuesheetTrack {
				offset,
				number,
				isrc,
				is_audio,
				pre_emphasis,
				indices,
			});
		}

		Ok(Self {
			catalog_number,
			lead_in,
			is_cd,
			tracks,
		})
	}
}
