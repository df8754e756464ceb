//! Find the metadata blocks in a flac file.
//!
//! The index only records where blocks are.
//! It never looks inside them.

use std::ops::Range;
use tracing::{debug, warn};

use super::{
	blocks::{FlacMetablockHeader, FlacMetablockType},
	errors::FlacOpenError,
};
use crate::common::cursor::ByteCursor;

/// The first four bytes of every flac file
pub const FLAC_MAGIC: [u8; 4] = *b"fLaC";

/// A metadata block we saw while building a [`FlacBlockIndex`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBlock {
	/// This block's header
	pub header: FlacMetablockHeader,

	/// The offset of this block's header
	pub offset: usize,

	/// The byte range of this block's content, without its header
	pub content: Range<usize>,
}

/// The locations of all metadata blocks in a flac file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlacBlockIndex {
	/// The streaminfo block
	pub streaminfo: Option<Range<usize>>,

	/// The first seektable block
	pub seektable: Option<Range<usize>>,

	/// The first vorbis comment block
	pub comment: Option<Range<usize>>,

	/// The first cuesheet block
	pub cuesheet: Option<Range<usize>>,

	/// All picture blocks, in file order
	pub pictures: Vec<Range<usize>>,

	/// Every block we saw, in file order.
	/// This includes padding, application, and unknown blocks.
	pub blocks: Vec<IndexedBlock>,

	/// The offset of the first byte after the last metadata block.
	/// Audio frames start here.
	pub first_frame_offset: usize,
}

impl FlacBlockIndex {
	/// Walk the metadata blocks of the flac file in `data`
	pub fn build(data: &[u8]) -> Result<Self, FlacOpenError> {
		if data.get(0..4) != Some(&FLAC_MAGIC[..]) {
			return Err(FlacOpenError::BadMagicBytes);
		}

		let mut index = Self::default();
		let mut d = ByteCursor::new_at(data, FLAC_MAGIC.len());

		loop {
			let offset = d.position();

			#[expect(clippy::map_err_ignore)]
			let header = d
				.read_bytes(FlacMetablockHeader::LEN)
				.map_err(|_| FlacOpenError::TruncatedMetablock { offset })?;

			// `header` is always four bytes long, this can't fail.
			#[expect(clippy::map_err_ignore)]
			let header = FlacMetablockHeader::decode(header)
				.map_err(|_| FlacOpenError::TruncatedMetablock { offset })?;

			let start = d.position();

			#[expect(clippy::map_err_ignore)]
			d.skip(header.length as usize)
				.map_err(|_| FlacOpenError::TruncatedMetablock { offset })?;

			let content = start..d.position();

			debug!(
				message = "Found metablock",
				block_type = ?header.block_type,
				offset,
				length = header.length,
				is_last = header.is_last,
			);

			let slot = match header.block_type {
				FlacMetablockType::Streaminfo => Some(&mut index.streaminfo),
				FlacMetablockType::Seektable => Some(&mut index.seektable),
				FlacMetablockType::VorbisComment => Some(&mut index.comment),
				FlacMetablockType::Cuesheet => Some(&mut index.cuesheet),
				FlacMetablockType::Picture => {
					index.pictures.push(content.clone());
					None
				}
				FlacMetablockType::Padding
				| FlacMetablockType::Application
				| FlacMetablockType::Unknown(_) => None,
			};

			if let Some(slot) = slot {
				if slot.is_some() {
					warn!(
						message = "Ignoring duplicate metablock",
						block_type = ?header.block_type,
						offset,
					);
				} else {
					*slot = Some(content.clone());
				}
			}

			let is_last = header.is_last;
			index.blocks.push(IndexedBlock {
				header,
				offset,
				content,
			});

			if is_last {
				break;
			}
		}

		index.first_frame_offset = d.position();
		return Ok(index);
	}
}
