use serde::Serialize;
use smartstring::{LazyCompact, SmartString};
use std::fmt::Debug;

use crate::{
	common::{
		cursor::{ByteCursor, Endianness},
		picturetype::PictureType,
	},
	flac::errors::FlacDecodeError,
};

use super::FlacMetablockDecode;

/// A picture metablock in a flac file
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct FlacPictureBlock {
	/// The type of this picture
	pub picture_type: PictureType,

	/// The format of this picture
	pub mime: SmartString<LazyCompact>,

	/// The description of this picture
	pub description: String,

	/// The width of this picture, in px
	pub width: u32,

	/// The height of this picture, in px
	pub height: u32,

	/// The bit depth of this picture
	pub bit_depth: u32,

	/// The color count of this picture (if indexed)
	pub color_count: u32,

	/// The image data
	#[serde(skip)]
	pub img_data: Vec<u8>,
}

impl Debug for FlacPictureBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlacPicture")
			.field("type", &self.picture_type)
			.field("mime", &self.mime)
			.field("img_data_len", &self.img_data.len())
			.finish()
	}
}

impl FlacPictureBlock {
	/// The file extension of this picture, taken from its mime type.
	/// `image/png` gives `png`.
	pub fn extension(&self) -> &str {
		// `decode` makes sure this `/` exists
		self.mime.split_once('/').map(|(_, ext)| ext).unwrap_or("")
	}

	/// This picture's raw image data
	pub fn img_data(&self) -> &[u8] {
		&self.img_data
	}
}

impl FlacMetablockDecode for FlacPictureBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		let picture_type = PictureType::from_idx(d.read_u32(Endianness::Big)?);

		let mime = String::from_utf8(d.read_prefixed(Endianness::Big)?.to_vec())?;
		match mime.split_once('/') {
			Some((kind, ext)) if !kind.is_empty() && !ext.is_empty() => {}
			_ => return Err(FlacDecodeError::BadMimeType(mime)),
		}

		let description = String::from_utf8(d.read_prefixed(Endianness::Big)?.to_vec())?;

		let width = d.read_u32(Endianness::Big)?;
		let height = d.read_u32(Endianness::Big)?;
		let bit_depth = d.read_u32(Endianness::Big)?;
		let color_count = d.read_u32(Endianness::Big)?;

		let img_data = d.read_prefixed(Endianness::Big)?.to_vec();

		Ok(Self {
			picture_type,
			mime: mime.into(),
			description,
			width,
			height,
			bit_depth,
			color_count,
			img_data,
		})
	}
}
