//! Decode Vorbis comment blocks

use base64::Engine;
use serde::Serialize;
use smartstring::{LazyCompact, SmartString};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

use super::cursor::{ByteCursor, Endianness};
use crate::flac::{
	blocks::{FlacMetablockDecode, FlacPictureBlock},
	errors::FlacDecodeError,
};

/// The tag that carries base64-encoded FLAC picture blocks
pub const PICTURE_TAG: &str = "METADATA_BLOCK_PICTURE";

/// A decoded vorbis comment block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VorbisComment {
	/// This comment's vendor string
	pub vendor: SmartString<LazyCompact>,

	/// Map of tag name to the set of values for that tag.
	///
	/// Tag names are stored exactly as they appear in the file.
	/// Repeated tags are allowed, repeated values are not.
	pub tags: BTreeMap<SmartString<LazyCompact>, BTreeSet<String>>,
}

impl VorbisComment {
	/// Try to decode the given data as a vorbis comment block
	pub fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		// Unlike the rest of FLAC, vorbis comments are little-endian.
		let vendor = String::from_utf8(d.read_prefixed(Endianness::Little)?.to_vec())?;
		let n_comments = d.read_u32(Endianness::Little)?;

		let mut tags: BTreeMap<SmartString<LazyCompact>, BTreeSet<String>> = BTreeMap::new();
		for _ in 0..n_comments {
			let comment = String::from_utf8(d.read_prefixed(Endianness::Little)?.to_vec())?;

			let (var, val) = match comment.split_once('=') {
				Some((var, val)) if !var.is_empty() && !val.is_empty() => (var, val),
				_ => {
					trace!(message = "Dropping malformed vorbis comment", %comment);
					continue;
				}
			};

			tags.entry(var.into()).or_default().insert(val.into());
		}

		Ok(Self {
			vendor: vendor.into(),
			tags,
		})
	}

	/// Get all values of the given tag.
	/// `name` must match exactly.
	pub fn get_tag(&self, name: &str) -> Option<&BTreeSet<String>> {
		self.tags.get(name)
	}

	/// Get all values of every tag named `name`, ignoring case.
	pub fn get_tag_ignore_case<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.tags
			.iter()
			.filter(move |(k, _)| k.eq_ignore_ascii_case(name))
			.flat_map(|(_, v)| v.iter().map(|x| x.as_str()))
	}

	/// The total number of distinct (name, value) pairs in this comment
	pub fn len(&self) -> usize {
		self.tags.values().map(|x| x.len()).sum()
	}

	/// True if this comment has no tags
	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}

	/// Decode every picture stored in a [`PICTURE_TAG`] tag.
	///
	/// Pictures are decoded lazily, and each may fail on its own.
	/// Tag values are left untouched.
	pub fn pictures(&self) -> impl Iterator<Item = Result<FlacPictureBlock, FlacDecodeError>> + '_ {
		self.get_tag_ignore_case(PICTURE_TAG).map(|val| -> Result<_, FlacDecodeError> {
			let data = base64::prelude::BASE64_STANDARD.decode(val)?;
			FlacPictureBlock::decode(&data)
		})
	}
}
