//! A decoded flac file
use bytes::Bytes;
use serde::Serialize;
use std::ops::Range;
use tracing::{debug, warn};

use super::{
	blockindex::FlacBlockIndex,
	blocks::{
		FlacCommentBlock, FlacCuesheetBlock, FlacMetablockDecode, FlacMetablockType,
		FlacPictureBlock, FlacSeektableBlock, FlacStreaminfoBlock, SeekPoint,
	},
	errors::{FlacDecodeError, FlacOpenError, FlacScanError},
	frame::{BlockingStrategy, FlacFrame, FrameScanReport, FrameScanner},
	options::FlacReadOptions,
};
use crate::common::vorbiscomment::VorbisComment;

/// A metadata block that we found but couldn't decode
#[derive(Debug)]
pub struct FlacBlockError {
	/// The type of the block that failed
	pub block_type: FlacMetablockType,

	/// The content range of the block that failed
	pub range: Range<usize>,

	/// What went wrong
	pub error: FlacDecodeError,
}

/// A flac file and its decoded metadata.
///
/// Metadata is decoded when the stream is opened.
/// Frame headers are only decoded by [`AudioStream::scan_frames`].
#[derive(Debug, Serialize)]
pub struct AudioStream {
	#[serde(skip)]
	data: Bytes,

	#[serde(skip)]
	index: FlacBlockIndex,

	#[serde(skip)]
	block_errors: Vec<FlacBlockError>,

	stream_info: FlacStreaminfoBlock,
	tags: Option<VorbisComment>,
	pictures: Vec<FlacPictureBlock>,
	comment_pictures: Vec<FlacPictureBlock>,
	cue_sheet: Option<FlacCuesheetBlock>,
	seek_table: Vec<SeekPoint>,
	first_frame_offset: usize,

	frames: Vec<FlacFrame>,
	scan_report: Option<FrameScanReport>,
}

/// Decode one optional block.
/// Failures are logged and recorded in `errors`.
fn decode_isolated<T: FlacMetablockDecode>(
	data: &[u8],
	block_type: FlacMetablockType,
	range: &Range<usize>,
	errors: &mut Vec<FlacBlockError>,
) -> Option<T> {
	match T::decode(&data[range.clone()]) {
		Ok(x) => Some(x),
		Err(error) => {
			warn!(
				message = "Could not decode metablock",
				?block_type,
				offset = range.start,
				%error
			);
			errors.push(FlacBlockError {
				block_type,
				range: range.clone(),
				error,
			});
			None
		}
	}
}

impl AudioStream {
	/// Open the flac file in `data` with default options.
	pub fn open(data: impl Into<Bytes>) -> Result<Self, FlacOpenError> {
		Self::open_with_options(data, &FlacReadOptions::default())
	}

	/// Open the flac file in `data`.
	///
	/// This decodes every metadata block, but doesn't look at audio frames.
	/// Only a bad file signature, a truncated block chain, or a missing or
	/// undecodable streaminfo block is an error. Other blocks that fail to
	/// decode are skipped and recorded in [`AudioStream::block_errors`].
	pub fn open_with_options(
		data: impl Into<Bytes>,
		options: &FlacReadOptions,
	) -> Result<Self, FlacOpenError> {
		let data: Bytes = data.into();
		let index = FlacBlockIndex::build(&data)?;

		if options.require_streaminfo_first {
			match index.blocks.first() {
				Some(b) if b.header.block_type == FlacMetablockType::Streaminfo => {}
				_ => return Err(FlacOpenError::BadFirstBlock),
			}
		}

		let stream_info = {
			let range = index
				.streaminfo
				.as_ref()
				.ok_or(FlacOpenError::MissingStreaminfo)?;
			FlacStreaminfoBlock::decode(&data[range.clone()]).map_err(FlacOpenError::Streaminfo)?
		};

		let mut block_errors = Vec::new();

		let tags = index.comment.as_ref().and_then(|r| {
			decode_isolated::<FlacCommentBlock>(
				&data,
				FlacMetablockType::VorbisComment,
				r,
				&mut block_errors,
			)
			.map(|x| x.comment)
		});

		let pictures = index
			.pictures
			.iter()
			.filter_map(|r| {
				decode_isolated::<FlacPictureBlock>(
					&data,
					FlacMetablockType::Picture,
					r,
					&mut block_errors,
				)
			})
			.collect();

		let mut comment_pictures = Vec::new();
		if options.decode_comment_pictures {
			if let (Some(tags), Some(range)) = (&tags, &index.comment) {
				for p in tags.pictures() {
					match p {
						Ok(p) => comment_pictures.push(p),
						Err(error) => {
							warn!(
								message = "Could not decode picture in vorbis comment",
								offset = range.start,
								%error
							);
							block_errors.push(FlacBlockError {
								block_type: FlacMetablockType::VorbisComment,
								range: range.clone(),
								error,
							});
						}
					}
				}
			}
		}

		let cue_sheet = index.cuesheet.as_ref().and_then(|r| {
			decode_isolated::<FlacCuesheetBlock>(
				&data,
				FlacMetablockType::Cuesheet,
				r,
				&mut block_errors,
			)
		});

		let seek_table = index
			.seektable
			.as_ref()
			.and_then(|r| {
				decode_isolated::<FlacSeektableBlock>(
					&data,
					FlacMetablockType::Seektable,
					r,
					&mut block_errors,
				)
			})
			.map(|x| x.points)
			.unwrap_or_default();

		debug!(
			message = "Opened flac stream",
			blocks = index.blocks.len(),
			pictures = index.pictures.len(),
			block_errors = block_errors.len(),
			first_frame_offset = index.first_frame_offset,
		);

		Ok(Self {
			first_frame_offset: index.first_frame_offset,
			data,
			index,
			block_errors,
			stream_info,
			tags,
			pictures,
			comment_pictures,
			cue_sheet,
			seek_table,
			frames: Vec::new(),
			scan_report: None,
		})
	}

	/// Find and decode every frame header in this stream.
	///
	/// This may only be called once.
	pub fn scan_frames(&mut self) -> Result<&FrameScanReport, FlacScanError> {
		if self.scan_report.is_some() {
			return Err(FlacScanError::AlreadyScanned);
		}

		let mut scanner = FrameScanner::new(&self.data, self.first_frame_offset, &self.stream_info);
		self.frames.extend(scanner.by_ref());
		let report = scanner.into_report();

		let report = &*self.scan_report.insert(report);
		return Ok(report);
	}

	/// Iterate over the frame headers in this stream without storing them.
	pub fn frame_iter(&self) -> FrameScanner<'_> {
		FrameScanner::new(&self.data, self.first_frame_offset, &self.stream_info)
	}
}

// MARK: accessors

impl AudioStream {
	/// The raw bytes of this file
	pub fn data(&self) -> &Bytes {
		&self.data
	}

	/// The locations of this file's metadata blocks
	pub fn block_index(&self) -> &FlacBlockIndex {
		&self.index
	}

	/// Optional blocks that we couldn't decode
	pub fn block_errors(&self) -> &[FlacBlockError] {
		&self.block_errors
	}

	/// This stream's streaminfo block
	pub fn stream_info(&self) -> &FlacStreaminfoBlock {
		&self.stream_info
	}

	/// This stream's vorbis comment, if it has one
	pub fn tags(&self) -> Option<&VorbisComment> {
		self.tags.as_ref()
	}

	/// This stream's picture blocks, in file order
	pub fn pictures(&self) -> &[FlacPictureBlock] {
		&self.pictures
	}

	/// Pictures stored in this stream's vorbis comment
	pub fn comment_pictures(&self) -> &[FlacPictureBlock] {
		&self.comment_pictures
	}

	/// This stream's cuesheet, if it has one
	pub fn cue_sheet(&self) -> Option<&FlacCuesheetBlock> {
		self.cue_sheet.as_ref()
	}

	/// This stream's seek points, in file order
	pub fn seek_table(&self) -> &[SeekPoint] {
		&self.seek_table
	}

	/// The offset of the first byte after all metadata blocks
	pub fn first_frame_offset(&self) -> usize {
		self.first_frame_offset
	}

	/// The blocking strategy of this stream.
	/// `None` if there is no audio data.
	pub fn blocking_strategy(&self) -> Option<BlockingStrategy> {
		self.data
			.get(self.first_frame_offset + 1)
			.map(|x| BlockingStrategy::from_sync_byte(*x))
	}

	/// The frames found by [`AudioStream::scan_frames`].
	/// Empty if frames haven't been scanned.
	pub fn frames(&self) -> &[FlacFrame] {
		&self.frames
	}

	/// Statistics from [`AudioStream::scan_frames`],
	/// or `None` if frames haven't been scanned.
	pub fn scan_report(&self) -> Option<&FrameScanReport> {
		self.scan_report.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		common::{picturetype::PictureType, vorbiscomment::PICTURE_TAG},
		flac::{
			blocks::FlacMetablockHeader,
			frame::FramePosition,
			tests::{
				encode_comment, encode_cuesheet, encode_frame_header, encode_picture,
				encode_streaminfo, FlacBuilder, TestFrame,
			},
		},
	};
	use base64::{prelude::BASE64_STANDARD, Engine};
	use itertools::Itertools;

	fn frames(n: u64) -> Vec<u8> {
		let mut out = Vec::new();
		for i in 0..n {
			out.extend(encode_frame_header(&TestFrame {
				number: i,
				..TestFrame::default()
			}));
			out.extend([0x12, 0x34, 0x56, 0x78, 0x9A]);
		}
		out
	}

	fn full_file() -> Vec<u8> {
		let mut seektable = Vec::new();
		for (s, o, n) in [(0u64, 0u64, 4096u16), (SeekPoint::PLACEHOLDER, 0, 0)] {
			seektable.extend(s.to_be_bytes());
			seektable.extend(o.to_be_bytes());
			seektable.extend(n.to_be_bytes());
		}

		FlacBuilder::new()
			.block(FlacMetablockType::Seektable, &seektable)
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("flacscope", &["TITLE=Test", "ARTIST=A", "ARTIST=B"]),
			)
			.block(
				FlacMetablockType::Cuesheet,
				&encode_cuesheet("", 0, false, &[]),
			)
			.block(
				FlacMetablockType::Picture,
				&encode_picture(3, "image/png", "front", &[1, 2, 3]),
			)
			.block(
				FlacMetablockType::Picture,
				&encode_picture(4, "image/jpeg", "back", &[4, 5, 6]),
			)
			.block(FlacMetablockType::Padding, &[0u8; 16])
			.audio(&frames(8))
			.build()
	}

	#[test]
	fn open_full_file() {
		let data = full_file();
		let s = AudioStream::open(data.clone()).unwrap();

		let si = s.stream_info();
		assert_eq!(si.sample_rate, 44_100);
		assert_eq!(si.channels, 2);
		assert_eq!(si.bits_per_sample, 16);
		assert!((1..=8).contains(&si.channels));
		assert!((4..=32).contains(&si.bits_per_sample));

		let tags = s.tags().unwrap();
		assert_eq!(tags.vendor.as_str(), "flacscope");
		assert_eq!(tags.len(), 3);

		assert_eq!(
			s.pictures().iter().map(|x| x.picture_type).collect_vec(),
			[PictureType::FrontCover, PictureType::BackCover]
		);
		assert_eq!(s.pictures()[1].extension(), "jpeg");

		assert!(s.cue_sheet().is_some());
		assert_eq!(s.seek_table().len(), 2);
		assert!(s.seek_table()[1].is_placeholder());
		assert!(s.block_errors().is_empty());
		assert_eq!(s.block_index().blocks.len(), 7);
		assert_eq!(s.blocking_strategy(), Some(BlockingStrategy::Fixed));

		// Opening doesn't scan frames
		assert!(s.frames().is_empty());
		assert!(s.scan_report().is_none());
		assert_eq!(s.first_frame_offset(), data.len() - frames(8).len());
	}

	#[test]
	fn open_is_deterministic() {
		let data = Bytes::from(full_file());
		let a = AudioStream::open(data.clone()).unwrap();
		let b = AudioStream::open(data).unwrap();

		assert_eq!(a.stream_info(), b.stream_info());
		assert_eq!(a.tags(), b.tags());
		assert_eq!(a.pictures(), b.pictures());
		assert_eq!(a.cue_sheet(), b.cue_sheet());
		assert_eq!(a.seek_table(), b.seek_table());
		assert_eq!(a.block_index(), b.block_index());
	}

	#[test]
	fn scan_frames_once() {
		let mut s = AudioStream::open(full_file()).unwrap();
		let report = s.scan_frames().unwrap();
		assert_eq!(report.frames_found, 8);
		assert_eq!(report.rejected(), 0);

		assert_eq!(s.frames().len(), 8);
		assert_eq!(s.frames()[7].position, FramePosition::FrameNumber(7));
		assert_eq!(s.frame_iter().count(), 8);

		let last = s.frames().last().unwrap();
		assert!(last.offset + last.header_len <= s.data().len());

		assert!(matches!(
			s.scan_frames(),
			Err(FlacScanError::AlreadyScanned)
		));
		assert_eq!(s.frames().len(), 8);
	}

	#[test]
	fn corrupt_frame_does_not_change_count() {
		// Corrupting one frame's crc loses that frame and nothing else,
		// no matter how much garbage surrounds it.
		for garbage in [0usize, 1, 17, 300] {
			let mut audio = frames(2);

			let mut bad = encode_frame_header(&TestFrame {
				number: 2,
				..TestFrame::default()
			});
			let l = bad.len();
			bad[l - 1] ^= 0x55;
			audio.extend(bad);
			audio.extend(std::iter::repeat(0x42).take(garbage));

			for i in 2..5 {
				audio.extend(encode_frame_header(&TestFrame {
					number: i,
					..TestFrame::default()
				}));
			}

			let data = FlacBuilder::new().audio(&audio).build();
			let mut s = AudioStream::open(data).unwrap();
			let report = s.scan_frames().unwrap();

			assert_eq!(report.frames_found, 5);
			assert_eq!(report.checksum_rejects, 1);
			assert_eq!(
				s.frames().iter().map(|x| x.position).collect_vec(),
				(0..5).map(FramePosition::FrameNumber).collect_vec()
			);
		}
	}

	#[test]
	fn third_frame_out_of_sequence() {
		let mut audio = frames(2);
		audio.extend(encode_frame_header(&TestFrame {
			number: 5,
			..TestFrame::default()
		}));

		let data = FlacBuilder::new().audio(&audio).build();
		let mut s = AudioStream::open(data).unwrap();
		let report = s.scan_frames().unwrap();
		assert_eq!(report.frames_found, 2);
		assert_eq!(report.decode_rejects, 1);
	}

	#[test]
	fn no_audio() {
		let mut s = AudioStream::open(FlacBuilder::new().build()).unwrap();
		assert_eq!(s.blocking_strategy(), None);

		let report = s.scan_frames().unwrap();
		assert_eq!(report.frames_found, 0);
		assert_eq!(report.bytes_scanned, 0);
	}

	#[test]
	fn garbage_audio() {
		let data = FlacBuilder::new().audio(&[0x00; 100]).build();
		let mut s = AudioStream::open(data).unwrap();
		let report = s.scan_frames().unwrap();
		assert_eq!(report.frames_found, 0);
		assert_eq!(report.bytes_scanned, 100);
	}

	#[test]
	fn not_flac() {
		assert!(matches!(
			AudioStream::open(&b"ID3\x04\x00\x00\x00\x00\x00\x00"[..]),
			Err(FlacOpenError::BadMagicBytes)
		));
	}

	#[test]
	fn missing_streaminfo() {
		let data = FlacBuilder::without_streaminfo()
			.block(FlacMetablockType::Padding, &[0u8; 4])
			.build();
		assert!(matches!(
			AudioStream::open(data),
			Err(FlacOpenError::MissingStreaminfo)
		));
	}

	#[test]
	fn bad_streaminfo_is_fatal() {
		let data = FlacBuilder::without_streaminfo()
			.block(FlacMetablockType::Streaminfo, &[0u8; 20])
			.build();
		assert!(matches!(
			AudioStream::open(data),
			Err(FlacOpenError::Streaminfo(FlacDecodeError::Truncated(_)))
		));
	}

	#[test]
	fn streaminfo_first() {
		let si = encode_streaminfo(4096, 44_100, 2, 16, 0);
		let data = FlacBuilder::without_streaminfo()
			.block(FlacMetablockType::Padding, &[0u8; 4])
			.block(FlacMetablockType::Streaminfo, &si[FlacMetablockHeader::LEN..])
			.build();

		// Tolerated by default
		assert!(AudioStream::open(data.clone()).is_ok());

		let strict = FlacReadOptions {
			require_streaminfo_first: true,
			..Default::default()
		};
		assert!(matches!(
			AudioStream::open_with_options(data, &strict),
			Err(FlacOpenError::BadFirstBlock)
		));
		assert!(AudioStream::open_with_options(full_file(), &strict).is_ok());
	}

	#[test]
	fn bad_blocks_are_isolated() {
		let mut comment = encode_comment("v", &["TITLE=x"]);
		comment.truncate(comment.len() - 1);

		let data = FlacBuilder::new()
			.block(FlacMetablockType::VorbisComment, &comment)
			.block(
				FlacMetablockType::Picture,
				&encode_picture(3, "nomime", "", &[1]),
			)
			.block(
				FlacMetablockType::Picture,
				&encode_picture(3, "image/png", "", &[1]),
			)
			.block(FlacMetablockType::Cuesheet, &[0u8; 100])
			.build();

		let s = AudioStream::open(data).unwrap();
		assert!(s.tags().is_none());
		assert_eq!(s.pictures().len(), 1);
		assert!(s.cue_sheet().is_none());

		assert_eq!(
			s.block_errors().iter().map(|x| x.block_type).collect_vec(),
			[
				FlacMetablockType::VorbisComment,
				FlacMetablockType::Picture,
				FlacMetablockType::Cuesheet
			]
		);
		assert!(matches!(
			s.block_errors()[1].error,
			FlacDecodeError::BadMimeType(_)
		));
	}

	#[test]
	fn comment_pictures() {
		let pic = encode_picture(3, "image/png", "front", &[9, 9, 9]);
		let tag = format!("{PICTURE_TAG}={}", BASE64_STANDARD.encode(&pic));
		let data = FlacBuilder::new()
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("v", &[tag.as_str(), "TITLE=x"]),
			)
			.build();

		let s = AudioStream::open(data.clone()).unwrap();
		assert_eq!(s.comment_pictures().len(), 1);
		assert_eq!(s.comment_pictures()[0].img_data(), &[9, 9, 9]);
		assert!(s.pictures().is_empty());

		let no_pictures = FlacReadOptions {
			decode_comment_pictures: false,
			..Default::default()
		};
		let s = AudioStream::open_with_options(data, &no_pictures).unwrap();
		assert!(s.comment_pictures().is_empty());
		assert_eq!(s.tags().unwrap().len(), 2);
	}
}
