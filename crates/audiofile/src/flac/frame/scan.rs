//! Find frame headers in the audio region of a flac file.
//!
//! Frames are not self-delimiting, so we look for sync codes byte by byte.
//! A candidate that doesn't decode or fails its checksum is a false sync:
//! we note it and keep going from the next byte.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::header::{decode_frame_header, is_sync_code, BlockingStrategy, FlacFrame, FrameContext};
use crate::flac::{blocks::FlacStreaminfoBlock, errors::FrameHeaderError};

/// What happened during a frame scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameScanReport {
	/// The number of frames we found
	pub frames_found: usize,

	/// Sync codes that were rejected because their header checksum was wrong
	pub checksum_rejects: usize,

	/// Sync codes that were rejected because their header didn't decode
	pub decode_rejects: usize,

	/// The length of the audio region, in bytes
	pub bytes_scanned: usize,
}

impl FrameScanReport {
	/// The total number of rejected sync codes
	pub fn rejected(&self) -> usize {
		self.checksum_rejects + self.decode_rejects
	}
}

/// An iterator over the frame headers in a flac file.
///
/// The blocking strategy is taken from the byte after `first_frame_offset`.
/// Fixed-blocksize frames must appear in order: frame `n` is only accepted
/// after `n` frames have been.
#[derive(Debug)]
pub struct FrameScanner<'a> {
	data: &'a [u8],
	pos: usize,
	streaminfo: &'a FlacStreaminfoBlock,

	/// `None` if there is no audio data
	strategy: Option<BlockingStrategy>,
	frames_accepted: u64,

	report: FrameScanReport,
	finished: bool,
}

impl<'a> FrameScanner<'a> {
	/// Scan `data` for frames, starting at `first_frame_offset`.
	pub fn new(data: &'a [u8], first_frame_offset: usize, streaminfo: &'a FlacStreaminfoBlock) -> Self {
		let strategy = data
			.get(first_frame_offset + 1)
			.map(|x| BlockingStrategy::from_sync_byte(*x));

		let bytes_scanned = data.len().saturating_sub(first_frame_offset);

		debug!(
			message = "Scanning frames",
			first_frame_offset,
			bytes_scanned,
			?strategy
		);

		Self {
			data,
			pos: first_frame_offset,
			streaminfo,
			strategy,
			frames_accepted: 0,
			report: FrameScanReport {
				bytes_scanned,
				..Default::default()
			},
			finished: false,
		}
	}

	/// The blocking strategy of this stream, if it has audio data
	pub fn strategy(&self) -> Option<BlockingStrategy> {
		self.strategy
	}

	/// Statistics for the part of the stream we've scanned so far
	pub fn report(&self) -> &FrameScanReport {
		&self.report
	}

	/// Stop scanning and return statistics
	pub fn into_report(self) -> FrameScanReport {
		self.report
	}

	fn finish(&mut self) {
		if self.finished {
			return;
		}
		self.finished = true;

		debug!(
			message = "Finished scanning frames",
			frames_found = self.report.frames_found,
			checksum_rejects = self.report.checksum_rejects,
			decode_rejects = self.report.decode_rejects,
		);

		if self.report.frames_found == 0 && self.report.bytes_scanned != 0 {
			warn!(
				message = "Audio region has no valid frames",
				bytes_scanned = self.report.bytes_scanned,
				rejected = self.report.rejected(),
			);
		}
	}
}

impl Iterator for FrameScanner<'_> {
	type Item = FlacFrame;

	fn next(&mut self) -> Option<Self::Item> {
		let Some(strategy) = self.strategy else {
			self.finish();
			return None;
		};

		while self.pos < self.data.len() {
			// Jump to the next possible sync code
			match self.data[self.pos..].iter().position(|x| *x == 0xFF) {
				Some(skip) => self.pos += skip,
				None => {
					self.pos = self.data.len();
					break;
				}
			}

			if !is_sync_code(self.data, self.pos) {
				self.pos += 1;
				continue;
			}

			let ctx = FrameContext {
				streaminfo: self.streaminfo,
				strategy,
				frames_accepted: self.frames_accepted,
			};

			match decode_frame_header(self.data, self.pos, &ctx) {
				Ok((frame, next)) => {
					self.frames_accepted += 1;
					self.report.frames_found += 1;
					self.pos = next;
					return Some(frame);
				}

				Err(FrameHeaderError::Checksum { computed, stored }) => {
					trace!(
						message = "Rejected sync code",
						offset = self.pos,
						reason = "checksum",
						computed,
						stored
					);
					self.report.checksum_rejects += 1;
				}

				Err(FrameHeaderError::Decode(error)) => {
					trace!(
						message = "Rejected sync code",
						offset = self.pos,
						reason = "decode",
						%error
					);
					self.report.decode_rejects += 1;
				}
			}

			self.pos += 1;
		}

		self.finish();
		return None;
	}
}
