//! FLAC errors
use std::string::FromUtf8Error;
use thiserror::Error;

use crate::common::cursor::CursorError;

/// An error we encounter while decoding one metadata block or one frame header.
///
/// While opening a stream, these are isolated to the block that caused them.
/// While scanning frames, they mean "this wasn't a real frame".
#[derive(Debug, Error)]
pub enum FlacDecodeError {
	/// We tried to read past the end of a block or buffer
	#[error("unexpected end of data")]
	Truncated(#[from] CursorError),

	/// We tried to decode a string, but found invalid UTF-8
	#[error("error while decoding string")]
	FailedStringDecode(#[from] FromUtf8Error),

	/// We tried to read a block, but it was out of spec.
	#[error("malformed flac block")]
	MalformedBlock,

	/// A picture's mime type has no `/`
	#[error("bad picture mime type `{0}`")]
	BadMimeType(String),

	/// A picture stored in a vorbis comment wasn't valid base64
	#[error("bad base64 in embedded picture")]
	Base64(#[from] base64::DecodeError),

	/// We didn't find frame sync bytes where we expected them
	#[error("bad frame sync bytes")]
	BadSyncBytes,

	/// The first byte of a coded number can't start a coded number
	#[error("invalid coded number prefix {0:#04x}")]
	InvalidCodedNumber(u8),

	/// A frame header uses the reserved sample rate code
	#[error("reserved sample rate code")]
	ReservedSampleRate,

	/// A frame header uses a reserved channel assignment
	#[error("reserved channel assignment {0}")]
	ReservedChannelAssignment(u8),

	/// A frame header uses a reserved sample size
	#[error("reserved sample size code {0}")]
	ReservedSampleSize(u8),

	/// This frame's blocking strategy doesn't match the stream's
	#[error("frame blocking strategy doesn't match stream")]
	BlockingStrategyMismatch,

	/// A fixed-blocksize frame has an unexpected frame number
	#[error("expected frame {expected}, found frame {found}")]
	OutOfSequenceFrame {
		/// The frame number we wanted
		expected: u64,

		/// The frame number we got
		found: u64,
	},
}

/// An error we encounter while decoding a frame header
#[derive(Debug, Error)]
pub enum FrameHeaderError {
	/// A header field couldn't be decoded
	#[error("could not decode frame header")]
	Decode(#[from] FlacDecodeError),

	/// The header decoded, but its checksum is wrong
	#[error("frame header checksum mismatch: computed {computed:#04x}, stored {stored:#04x}")]
	Checksum {
		/// The CRC-8 of the header bytes we read
		computed: u8,

		/// The CRC-8 stored after the header
		stored: u8,
	},
}

impl From<CursorError> for FrameHeaderError {
	fn from(value: CursorError) -> Self {
		Self::Decode(value.into())
	}
}

/// An error that prevents us from opening a FLAC stream
#[derive(Debug, Error)]
pub enum FlacOpenError {
	/// FLAC does not start with 0x66 0x4C 0x61 0x43
	#[error("flac signature is missing or malformed")]
	BadMagicBytes,

	/// The first metablock isn't StreamInfo
	#[error("first metablock isn't streaminfo")]
	BadFirstBlock,

	/// There is no streaminfo block
	#[error("flac has no streaminfo block")]
	MissingStreaminfo,

	/// A metablock header or body runs past the end of the buffer
	#[error("metablock at offset {offset} is truncated")]
	TruncatedMetablock {
		/// The offset of the truncated block's header
		offset: usize,
	},

	/// We found a streaminfo block, but couldn't decode it
	#[error("could not decode streaminfo")]
	Streaminfo(#[source] FlacDecodeError),
}

/// An error we encounter while scanning audio frames
#[derive(Debug, Error)]
pub enum FlacScanError {
	/// Frames may only be scanned once
	#[error("frames have already been scanned")]
	AlreadyScanned,
}

/// An error we encounter while encoding a block
#[derive(Debug, Error)]
pub enum FlacEncodeError {
	/// We encountered an i/o error while processing
	#[error("io error while encoding block")]
	IoError(#[from] std::io::Error),
}
