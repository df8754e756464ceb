//! The variable-length "coded number" in frame headers.
//!
//! This is an extension of UTF-8: the number of leading ones in the
//! first byte is the total length of the number, in bytes. Every byte
//! after the first contributes six bits.

use crate::{common::cursor::ByteCursor, flac::errors::FlacDecodeError};

/// Decode the coded number that starts at `data[offset]`.
///
/// Returns `(value, length_in_bytes)`.
/// Continuation bytes are not checked for a `10` prefix.
pub fn decode_coded_number(data: &[u8], offset: usize) -> Result<(u64, usize), FlacDecodeError> {
	let mut d = ByteCursor::new_at(data, offset);
	let first = d.read_u8()?;

	let len = match first.leading_ones() {
		0 => return Ok((u64::from(first & 0x7F), 1)),

		// Continuation bytes can't start a number,
		// and `0xFF` has no terminating zero.
		1 | 8 => return Err(FlacDecodeError::InvalidCodedNumber(first)),

		x => x as usize,
	};

	let mut value = u64::from(first & (0x7F >> len));
	for b in d.read_bytes(len - 1)? {
		value = (value << 6) | u64::from(b & 0x3F);
	}

	return Ok((value, len));
}

/// Encode `value` as a coded number.
/// Returns `None` if `value` needs more than 36 bits.
pub fn encode_coded_number(value: u64) -> Option<Vec<u8>> {
	if value < 0x80 {
		return Some(vec![value as u8]);
	}

	// Bits available with `n` bytes: (7 - n) + 6 * (n - 1)
	let len = (2..=7usize).find(|n| value >> (5 * n + 1) == 0)?;

	let mut out = Vec::with_capacity(len);
	let prefix = !(0xFFu8 >> len);
	out.push(prefix | (value >> (6 * (len - 1))) as u8);
	for i in (0..len - 1).rev() {
		out.push(0x80 | ((value >> (6 * i)) & 0x3F) as u8);
	}

	return Some(out);
}
