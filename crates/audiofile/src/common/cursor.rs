//! Bounds-checked field extraction over an immutable byte buffer.
//!
//! Every multi-byte read takes an explicit [`Endianness`].
//! FLAC is big-endian almost everywhere, but vorbis comments
//! are little-endian, and we never want to guess.

use thiserror::Error;

/// Byte order of a multi-byte integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Most significant byte first
	Big,

	/// Least significant byte first
	Little,
}

/// We tried to read past the end of a buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tried to read {wanted} bytes at offset {offset}, but only {available} remain")]
pub struct CursorError {
	/// Where the read started, relative to the start of the buffer
	pub offset: usize,

	/// How many bytes we wanted
	pub wanted: usize,

	/// How many bytes were left
	pub available: usize,
}

/// A read position in a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteCursor<'a> {
	/// Make a new cursor at the start of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	/// Make a new cursor at `pos` in `data`.
	/// `pos` may be past the end, in which case every read fails.
	pub fn new_at(data: &'a [u8], pos: usize) -> Self {
		Self { data, pos }
	}

	/// The current read position
	pub fn position(&self) -> usize {
		self.pos
	}

	/// The number of bytes left to read
	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.pos)
	}

	/// Borrow the next `n` bytes and advance past them
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
		let out = self
			.data
			.get(self.pos..)
			.and_then(|x| x.get(..n))
			.ok_or_else(|| CursorError {
				offset: self.pos,
				wanted: n,
				available: self.remaining(),
			})?;

		self.pos += n;
		return Ok(out);
	}

	/// Read exactly `N` bytes into an array
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read_bytes(N)?);
		return Ok(out);
	}

	/// Advance `n` bytes without looking at them
	pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
		self.read_bytes(n)?;
		return Ok(());
	}

	/// Read one byte
	pub fn read_u8(&mut self) -> Result<u8, CursorError> {
		let [b] = self.read_array::<1>()?;
		return Ok(b);
	}

	/// Read a 16-bit unsigned integer
	pub fn read_u16(&mut self, endian: Endianness) -> Result<u16, CursorError> {
		let b = self.read_array::<2>()?;
		Ok(match endian {
			Endianness::Big => u16::from_be_bytes(b),
			Endianness::Little => u16::from_le_bytes(b),
		})
	}

	/// Read a 24-bit unsigned integer
	pub fn read_u24(&mut self, endian: Endianness) -> Result<u32, CursorError> {
		let b = self.read_array::<3>()?;
		Ok(match endian {
			Endianness::Big => u32::from_be_bytes([0, b[0], b[1], b[2]]),
			Endianness::Little => u32::from_le_bytes([b[0], b[1], b[2], 0]),
		})
	}

	/// Read a 32-bit unsigned integer
	pub fn read_u32(&mut self, endian: Endianness) -> Result<u32, CursorError> {
		let b = self.read_array::<4>()?;
		Ok(match endian {
			Endianness::Big => u32::from_be_bytes(b),
			Endianness::Little => u32::from_le_bytes(b),
		})
	}

	/// Read a 64-bit unsigned integer
	pub fn read_u64(&mut self, endian: Endianness) -> Result<u64, CursorError> {
		let b = self.read_array::<8>()?;
		Ok(match endian {
			Endianness::Big => u64::from_be_bytes(b),
			Endianness::Little => u64::from_le_bytes(b),
		})
	}

	/// Read a 32-bit length prefix, then borrow that many bytes
	pub fn read_prefixed(&mut self, endian: Endianness) -> Result<&'a [u8], CursorError> {
		let len = self.read_u32(endian)?;
		// u32 always fits in usize on the targets we build for
		return self.read_bytes(len as usize);
	}
}

/// Reads unsigned fields of arbitrary bit width, most significant bit first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
	data: &'a [u8],
	bit_pos: usize,
}

impl<'a> BitReader<'a> {
	/// Make a new bit reader at the first bit of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, bit_pos: 0 }
	}

	/// How many bits we have consumed
	pub fn bit_position(&self) -> usize {
		self.bit_pos
	}

	/// Read `n` bits as an unsigned integer. `n` must be at most 64.
	pub fn read_bits(&mut self, n: u32) -> Result<u64, CursorError> {
		debug_assert!(n <= 64);
		let n = n as usize;
		let total_bits = self.data.len() * 8;

		if self.bit_pos + n > total_bits {
			return Err(CursorError {
				offset: self.bit_pos >> 3,
				wanted: (n + 7) >> 3,
				available: (total_bits - self.bit_pos) >> 3,
			});
		}

		let mut out = 0u64;
		for _ in 0..n {
			let byte = self.data[self.bit_pos >> 3];
			let bit = (byte >> (7 - (self.bit_pos & 7))) & 1;
			out = (out << 1) | u64::from(bit);
			self.bit_pos += 1;
		}

		return Ok(out);
	}
}

/// Packs unsigned fields of arbitrary bit width, most significant bit first.
/// The inverse of [`BitReader`].
#[derive(Debug, Default)]
pub struct BitWriter {
	data: Vec<u8>,
	bit_pos: usize,
}

impl BitWriter {
	/// Make a new, empty bit writer
	pub fn new() -> Self {
		Self::default()
	}

	/// Append the low `n` bits of `value`. `n` must be at most 64.
	pub fn write_bits(&mut self, value: u64, n: u32) {
		debug_assert!(n <= 64);
		for i in (0..n).rev() {
			if self.bit_pos & 7 == 0 {
				self.data.push(0);
			}

			let bit = ((value >> i) & 1) as u8;
			let last = self.data.len() - 1;
			self.data[last] |= bit << (7 - (self.bit_pos & 7));
			self.bit_pos += 1;
		}
	}

	/// Return the packed bytes. A partial last byte is zero-padded.
	pub fn finish(self) -> Vec<u8> {
		self.data
	}
}
