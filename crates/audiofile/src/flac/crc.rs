//! CRC-8 for frame headers.
//! Polynomial 0x07, initial value 0, no reflection.

const CRC8_POLY: u8 = 0x07;

const fn make_table() -> [u8; 256] {
	let mut table = [0u8; 256];
	let mut i = 0;
	while i < 256 {
		let mut crc = i as u8;
		let mut bit = 0;
		while bit < 8 {
			crc = if crc & 0x80 != 0 {
				(crc << 1) ^ CRC8_POLY
			} else {
				crc << 1
			};
			bit += 1;
		}
		table[i] = crc;
		i += 1;
	}
	table
}

static CRC8_TABLE: [u8; 256] = make_table();

/// A running CRC-8
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc8 {
	crc: u8,
}

impl Crc8 {
	/// Start a new checksum
	pub fn new() -> Self {
		Self::default()
	}

	/// Feed `data` into this checksum
	pub fn update(&mut self, data: &[u8]) {
		for b in data {
			self.crc = CRC8_TABLE[usize::from(self.crc ^ b)];
		}
	}

	/// Get the checksum of everything we've seen so far
	pub fn finish(&self) -> u8 {
		self.crc
	}
}

/// Compute the CRC-8 of `data`
pub fn crc8(data: &[u8]) -> u8 {
	let mut c = Crc8::new();
	c.update(data);
	return c.finish();
}
