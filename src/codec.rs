//! Payload classification and codeword stream assembly.
//!
//! The payload is classified as a whole into the densest mode that covers
//! every character and encoded as a single segment. Per-character segment
//! switching would squeeze out a little extra capacity for mixed payloads
//! but is not worth the complexity here; the capacity thresholds throughout
//! the crate are single segment thresholds.

use crate::bits::BitStream;
use crate::error::{QrError, QrResult};
use crate::metadata::{ECLevel, Version};

// Encoding mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

// Character values for alphanumeric mode: 0-9, A-Z, then the nine symbols
static ALPHANUMERIC_SYMBOLS: [u8; 9] = *b" $%*+-./:";

impl Mode {
    pub(crate) fn indicator(self) -> u16 {
        match self {
            Self::Numeric => 0b0001,
            Self::Alphanumeric => 0b0010,
            Self::Byte => 0b0100,
        }
    }

    fn contains(self, b: u8) -> bool {
        match self {
            Self::Numeric => b.is_ascii_digit(),
            Self::Alphanumeric => {
                b.is_ascii_digit() || b.is_ascii_uppercase() || ALPHANUMERIC_SYMBOLS.contains(&b)
            }
            Self::Byte => true,
        }
    }

    pub fn classify(data: &[u8]) -> Self {
        if data.iter().all(|&b| Self::Numeric.contains(b)) {
            Self::Numeric
        } else if data.iter().all(|&b| Self::Alphanumeric.contains(b)) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    fn value(b: u8) -> u16 {
        match b {
            b'0'..=b'9' => (b - b'0') as u16,
            b'A'..=b'Z' => (b - b'A') as u16 + 10,
            _ => {
                let pos = ALPHANUMERIC_SYMBOLS.iter().position(|&s| s == b);
                debug_assert!(pos.is_some(), "Not an alphanumeric mode character: {b}");
                pos.unwrap_or(0) as u16 + 36
            }
        }
    }

    // Bit cost of the payload body, excluding mode indicator and char count
    fn payload_bits(self, len: usize) -> usize {
        match self {
            Self::Numeric => 10 * (len / 3) + [0, 4, 7][len % 3],
            Self::Alphanumeric => 11 * (len / 2) + 6 * (len % 2),
            Self::Byte => 8 * len,
        }
    }

    pub(crate) fn encoded_bits(self, len: usize, ver: Version) -> usize {
        ver.mode_bits() + ver.char_cnt_bits(self) + self.payload_bits(len)
    }
}

// Encoder
//------------------------------------------------------------------------------

/// Encodes `data` into a padded codeword stream at the smallest version that
/// can hold it for the requested EC level.
pub fn encode(data: &[u8], ecl: ECLevel) -> QrResult<(BitStream, Version)> {
    let ver = find_smallest_version(data, ecl)?;
    Ok((encode_with_version(data, ecl, ver)?, ver))
}

/// Encodes `data` for a caller-chosen version.
pub fn encode_with_version(data: &[u8], ecl: ECLevel, ver: Version) -> QrResult<BitStream> {
    if data.is_empty() {
        return Err(QrError::InvalidPayload);
    }
    let mode = Mode::classify(data);
    let bit_capacity = ver.data_bit_capacity(ecl);
    if mode.encoded_bits(data.len(), ver) > bit_capacity {
        return Err(QrError::CapacityExceeded);
    }

    let mut out = BitStream::new(bit_capacity);
    push_header(mode, data.len(), ver, &mut out);
    match mode {
        Mode::Numeric => push_numeric_data(data, &mut out),
        Mode::Alphanumeric => push_alphanumeric_data(data, &mut out),
        Mode::Byte => push_byte_data(data, &mut out),
    }
    push_terminator(&mut out);
    pad_remaining_capacity(&mut out);
    Ok(out)
}

pub(crate) fn find_smallest_version(data: &[u8], ecl: ECLevel) -> QrResult<Version> {
    if data.is_empty() {
        return Err(QrError::InvalidPayload);
    }
    let mode = Mode::classify(data);
    for v in 1..=40 {
        let ver = Version::new_unchecked(v);
        if mode.encoded_bits(data.len(), ver) <= ver.data_bit_capacity(ecl) {
            return Ok(ver);
        }
    }
    Err(QrError::CapacityExceeded)
}

fn push_header(mode: Mode, char_cnt: usize, ver: Version, out: &mut BitStream) {
    out.push_bits(mode.indicator(), ver.mode_bits());
    let len_bits = ver.char_cnt_bits(mode);
    debug_assert!(
        char_cnt < (1 << len_bits),
        "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
    );
    out.push_bits(char_cnt as u16, len_bits);
}

fn push_numeric_data(data: &[u8], out: &mut BitStream) {
    for chunk in data.chunks(3) {
        let len = (chunk.len() * 10 + 2) / 3;
        let value = chunk.iter().fold(0u16, |acc, &d| acc * 10 + (d - b'0') as u16);
        out.push_bits(value, len);
    }
}

fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
    for chunk in data.chunks(2) {
        let len = (chunk.len() * 11 + 1) / 2;
        let value = chunk.iter().fold(0u16, |acc, &b| acc * 45 + Mode::value(b));
        out.push_bits(value, len);
    }
}

fn push_byte_data(data: &[u8], out: &mut BitStream) {
    for &b in data {
        out.push_bits(b as u16, 8);
    }
}

fn push_terminator(out: &mut BitStream) {
    let remaining = out.capacity() - out.len();
    if remaining > 0 {
        out.push_bits(0, remaining.min(4));
    }
}

static PADDING_CODEWORDS: [u16; 2] = [0b11101100, 0b00010001];

fn pad_remaining_capacity(out: &mut BitStream) {
    let offset = out.len() & 7;
    if offset > 0 {
        out.push_bits(0, 8 - offset);
    }
    let remaining_codewords = (out.capacity() - out.len()) >> 3;
    for pc in PADDING_CODEWORDS.iter().copied().cycle().take(remaining_codewords) {
        out.push_bits(pc, 8);
    }
}
