// Bit level writer for codeword assembly
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0; (capacity + 7) >> 3], len: 0, capacity }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }

    // Appends up to 16 bits, most significant first
    pub fn push_bits(&mut self, bits: u16, size: usize) {
        debug_assert!(size <= 16, "Bit count exceeds 16: {size}");
        debug_assert!(
            size >= (16 - bits.leading_zeros()) as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        for i in (0..size).rev() {
            self.push(bits >> i & 1 == 1);
        }
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );

        if bit {
            let offset = self.len & 7;
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }

        self.len += 1;
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_bits(b as u16, 8);
        }
    }

    pub fn iter(&self) -> Bits<'_> {
        Bits { stream: self, cursor: 0 }
    }
}

pub struct Bits<'a> {
    stream: &'a BitStream,
    cursor: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.stream.len {
            return None;
        }
        let pos = self.cursor >> 3;
        let offset = self.cursor & 7;
        self.cursor += 1;
        Some(self.stream.data[pos] & (0b10000000 >> offset) != 0)
    }
}

impl<'a> IntoIterator for &'a BitStream {
    type Item = bool;
    type IntoIter = Bits<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
