use num_traits::PrimInt;

use super::error::{QRError, QRResult};

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Bit budget for terminator & padding
    capacity: usize,
    // Pointer to take bits
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: Vec::with_capacity((capacity + 7) >> 3), len: 0, capacity, cursor: 0 }
    }

    pub fn from(inp: &[u8]) -> Self {
        let bit_len = inp.len() << 3;
        Self { data: inp.to_vec(), len: bit_len, capacity: bit_len, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    // Appends the low `size` bits of `bits`, MSB first. Higher bits are dropped.
    pub fn push_bits<T: PrimInt>(&mut self, bits: T, size: usize) {
        assert!(size <= 16, "Bits from only u8 and u16 can be pushed: Size {size}");

        let bits = bits.to_u64().unwrap_or(0) & ((1u64 << size) - 1);
        for i in (0..size).rev() {
            self.push((bits >> i) & 1 == 1);
        }
    }

    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        self.data.extend_from_slice(arr);
        self.len += arr.len() << 3;
    }
}

#[cfg(test)]
mod bit_stream_push_tests {

    use super::BitStream;

    #[test]
    fn test_len() {
        let mut bs = BitStream::new(152);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000, 8);
        assert_eq!(bs.len(), 12);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 16);
        bs.push_bits(0b1111111, 7);
        assert_eq!(bs.len(), 23);
        bs.push_bits(0b111111111111, 12);
        assert_eq!(bs.len(), 35);
        bs.push_bits(0b111111111111, 16);
        assert_eq!(bs.len(), 51);
    }

    #[test]
    #[should_panic]
    fn test_invalid_len() {
        let mut bs = BitStream::new(152);
        bs.push_bits(256, 17);
    }

    #[test]
    fn test_push() {
        let mut bs = BitStream::new(2);
        bs.push(false);
        assert_eq!(bs.data(), [0b00000000]);
        bs.push(true);
        assert_eq!(bs.data(), [0b01000000]);
    }

    #[test]
    fn test_push_bits_truncates_high_bits() {
        let mut bs = BitStream::new(8);
        bs.push_bits(0b1111_0101u8, 4);
        assert_eq!(bs.len(), 4);
        assert_eq!(bs.data(), [0b0101_0000]);
    }

    #[test]
    fn test_push_bits() {
        let exp_vec = [210, 52, 141, 35, 72, 210, 183, 42, 7, 219, 91, 14, 253, 68, 120, 193];
        let mut inp = BitStream::from(&exp_vec);
        let mut out = BitStream::new(152);
        for n in [0, 1, 2, 3, 4, 5, 6, 7, 8, 4, 8, 9, 11, 15, 16, 5, 16] {
            let bits = inp.take_bits(n).unwrap();
            out.push_bits(bits, n);
            let out_off = out.len() & 7;
            let len = out.len() >> 3;
            assert_eq!(out.data()[..len], exp_vec[..len], "n {n}");
            if out_off > 0 {
                assert_eq!(out.data()[len] >> (8 - out_off), exp_vec[len] >> (8 - out_off));
            }
        }
    }

    #[test]
    fn test_extend() {
        let mut bs = BitStream::new(24);
        bs.push_bits(0xAB, 8);
        bs.extend(&[0xCD, 0xEF]);
        assert_eq!(bs.len(), 24);
        assert_eq!(bs.data(), [0xAB, 0xCD, 0xEF]);
    }
}

// Take bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn take_bits(&mut self, n: usize) -> QRResult<u16> {
        debug_assert!(n <= 16, "Cannot take more than 16 bits: N {n}");

        if self.cursor + n > self.len {
            return Err(QRError::BufferUnderflow);
        }

        let mut res = 0u16;
        for _ in 0..n {
            res = (res << 1) | u16::from(self.read_bit());
        }
        Ok(res)
    }

    pub fn take(&mut self) -> Option<bool> {
        if self.cursor == self.len {
            return None;
        }
        Some(self.read_bit())
    }

    fn read_bit(&mut self) -> bool {
        let offset = self.cursor & 7;
        let pos = self.cursor >> 3;
        self.cursor += 1;
        (self.data[pos] << offset) & 0b10000000 != 0
    }
}


// Iterator for bit stream
//------------------------------------------------------------------------------

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        self.take()
    }
}
