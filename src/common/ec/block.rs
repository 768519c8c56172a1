use super::encoder::ecc;

// Codeword block: data codewords followed by error correction codewords
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    data: Vec<u8>,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], ec_len: usize) -> Self {
        let mut data = Vec::with_capacity(raw.len() + ec_len);
        data.extend_from_slice(raw);
        data.extend(ecc(raw, ec_len));
        Self { data, dlen: raw.len() }
    }

    pub fn with_encoded(encoded: &[u8], dlen: usize) -> Self {
        debug_assert!(
            dlen <= encoded.len(),
            "Data length exceeds block length: Data len {dlen}, Block len {}",
            encoded.len()
        );
        Self { data: encoded.to_vec(), dlen }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn ec_len(&self) -> usize {
        self.data.len() - self.dlen
    }

    pub fn full(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..]
    }
}
