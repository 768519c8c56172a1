mod deqr;

pub use deqr::DeQR;

use encoding_rs::mem::decode_latin1;
use image::GrayImage;
use log::{debug, trace};

use crate::common::{
    bit_utils::BitStream,
    codec::decode,
    ec::Block,
    error::{QRError, QRResult},
    metadata::{Metadata, Version},
};

// Non fatal findings while reading a symbol
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Diagnostic {
    // Version info decoded to a version other than the one implied by the width
    VersionMismatch { size: Version, info: Version },
    // Neither version info copy could be corrected
    VersionInfoUnreadable,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Decoded {
    pub metadata: Metadata,
    pub payload: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    // UTF-8 if valid, else ISO-8859-1
    pub fn text(&self) -> String {
        match std::str::from_utf8(&self.payload) {
            Ok(s) => s.to_string(),
            Err(_) => decode_latin1(&self.payload).into_owned(),
        }
    }
}

pub struct QRReader();

impl QRReader {
    pub fn read<R: AsRef<[bool]>>(grid: &[R]) -> QRResult<Decoded> {
        debug!("Reading QR from grid of {} rows", grid.len());
        let deqr = DeQR::from_grid(grid)?;
        Self::read_deqr(&deqr)
    }

    pub fn read_image(img: &GrayImage) -> QRResult<Decoded> {
        debug!("Reading QR from {}x{} image", img.width(), img.height());
        let module_sz = DeQR::detect_module_size(img)?;
        let deqr = DeQR::from_image(img, module_sz)?;
        Self::read_deqr(&deqr)
    }

    fn read_deqr(deqr: &DeQR) -> QRResult<Decoded> {
        let ver = deqr.version();

        debug!("Reading format info...");
        let (ecl, mask) = deqr.read_format_info()?;

        debug!("Reading version info...");
        let diagnostics = deqr.read_version_info().into_iter().collect::<Vec<_>>();

        let metadata = Metadata::new(ver, ecl, mask);
        debug!("Extracting payload for {metadata}");
        let pld = deqr.extract_payload(mask);

        let blk_info = ver.data_codewords_per_block(ecl);
        let ec_len = ver.ecc_per_block(ecl);
        let mut blocks = deinterleave(pld.data(), blk_info, ec_len);

        debug!("Rectifying {} blocks...", blocks.len());
        let mut enc = BitStream::new(ver.data_bit_capacity(ecl));
        for (i, b) in blocks.iter_mut().enumerate() {
            let corrected = b.rectify().or(Err(QRError::BlockUncorrectable(i)))?;
            if corrected > 0 {
                trace!("Corrected {corrected} codewords in block {i}");
            }
            enc.extend(b.data());
        }

        debug!("Decoding data codewords...");
        let payload = decode(&mut enc, ver)?;
        Ok(Decoded { metadata, payload, diagnostics })
    }
}

// Inverse of the round robin interleaving, data codewords then ecc
fn deinterleave(data: &[u8], blk_info: (usize, usize, usize, usize), ec_len: usize) -> Vec<Block> {
    // b1s = block1_size, b1c = block1_count
    let (b1s, b1c, b2s, b2c) = blk_info;

    let total_blks = b1c + b2c;
    let spl = b1s * total_blks;
    let data_sz = b1s * b1c + b2s * b2c;

    let mut dilvd = vec![Vec::with_capacity(b2s.max(b1s) + ec_len); total_blks];

    // Deinterleaving data
    data[..spl]
        .chunks(total_blks)
        .for_each(|ch| ch.iter().enumerate().for_each(|(i, v)| dilvd[i].push(*v)));
    if b2c > 0 {
        data[spl..data_sz]
            .chunks(b2c)
            .for_each(|ch| ch.iter().enumerate().for_each(|(i, v)| dilvd[b1c + i].push(*v)));
    }

    // Deinterleaving ecc
    data[data_sz..]
        .chunks(total_blks)
        .for_each(|ch| ch.iter().enumerate().for_each(|(i, v)| dilvd[i].push(*v)));

    dilvd.iter().map(|b| Block::with_encoded(b, b.len() - ec_len)).collect()
}
