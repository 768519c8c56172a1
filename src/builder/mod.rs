mod qr;
mod symbol;

pub(crate) use qr::QR;
#[cfg(test)]
pub(crate) use qr::Module;
pub use symbol::{Symbol, QUIET_ZONE};

use std::ops::Deref;

use log::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, encode_with_version},
    ec::Block,
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("Auto".to_string(), |v| (*v).to_string());
        let mask = self.mask.map_or("Auto".to_string(), |m| (*m).to_string());
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<Symbol> {
        debug!("Generating QR {}", self.metadata());

        // Overrides may come from release builds where constructors skip their checks
        let mask = self.mask.map(|m| MaskPattern::try_new(*m)).transpose()?;

        let (encoded_data, version) = match self.version {
            Some(v) => {
                let v = Version::try_new(*v)?;
                (encode_with_version(self.data, v, self.ec_level)?, v)
            }
            None => encode(self.data, self.ec_level)?,
        };

        debug!("Constructing payload with ecc & interleaving");
        let blocks = Self::compute_ecc(encoded_data.data(), version, self.ec_level);
        let payload = Self::build_payload(&blocks, version);

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload);

        let mask = match mask {
            Some(m) => {
                debug!("Applying mask {}", *m);
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            "Generated version {} symbol, {dark_modules} of {total_modules} modules dark",
            *version
        );

        Ok(Symbol::new(&qr, mask))
    }

    // Splits data codewords into blocks and appends ecc to each
    pub(crate) fn compute_ecc(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
        let ecc_size_per_block = version.ecc_per_block(ec_level);
        Self::blockify(data, version, ec_level)
            .into_iter()
            .map(|b| Block::new(b, ecc_size_per_block))
            .collect()
    }

    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_blocks = block1_count + block2_count;
        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        debug_assert!(
            total_size == data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let mut data_blocks = Vec::with_capacity(total_blocks);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_size > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        data_blocks
    }

    // All data codewords round robin, then all ecc codewords round robin
    pub(crate) fn build_payload(blocks: &[Block], version: Version) -> BitStream {
        let mut payload = BitStream::new(version.total_codewords() << 3);
        let data_blocks = blocks.iter().map(|b| b.data()).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));
        payload
    }

    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::QRBuilder;
    use crate::common::{
        mask::MaskPattern,
        metadata::{ECLevel, Version},
    };

    #[test]
    fn test_add_ec_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let expected_ecc = b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17";
        let blocks = QRBuilder::compute_ecc(msg, Version::new(1), ECLevel::M);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data(), msg);
        assert_eq!(blocks[0].ecc(), expected_ecc);
    }

    #[test]
    fn test_iso_numeric_symbol() {
        let symbol = QRBuilder::new(b"01234567")
            .version(Version::new(1))
            .ec_level(ECLevel::M)
            .mask(MaskPattern::new(2))
            .build()
            .unwrap();
        let blocks = QRBuilder::compute_ecc(
            b"\x10\x20\x0c\x56\x61\x80\xec\x11\xec\x11\xec\x11\xec\x11\xec\x11",
            Version::new(1),
            ECLevel::M,
        );
        assert_eq!(blocks[0].ecc(), b"\xa5\x24\xd4\xc1\xed\x36\xc7\x87\x2c\x55");

        let exp = [
            "#######..#.##.#######",
            "#.....#..####.#.....#",
            "#.###.#.#.....#.###.#",
            "#.###.#.##....#.###.#",
            "#.###.#.#.###.#.###.#",
            "#.....#.#...#.#.....#",
            "#######.#.#.#.#######",
            "........#..##........",
            "#.#####..#..#.#####..",
            "...#.#.##.#.#..#.##..",
            "..#...##.#.#.#..#####",
            "....#....#.....####..",
            "...######..#.#..#....",
            "........#.#####..##..",
            "#######..##.#.##.....",
            "#.....#.#.#####...#.#",
            "#.###.#.#...#..#.##..",
            "#.###.#.##..#..#.....",
            "#.###.#.#.##.#..#.#..",
            "#.....#........##.##.",
            "#######.####.#..#.#..",
        ];
        let rows = symbol
            .to_grid()
            .iter()
            .map(|row| row.iter().map(|&d| if d { '#' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(rows, exp);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let blocks = QRBuilder::compute_ecc(msg, Version::new(5), ECLevel::Q);
        let ecc = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();
        assert_eq!(ecc, expected_ec.iter().map(|e| &e[..]).collect::<Vec<_>>());
        assert_eq!(blocks.iter().map(|b| b.data().len()).collect::<Vec<_>>(), [15, 15, 16, 16]);
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = QRBuilder::interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }

    #[test]
    fn test_build_payload_order() {
        let data = (0..62).collect::<Vec<u8>>();
        let ver = Version::new(5);
        let blocks = QRBuilder::compute_ecc(&data, ver, ECLevel::Q);
        let payload = QRBuilder::build_payload(&blocks, ver);
        assert_eq!(payload.len(), ver.total_codewords() << 3);
        // Blocks start at 0, 15, 30 and 46
        assert_eq!(payload.data()[..8], [0, 15, 30, 46, 1, 16, 31, 47]);
        // Only the longer blocks carry a 16th codeword
        assert_eq!(payload.data()[60..62], [45, 61]);
        assert_eq!(payload.data()[62], blocks[0].ecc()[0]);
    }

    #[test_case("Hello, world!🌎".to_string(), Version::new(1), ECLevel::L)]
    #[test_case("TEST".to_string(), Version::new(1), ECLevel::M)]
    #[test_case("12345".to_string(), Version::new(1), ECLevel::Q)]
    #[test_case("OK".to_string(), Version::new(1), ECLevel::H)]
    #[test_case("A11111111111111".repeat(11).to_string(), Version::new(7), ECLevel::M)]
    #[test_case("1234567890".repeat(15).to_string(), Version::new(7), ECLevel::H)]
    #[test_case("A11111111111111".repeat(20).to_string(), Version::new(10), ECLevel::M)]
    #[test_case("1234567890".repeat(28).to_string(), Version::new(10), ECLevel::H)]
    #[test_case("1234567890".repeat(100).to_string(), Version::new(27), ECLevel::H)]
    #[test_case("1234567890".repeat(305).to_string(), Version::new(40), ECLevel::H)]
    fn test_builder(data: String, version: Version, ec_level: ECLevel) {
        let symbol = QRBuilder::new(data.as_bytes())
            .version(version)
            .ec_level(ec_level)
            .build()
            .unwrap();
        assert_eq!(symbol.version(), version);
        assert_eq!(symbol.ec_level(), ec_level);
        assert_eq!(symbol.width(), version.width());
    }

    #[test]
    fn test_builder_fixed_mask() {
        let symbol = QRBuilder::new(b"TEST").mask(MaskPattern::new(6)).build().unwrap();
        assert_eq!(symbol.mask(), MaskPattern::new(6));
    }

    #[test]
    fn test_builder_data_overflow() {
        let data = "1234567890".repeat(306).to_string();
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40))
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res.unwrap_err(), crate::common::error::QRError::ContentTooLong);
    }
}
