use std::fmt::{Display, Error, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Metadata {
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask: MaskPattern,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: MaskPattern) -> Self {
        Self { version, ec_level, mask }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "{{ Version: {}, Ec level: {:?}, Mask: {} }}",
            *self.version, self.ec_level, *self.mask
        )
    }
}

#[cfg(test)]
mod metadata_tests {
    use super::{ECLevel, Metadata, Version};
    use crate::common::mask::MaskPattern;

    #[test]
    fn test_display() {
        let meta = Metadata::new(Version::new(7), ECLevel::Q, MaskPattern::new(5));
        assert_eq!(meta.to_string(), "{ Version: 7, Ec level: Q, Mask: 5 }");
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const fn new(ver: usize) -> Self {
        debug_assert!(1 <= ver && ver <= 40, "Invalid version");
        Self(ver)
    }

    pub fn try_new(ver: usize) -> QRResult<Self> {
        if (1..=40).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(QRError::InvalidVersion(ver))
        }
    }

    pub fn from_width(width: usize) -> QRResult<Self> {
        if !(21..=177).contains(&width) || (width - 21) % 4 != 0 {
            return Err(QRError::InvalidGridSize(width));
        }
        Ok(Self((width - 17) / 4))
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    pub fn has_version_info(self) -> bool {
        self.0 >= 7
    }

    pub fn info(self) -> u32 {
        debug_assert!(self.has_version_info(), "Version {} has no version info", self.0);
        VERSION_INFOS[self.0 - 7]
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 - 1]
    }

    pub fn remainder_bits(self) -> usize {
        REMAINDER_BITS[self.0 - 1]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0 - 1]
    }

    pub fn num_blocks(self, ecl: ECLevel) -> usize {
        NUM_BLOCKS[ecl as usize][self.0 - 1]
    }

    // (Group 1 block size, group 1 count, group 2 block size, group 2 count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.num_blocks(ecl);
        let ec_len = self.ecc_per_block(ecl);

        let short_len = total / blocks;
        let short_cnt = blocks - total % blocks;
        let long_cnt = blocks - short_cnt;

        let b1s = short_len - ec_len;
        let b2s = if long_cnt > 0 { b1s + 1 } else { 0 };
        (b1s, short_cnt, b2s, long_cnt)
    }

    pub fn data_capacity(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.num_blocks(ecl) * self.ecc_per_block(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_capacity(ecl) << 3
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let bits = match mode {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji => [8, 10, 12],
            Mode::Eci | Mode::Terminator => [0, 0, 0],
        };
        match self.0 {
            1..=9 => bits[0],
            10..=26 => bits[1],
            _ => bits[2],
        }
    }

    // Largest byte mode content that fits
    pub fn byte_capacity(self, ecl: ECLevel) -> usize {
        let header = self.mode_bits() + self.char_cnt_bits(Mode::Byte);
        (self.data_bit_capacity(ecl) - header) >> 3
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // Two bit indicator in format info
    pub fn format_bits(self) -> u32 {
        self as u32 ^ 1
    }

    pub fn from_format_bits(bits: u32) -> Self {
        match (bits & 0b11) ^ 1 {
            0 => Self::L,
            1 => Self::M,
            2 => Self::Q,
            _ => Self::H,
        }
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(&self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl From<Color> for bool {
    fn from(clr: Color) -> Self {
        clr == Color::Dark
    }
}

impl From<Color> for u32 {
    fn from(clr: Color) -> Self {
        clr.select(0, 1)
    }
}

// Format & version info
//------------------------------------------------------------------------------

// BCH remainder of `data` shifted by the generator degree
const fn bch_remainder(data: u32, generator: u32, gen_deg: usize) -> u32 {
    let mut rem = data << gen_deg;
    let mut i = gen_deg + 16;
    while i > gen_deg {
        i -= 1;
        if rem & (1 << i) != 0 {
            rem ^= generator << (i - gen_deg);
        }
    }
    rem
}

// 5 data bits, level indicator followed by mask id
const fn format_info(data: u32) -> u32 {
    ((data << FORMAT_ERROR_BIT_LEN) | bch_remainder(data, FORMAT_GENERATOR, FORMAT_ERROR_BIT_LEN))
        ^ FORMAT_MASK
}

const fn version_info(ver: u32) -> u32 {
    (ver << VERSION_ERROR_BIT_LEN) | bch_remainder(ver, VERSION_GENERATOR, VERSION_ERROR_BIT_LEN)
}

const fn format_info_table() -> [u32; 32] {
    let mut table = [0; 32];
    let mut i = 0;
    while i < 32 {
        table[i] = format_info(i as u32);
        i += 1;
    }
    table
}

const fn version_info_table() -> [u32; 34] {
    let mut table = [0; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = version_info(i as u32 + 7);
        i += 1;
    }
    table
}

pub fn generate_format_info_qr(ecl: ECLevel, mask: MaskPattern) -> u32 {
    FORMAT_INFOS_QR[((ecl.format_bits() as usize) << 3) | *mask as usize]
}

// Inverse of generate_format_info_qr for a valid (masked) codeword
pub fn parse_format_info_qr(info: u32) -> (ECLevel, MaskPattern) {
    let data = (info ^ FORMAT_MASK) >> FORMAT_ERROR_BIT_LEN;
    (ECLevel::from_format_bits(data >> 3), MaskPattern::new((data & 0b111) as u8))
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub const FORMAT_ERROR_BIT_LEN: usize = 10;

pub static FORMAT_ERROR_CAPACITY: u32 = 3;

pub const FORMAT_GENERATOR: u32 = 0b10100110111;

pub const FORMAT_MASK: u32 = 0b101010000010010;

pub static VERSION_INFO_BIT_LEN: usize = 18;

pub const VERSION_ERROR_BIT_LEN: usize = 12;

pub static VERSION_ERROR_CAPACITY: u32 = 3;

pub const VERSION_GENERATOR: u32 = 0b1111100100101;

// Indexed by (format bits of level << 3) | mask, already masked
pub static FORMAT_INFOS_QR: [u32; 32] = format_info_table();

// Versions 7 to 40
pub static VERSION_INFOS: [u32; 34] = version_info_table();

// Most significant bit first. Negative indices wrap from the far edge.
pub static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

pub static TOTAL_CODEWORDS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];

pub static REMAINDER_BITS: [usize; 40] = [
    0, 7, 7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 3, 3,
    3, 3, 0, 0, 0, 0, 0, 0,
];

// Rows ordered L, M, Q, H
pub static ECC_PER_BLOCK: [[usize; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

pub static NUM_BLOCKS: [[usize; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14,
        15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
