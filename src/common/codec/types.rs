use crate::common::error::{QRError, QRResult};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
    Terminator = 0b0000,
}

impl Mode {
    // Most compact single mode able to carry every byte
    pub fn select(data: &[u8]) -> Self {
        MODES
            .iter()
            .copied()
            .find(|m| data.iter().all(|&b| m.contains(b)))
            .unwrap_or(Self::Byte)
    }

    pub fn from_indicator(bits: u16) -> QRResult<Self> {
        match bits {
            0b0000 => Ok(Self::Terminator),
            0b0001 => Ok(Self::Numeric),
            0b0010 => Ok(Self::Alphanumeric),
            0b0100 => Ok(Self::Byte),
            0b1000 => Ok(Self::Kanji),
            0b0111 => Ok(Self::Eci),
            _ => Err(QRError::DataParseError),
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        ALPHANUMERIC_CHARSET.iter().position(|&c| c == char).unwrap_or(0) as u16
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
            Self::Kanji | Self::Eci | Self::Terminator => {
                unreachable!("Cannot encode in {self:?} mode")
            }
        }
    }

    // Chunk of `bit_len` bits back to its characters
    pub fn decode_chunk(&self, data: u16, bit_len: usize) -> QRResult<Vec<u8>> {
        match self {
            Self::Numeric => Self::decode_numeric_chunk(data, bit_len),
            Self::Alphanumeric => Self::decode_alphanumeric_chunk(data, bit_len),
            Self::Byte => {
                debug_assert!(bit_len == 8, "Invalid byte encoded length: {bit_len}");
                Ok(vec![data as u8])
            }
            Self::Kanji | Self::Eci | Self::Terminator => Err(QRError::DataParseError),
        }
    }

    fn decode_numeric_chunk(mut data: u16, bit_len: usize) -> QRResult<Vec<u8>> {
        let len = match bit_len {
            10 => 3,
            7 => 2,
            4 => 1,
            _ => unreachable!("Invalid numeric encoded length: {bit_len}"),
        };
        if data >= 10u16.pow(len as u32) {
            return Err(QRError::DataParseError);
        }

        let mut res = vec![0; len];
        for i in 0..len {
            res[len - 1 - i] = b'0' + (data % 10) as u8;
            data /= 10;
        }
        Ok(res)
    }

    fn decode_alphanumeric_chunk(mut data: u16, bit_len: usize) -> QRResult<Vec<u8>> {
        let len = match bit_len {
            11 => 2,
            6 => 1,
            _ => unreachable!("Invalid alphanumeric encoded length: {bit_len}"),
        };
        if data >= 45u16.pow(len as u32) {
            return Err(QRError::DataParseError);
        }

        let mut res = vec![0; len];
        for i in 0..len {
            res[len - 1 - i] = ALPHANUMERIC_CHARSET[(data % 45) as usize];
            data /= 45;
        }
        Ok(res)
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => ALPHANUMERIC_CHARSET.contains(&byte),
            Self::Byte => true,
            Self::Kanji | Self::Eci | Self::Terminator => false,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
            Self::Eci | Self::Terminator => 0,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: Mode,
    pub mode_bits: usize, // Bit len of mode
    pub len_bits: usize,  // Bit len of char count
    pub data: &'a [u8],   // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

pub static ALPHANUMERIC_CHARSET: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";
