pub use decode::*;

// Reader for encoded data
//------------------------------------------------------------------------------

mod reader {
    use std::cmp::min;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Mode;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::Version;

    // Appends one segment to `out`. Returns false once the terminator is reached.
    pub fn read_segment(inp: &mut BitStream, ver: Version, out: &mut Vec<u8>) -> QRResult<bool> {
        let (mode, char_cnt) = match take_header(inp, ver)? {
            Some(header) => header,
            None => return Ok(false),
        };

        match mode {
            Mode::Numeric => read_numeric(inp, char_cnt, out)?,
            Mode::Alphanumeric => read_alphanumeric(inp, char_cnt, out)?,
            Mode::Byte => read_byte(inp, char_cnt, out)?,
            Mode::Kanji | Mode::Eci => return Err(QRError::DataParseError),
            Mode::Terminator => return Ok(false),
        };

        Ok(true)
    }

    // None when the terminator or the end of the stream is reached
    pub(super) fn take_header(inp: &mut BitStream, ver: Version) -> QRResult<Option<(Mode, usize)>> {
        if inp.remaining() < ver.mode_bits() {
            return Ok(None);
        }

        let mode = Mode::from_indicator(inp.take_bits(ver.mode_bits())?)?;
        match mode {
            Mode::Terminator => return Ok(None),
            Mode::Kanji | Mode::Eci => return Err(QRError::DataParseError),
            _ => (),
        }

        let len_bits = ver.char_cnt_bits(mode);
        let char_cnt = inp.take_bits(len_bits).map_err(|_| QRError::DataParseError)?;

        Ok(Some((mode, char_cnt.into())))
    }

    fn take_chunk(inp: &mut BitStream, mode: Mode, bit_len: usize) -> QRResult<Vec<u8>> {
        let chunk = inp.take_bits(bit_len).map_err(|_| QRError::DataParseError)?;
        mode.decode_chunk(chunk, bit_len)
    }

    pub(super) fn read_numeric(
        inp: &mut BitStream,
        mut char_cnt: usize,
        out: &mut Vec<u8>,
    ) -> QRResult<()> {
        while char_cnt > 0 {
            let n = min(3, char_cnt);
            let bit_len = Mode::Numeric.encoded_len(n);
            out.extend(take_chunk(inp, Mode::Numeric, bit_len)?);
            char_cnt -= n;
        }
        Ok(())
    }

    pub(super) fn read_alphanumeric(
        inp: &mut BitStream,
        mut char_cnt: usize,
        out: &mut Vec<u8>,
    ) -> QRResult<()> {
        while char_cnt > 0 {
            let n = min(2, char_cnt);
            let bit_len = Mode::Alphanumeric.encoded_len(n);
            out.extend(take_chunk(inp, Mode::Alphanumeric, bit_len)?);
            char_cnt -= n;
        }
        Ok(())
    }

    pub(super) fn read_byte(inp: &mut BitStream, char_cnt: usize, out: &mut Vec<u8>) -> QRResult<()> {
        if inp.remaining() < char_cnt * 8 {
            return Err(QRError::DataParseError);
        }
        out.reserve(char_cnt);
        for _ in 0..char_cnt {
            out.extend(take_chunk(inp, Mode::Byte, 8)?);
        }
        Ok(())
    }

}

// Decoder
//------------------------------------------------------------------------------

pub mod decode {
    use log::debug;

    use super::reader::read_segment;
    use crate::common::bit_utils::BitStream;
    use crate::common::error::QRResult;
    use crate::common::metadata::Version;

    // Parses segments until the terminator or until no full mode indicator remains
    pub fn decode(encoded: &mut BitStream, ver: Version) -> QRResult<Vec<u8>> {
        let mut res = Vec::with_capacity(encoded.len() >> 3);
        let mut seg_cnt = 0;
        while read_segment(encoded, ver, &mut res)? {
            seg_cnt += 1;
        }
        debug!("Decoded {seg_cnt} segments into {} bytes", res.len());
        Ok(res)
    }

}
