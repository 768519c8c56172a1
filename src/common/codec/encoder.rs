pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use log::debug;

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    // Picks the smallest version able to hold the data at the given level
    pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let ver = find_min_version(data, ecl)?;
        debug!("Encoding {} bytes at version {} level {ecl:?}", data.len(), *ver);
        let bs = encode_with_version(data, ver, ecl)?;
        Ok((bs, ver))
    }

    pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        let seg = build_segment(data, ver);
        if !fits(&seg, ver, bcap) {
            return Err(QRError::ContentTooLong);
        }

        let mut bs = BitStream::new(bcap);
        push_segment(seg, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    fn find_min_version(data: &[u8], ecl: ECLevel) -> QRResult<Version> {
        // Count indicator widths only change at versions 10 and 27
        let mut seg = build_segment(data, Version::new(1));
        for v in 1..=40 {
            let ver = Version::new(v);
            if v == 10 || v == 27 {
                seg = build_segment(data, ver);
            }
            if fits(&seg, ver, ver.data_bit_capacity(ecl)) {
                return Ok(ver);
            }
        }
        Err(QRError::ContentTooLong)
    }

    fn fits(seg: &Segment, ver: Version, bcap: usize) -> bool {
        seg.data.len() < (1 << ver.char_cnt_bits(seg.mode)) && seg.bit_len() <= bcap
    }

    fn build_segment(data: &[u8], ver: Version) -> Segment<'_> {
        let mode = Mode::select(data);
        Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data)
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
            Mode::Kanji | Mode::Eci | Mode::Terminator => {
                unreachable!("Segments are never built in {:?} mode", seg.mode)
            }
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            out.push_bits(Mode::Byte.encode_chunk(chunk), 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = out.capacity().saturating_sub(out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
