use std::ops::Deref;

use log::{debug, trace};
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }

    pub fn try_new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    // Predicate on (row, col), true where data modules are inverted
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Every candidate masks its own copy, lowest (penalty, id) wins
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best = (0..8u8)
        .into_par_iter()
        .map(|m| {
            let mut cand = qr.clone();
            cand.apply_mask(MaskPattern(m));
            let pen = compute_total_penalty(&cand);
            trace!("Mask {m} penalty {pen}");
            (pen, m)
        })
        .min()
        .map_or(MaskPattern(0), |(pen, m)| {
            debug!("Selected mask {m} with penalty {pen}");
            MaskPattern(m)
        });
    qr.apply_mask(best);
    best
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// N1: 3 for a run of 5 same colored modules, 1 more per extra module
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    let mut cols = vec![(Color::Dark, 0); w as usize];
    for r in 0..w {
        let mut last = Color::Dark;
        let mut consec_row_len = 0;
        for (c, col) in cols.iter_mut().enumerate() {
            let clr = *qr.get(r, c as i16);
            if last != clr || c == 0 {
                last = clr;
                consec_row_len = 0;
            }
            consec_row_len += 1;
            pen += run_penalty(consec_row_len);

            if col.0 != clr || r == 0 {
                col.0 = clr;
                col.1 = 0;
            }
            col.1 += 1;
            pen += run_penalty(col.1);
        }
    }
    pen
}

// Incremental penalty as a run grows by one module
fn run_penalty(len: usize) -> u32 {
    match len {
        5 => 3,
        _ if len > 5 => 1,
        _ => 0,
    }
}

// N2: 3 per 2x2 block of one color, overlaps counted
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 40 per 1:1:3:1:1 run with 4 light modules on either side, the outside
// of the symbol counting as light
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        let is_light = |j: i16| j < 0 || j >= w || get(j) == Color::Light;
        for j in 0..w - 6 {
            if (j..j + 7).map(get).ne(PATTERN.iter().copied()) {
                continue;
            }
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// N4: 10 per full 5% step away from half dark
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let steps = (dark_cnt * 20).abs_diff(tot * 10) / tot;
    (steps * 10) as _
}
