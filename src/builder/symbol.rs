use image::{GrayImage, Luma};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use super::QR;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{Color, ECLevel, Metadata, Version};

// Quiet zone around the symbol, in modules
pub const QUIET_ZONE: usize = 4;

// Finished, immutable QR symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    grid: Vec<Color>,
    w: usize,
    metadata: Metadata,
}

impl Symbol {
    pub(crate) fn new(qr: &QR, mask: MaskPattern) -> Self {
        let metadata = Metadata::new(qr.version(), qr.ec_level(), mask);
        Self { grid: qr.to_colors(), w: qr.width(), metadata }
    }

    pub fn version(&self) -> Version {
        self.metadata.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.metadata.ec_level
    }

    pub fn mask(&self) -> MaskPattern {
        self.metadata.mask
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    // Negative indices wrap from the far edge
    pub fn get(&self, r: i16, c: i16) -> Color {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        self.grid[(r * w + c) as usize]
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        self.get(r, c) == Color::Dark
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&clr| clr == Color::Dark).count()
    }

    // Rows of modules, true for dark
    pub fn to_grid(&self) -> Vec<Vec<bool>> {
        self.grid.chunks_exact(self.w).map(|row| row.iter().map(|&c| c.into()).collect()).collect()
    }
}

// Render
//------------------------------------------------------------------------------

impl Symbol {
    pub fn render(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, Luma([255]));
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if !self.is_dark(r, c) {
                    continue;
                }
                let x = qz_sz + c as u32 * module_sz;
                let y = qz_sz + r as u32 * module_sz;
                let rect = Rect::at(x as i32, y as i32).of_size(module_sz, module_sz);
                draw_filled_rect_mut(&mut canvas, rect, Luma([0]));
            }
        }

        canvas
    }

    // Light modules print as blocks, meant for dark terminals
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}
