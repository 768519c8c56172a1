use image::{GrayImage, Luma};
use log::{debug, warn};

use super::Diagnostic;
use crate::builder::QUIET_ZONE;
use crate::common::{
    bit_utils::BitStream,
    ec::rectify_info,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        parse_format_info_qr, Color, ECLevel, Version, FORMAT_ERROR_CAPACITY, FORMAT_INFOS_QR,
        FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_ERROR_BIT_LEN,
        VERSION_ERROR_CAPACITY, VERSION_INFOS, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
    },
};

// QR type for reader
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeQR {
    width: usize,
    version: Version,
    grid: Vec<Color>,
}

impl DeQR {
    // Rows of modules, true for dark. Must be square with a valid QR width.
    pub fn from_grid<R: AsRef<[bool]>>(grid: &[R]) -> QRResult<Self> {
        let width = grid.len();
        let version = Version::from_width(width)?;
        if let Some(row) = grid.iter().find(|row| row.as_ref().len() != width) {
            return Err(QRError::InvalidGridSize(row.as_ref().len()));
        }

        let grid = grid.iter().flat_map(|row| row.as_ref().iter().map(|&d| Color::from(d))).collect();
        Ok(Self { width, version, grid })
    }

    // Samples an image rendered at a known module size with the standard quiet zone
    pub fn from_image(img: &GrayImage, module_sz: u32) -> QRResult<Self> {
        let (w, h) = img.dimensions();
        if w != h || module_sz == 0 || w % module_sz != 0 {
            return Err(QRError::InvalidImage);
        }

        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_width = (w / module_sz)
            .checked_sub(2 * QUIET_ZONE as u32)
            .ok_or(QRError::InvalidImage)? as usize;
        let version = Version::from_width(qr_width).or(Err(QRError::InvalidImage))?;

        let half_area = module_sz * module_sz / 2;
        let mut dark_count = vec![0u32; qr_width * qr_width];
        for (x, y, pixel) in img.enumerate_pixels() {
            if x < qz_sz || x >= w - qz_sz || y < qz_sz || y >= w - qz_sz {
                continue;
            }
            let r = ((y - qz_sz) / module_sz) as usize;
            let c = ((x - qz_sz) / module_sz) as usize;
            let Luma([luma]) = *pixel;
            if luma < 128 {
                dark_count[r * qr_width + c] += 1;
            }
        }

        let grid = dark_count.iter().map(|&dc| Color::from(dc > half_area)).collect();
        Ok(Self { width: qr_width, version, grid })
    }

    // Module size of a rendered symbol, measured from the top row of the top left finder
    pub fn detect_module_size(img: &GrayImage) -> QRResult<u32> {
        let (w, h) = img.dimensions();
        if w != h {
            return Err(QRError::InvalidImage);
        }
        let is_dark = |x: u32, y: u32| img.get_pixel(x, y).0[0] < 128;

        // First dark pixel on the diagonal is the finder corner
        let corner = (0..w).find(|&d| is_dark(d, d)).ok_or(QRError::InvalidImage)?;
        let run = (corner..w).take_while(|&x| is_dark(x, corner)).count() as u32;

        let module_sz = run / 7;
        if module_sz == 0 || run % 7 != 0 || corner != QUIET_ZONE as u32 * module_sz {
            return Err(QRError::InvalidImage);
        }
        debug!("Detected module size {module_sz}");
        Ok(module_sz)
    }

    // Inverse of Symbol::to_str at module size 1
    pub fn from_str(qr: &str) -> QRResult<Self> {
        let lines = qr.lines().collect::<Vec<_>>();
        let width =
            lines.len().checked_sub(2 * QUIET_ZONE).ok_or(QRError::InvalidGridSize(lines.len()))?;
        let grid = lines
            .iter()
            .skip(QUIET_ZONE)
            .take(width)
            .map(|l| l.chars().skip(QUIET_ZONE).take(width).map(|c| c == ' ').collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self::from_grid(&grid)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, r: i16, c: i16) -> Color {
        let w = self.width as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to width");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to width");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        self.grid[(r * w + c) as usize]
    }

    // Reads coords most significant bit first
    pub fn get_number(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |n, &(r, c)| (n << 1) | u32::from(self.get(r, c)))
    }
}

#[cfg(test)]
mod deqr_util_tests {
    use super::DeQR;
    use crate::builder::{QRBuilder, QUIET_ZONE};
    use crate::common::error::QRError;
    use crate::common::metadata::{ECLevel, Version};

    fn assert_same_modules(deqr: &DeQR, symbol: &crate::builder::Symbol) {
        let w = symbol.width() as i16;
        assert_eq!(deqr.width(), symbol.width());
        for r in 0..w {
            for c in 0..w {
                assert_eq!(deqr.get(r, c), symbol.get(r, c), "{r} {c}");
            }
        }
    }

    #[test]
    fn test_from_grid() {
        let symbol = QRBuilder::new("Hello, world! 🌎".as_bytes())
            .version(Version::new(2))
            .ec_level(ECLevel::L)
            .build()
            .unwrap();
        let deqr = DeQR::from_grid(&symbol.to_grid()).unwrap();
        assert_eq!(deqr.version(), Version::new(2));
        assert_same_modules(&deqr, &symbol);
    }

    #[test]
    fn test_from_grid_invalid_size() {
        let grid = vec![vec![false; 22]; 22];
        assert_eq!(DeQR::from_grid(&grid), Err(QRError::InvalidGridSize(22)));

        let mut grid = vec![vec![false; 21]; 21];
        grid[7].pop();
        assert_eq!(DeQR::from_grid(&grid), Err(QRError::InvalidGridSize(20)));

        let grid: Vec<Vec<bool>> = Vec::new();
        assert_eq!(DeQR::from_grid(&grid), Err(QRError::InvalidGridSize(0)));
    }

    #[test]
    fn test_from_str() {
        let symbol = QRBuilder::new("Hello, world! 🌎".as_bytes())
            .version(Version::new(2))
            .ec_level(ECLevel::L)
            .build()
            .unwrap();
        let deqr = DeQR::from_str(&symbol.to_str(1)).unwrap();
        assert_same_modules(&deqr, &symbol);
    }

    #[test]
    fn test_from_image() {
        let symbol = QRBuilder::new("Hello, world! 🌎".as_bytes())
            .version(Version::new(7))
            .ec_level(ECLevel::Q)
            .build()
            .unwrap();
        for module_sz in [1, 3, 4] {
            let img = symbol.render(module_sz);
            let deqr = DeQR::from_image(&img, module_sz).unwrap();
            assert_same_modules(&deqr, &symbol);
        }
    }

    #[test]
    fn test_from_image_invalid() {
        let img = image::GrayImage::new(30, 31);
        assert_eq!(DeQR::from_image(&img, 1), Err(QRError::InvalidImage));
        let img = image::GrayImage::new(30, 30);
        assert_eq!(DeQR::from_image(&img, 4), Err(QRError::InvalidImage));
        assert_eq!(DeQR::from_image(&img, 0), Err(QRError::InvalidImage));
        assert_eq!(DeQR::from_image(&img, 1), Err(QRError::InvalidImage));
    }

    #[test]
    fn test_detect_module_size() {
        let symbol = QRBuilder::new(b"12345").build().unwrap();
        for module_sz in [1, 2, 5] {
            let img = symbol.render(module_sz);
            assert_eq!(DeQR::detect_module_size(&img), Ok(module_sz));
        }
    }

    #[test]
    fn test_detect_module_size_blank() {
        let side = (21 + 2 * QUIET_ZONE) as u32;
        let img = image::GrayImage::from_pixel(side, side, image::Luma([255]));
        assert_eq!(DeQR::detect_module_size(&img), Err(QRError::InvalidImage));
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl DeQR {
    // Each copy is corrected on its own, the copies must not disagree
    pub fn read_format_info(&self) -> QRResult<(ECLevel, MaskPattern)> {
        let main = self.get_number(&FORMAT_INFO_COORDS_QR_MAIN);
        let side = self.get_number(&FORMAT_INFO_COORDS_QR_SIDE);
        let main = rectify_info(main, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY);
        let side = rectify_info(side, &FORMAT_INFOS_QR, FORMAT_ERROR_CAPACITY);

        let info = match (main, side) {
            (Some(m), Some(s)) if m != s => return Err(QRError::FormatInfoUnrecoverable),
            (Some(f), _) | (None, Some(f)) => f,
            (None, None) => return Err(QRError::FormatInfoUnrecoverable),
        };

        let (ec_level, mask) = parse_format_info_qr(info);
        debug!("Read format info: Ec level {ec_level:?}, Mask {}", *mask);
        Ok((ec_level, mask))
    }

    // Version is always derived from the width, the encoded info only yields a diagnostic
    pub fn read_version_info(&self) -> Option<Diagnostic> {
        if !self.version.has_version_info() {
            return None;
        }

        let read = |coords: &[(i16, i16)]| {
            rectify_info(self.get_number(coords), &VERSION_INFOS, VERSION_ERROR_CAPACITY)
                .map(|v| Version::new((v >> VERSION_ERROR_BIT_LEN) as usize))
        };
        let infos = [read(&VERSION_INFO_COORDS_BL), read(&VERSION_INFO_COORDS_TR)];

        if infos.contains(&Some(self.version)) {
            return None;
        }
        match infos.into_iter().flatten().next() {
            Some(info) => {
                warn!("Version info {} disagrees with symbol size {}", *info, *self.version);
                Some(Diagnostic::VersionMismatch { size: self.version, info })
            }
            None => {
                warn!("Version info unreadable, using version {} from symbol size", *self.version);
                Some(Diagnostic::VersionInfoUnreadable)
            }
        }
    }
}


// Payload extraction
//------------------------------------------------------------------------------

impl DeQR {
    // Unmasked codewords in placement order, remainder bits excluded
    pub fn extract_payload(&self, mask: MaskPattern) -> BitStream {
        let mask_fn = mask.mask_functions();
        let bit_len = self.version.total_codewords() << 3;
        let mut payload = BitStream::new(bit_len);
        for (r, c) in EncRegionIter::new(self.version).take(bit_len) {
            let clr = self.get(r, c);
            payload.push(if mask_fn(r, c) { !clr } else { clr }.into());
        }
        payload
    }
}
