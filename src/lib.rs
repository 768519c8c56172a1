//! # qrcodec
//!
//! A Rust library for encoding content into QR code symbols and decoding module grids back
//! into content, with Reed-Solomon error correction over GF(256).
//!
//! ## Features
//!
//! - **Encoding**: Numeric, alphanumeric and byte mode, smallest fitting version, full block
//!   interleaving and penalty based mask selection
//! - **Decoding**: Format and version info recovery, unmasking, de-interleaving and per block
//!   error correction
//! - **Reed-Solomon Error Correction**: Levels L, M, Q and H
//! - **Rendering**: Grayscale images and text with the standard quiet zone
//!
//! ## Quick Start
//!
//! ### Encoding & decoding
//!
//! ```rust
//! use qrcodec::{decode, encode, ECLevel, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = encode(b"Hello World", ECLevel::L)?;
//! assert_eq!(symbol.version(), Version::new(1));
//!
//! let content = decode(&symbol.to_grid())?;
//! assert_eq!(content, b"Hello World");
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrcodec::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2))  // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)      // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)) // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = symbol.render(4); // 4 pixels per module
//! assert_eq!(img.width(), (25 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a rendered symbol
//!
//! ```rust
//! use qrcodec::{QRBuilder, QRReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = QRBuilder::new("Grüße".as_bytes()).build()?;
//! let decoded = QRReader::read_image(&symbol.render(3))?;
//! assert_eq!(decoded.text(), "Grüße");
//! assert_eq!(decoded.metadata, symbol.metadata());
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module, clippy::should_implement_trait)]

pub mod builder;
pub(crate) mod common;
pub mod reader;

pub use builder::{QRBuilder, Symbol};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Metadata, Version};
pub use reader::{Decoded, Diagnostic, QRReader};

// Encodes content at the smallest fitting version with the best mask
pub fn encode(content: &[u8], ecl: ECLevel) -> QRResult<Symbol> {
    QRBuilder::new(content).ec_level(ecl).build()
}

// Decodes rows of modules, true for dark
pub fn decode<R: AsRef<[bool]>>(grid: &[R]) -> QRResult<Vec<u8>> {
    QRReader::read(grid).map(|d| d.payload)
}

#[cfg(test)]
mod lib_tests {
    use super::{decode, encode, ECLevel, QRError, Version};

    #[test]
    fn test_hello_world() {
        let symbol = encode(b"Hello World", ECLevel::L).unwrap();
        assert_eq!(symbol.version(), Version::new(1));
        assert_eq!(decode(&symbol.to_grid()).unwrap(), b"Hello World");
    }

    #[test]
    fn test_decode_invalid_grid() {
        let grid = vec![vec![false; 25]; 24];
        assert_eq!(decode(&grid), Err(QRError::InvalidGridSize(24)));
    }
}
