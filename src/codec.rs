//! BMP-24 decoder and encoder.
//!
//! Only the classic uncompressed layout is accepted: a 14-byte file header
//! (`"BM"`, file size, two reserved words, pixel-data offset), a 40-byte
//! `BITMAPINFOHEADER`, optional gap bytes up to the pixel-data offset, then
//! bottom-up rows of BGR triples padded to 4-byte boundaries. Anything else
//! (palettes, RLE, 16/32-bit, top-down) is rejected with the reason.
//!
//! Everything before the pixel data — both headers and any gap — is kept
//! verbatim as an opaque preamble and re-emitted on encode. Row padding is
//! the one thing recomputed on encode: always zero, never copied through.

use crate::raster::{Raster, row_bytes};
use thiserror::Error;

/// 14-byte file header plus 40-byte info header.
pub const HEADERS_LEN: usize = 54;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a BMP file: bad magic signature")]
    BadMagic,
    #[error("unsupported bit depth {0}, only 24-bit BMP is supported")]
    UnsupportedBitDepth(u16),
    #[error("unsupported compression {0}, only uncompressed BMP is supported")]
    UnsupportedCompression(u32),
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("pixel data offset {offset} is invalid for a {len}-byte file")]
    BadPixelOffset { offset: u32, len: usize },
    #[error("file truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// A decoded BMP: the pixel raster plus the preserved file preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpFile {
    pub raster: Raster,
    /// Every byte from offset 0 up to the pixel-data offset, verbatim.
    preamble: Vec<u8>,
}

impl BmpFile {
    /// Parse and validate a BMP byte stream.
    ///
    /// Bytes past the pixel rows (`row_bytes(w)·h` from the declared
    /// offset) are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADERS_LEN {
            return Err(DecodeError::Truncated {
                needed: HEADERS_LEN,
                actual: bytes.len(),
            });
        }
        if &bytes[0..2] != b"BM" {
            return Err(DecodeError::BadMagic);
        }

        // File header: magic(2) size(4) reserved(2+2) offset(4).
        let offset = u32_at(bytes, 10);

        // Info header, fixed field offsets per BITMAPINFOHEADER.
        let width = i32_at(bytes, 18);
        let height = i32_at(bytes, 22);
        let bit_count = u16_at(bytes, 28);
        let compression = u32_at(bytes, 30);

        if bit_count != 24 {
            return Err(DecodeError::UnsupportedBitDepth(bit_count));
        }
        if compression != 0 {
            return Err(DecodeError::UnsupportedCompression(compression));
        }
        if width <= 0 || height <= 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }

        let offset = offset as usize;
        if offset < HEADERS_LEN || offset > bytes.len() {
            return Err(DecodeError::BadPixelOffset {
                offset: offset as u32,
                len: bytes.len(),
            });
        }

        let (w, h) = (width as usize, height as usize);
        // Checked math: the declared dimensions are untrusted input.
        let needed = row_bytes(w)
            .checked_mul(h)
            .and_then(|data_len| offset.checked_add(data_len))
            .unwrap_or(usize::MAX);
        if bytes.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            raster: Raster::from_rows(w, h, bytes[offset..needed].to_vec()),
            preamble: bytes[..offset].to_vec(),
        })
    }

    /// Serialize back to BMP bytes: preamble verbatim, then each stored row
    /// as `3·width` pixel bytes followed by fresh zero padding.
    pub fn encode(&self) -> Vec<u8> {
        let raster = &self.raster;
        let stride = raster.row_bytes();
        let pixel_bytes = raster.width() * 3;
        let pad = stride - pixel_bytes;

        let mut out = Vec::with_capacity(self.preamble.len() + stride * raster.height());
        out.extend_from_slice(&self.preamble);
        for row in raster.buf().chunks_exact(stride) {
            out.extend_from_slice(&row[..pixel_bytes]);
            out.extend(std::iter::repeat_n(0u8, pad));
        }
        out
    }
}
