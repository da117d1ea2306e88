//! # BMP 头部模块
//!
//! 载体图像的前 54 字节。编解码器只原样复制它，
//! 并从中读取宽度和高度来计算可用容量。

use crate::constants::{
    BITS_PER_PIXEL_OFFSET, BMP_HEADER_SIZE, CHANNELS_PER_PIXEL, COMPRESSION_OFFSET, HEIGHT_OFFSET,
    INFO_HEADER_SIZE, INFO_HEADER_SIZE_OFFSET, PIXEL_DATA_OFFSET_FIELD, WIDTH_OFFSET,
};
use crate::error::{Result, StegoError};
use image::ImageFormat;
use std::io::{ErrorKind, Read};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapHeader {
    bytes: [u8; BMP_HEADER_SIZE],
}

impl BitmapHeader {
    pub fn from_bytes(bytes: [u8; BMP_HEADER_SIZE]) -> Self {
        Self { bytes }
    }

    /// 从载体流中读取头部。流不足 54 字节时返回 [`StegoError::NotABitmap`]。
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; BMP_HEADER_SIZE];
        reader.read_exact(&mut bytes).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => StegoError::NotABitmap,
            _ => StegoError::Io(err),
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; BMP_HEADER_SIZE] {
        &self.bytes
    }

    fn u32_at(&self, offset: usize) -> u32 {
        let mut field = [0u8; 4];
        field.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(field)
    }

    pub fn width(&self) -> u32 {
        self.u32_at(WIDTH_OFFSET)
    }

    /// 自上而下存储的位图高度为负数，这里取其绝对值。
    pub fn height(&self) -> u32 {
        (self.u32_at(HEIGHT_OFFSET) as i32).unsigned_abs()
    }

    /// 像素数据在文件中的起始偏移 (bfOffBits)。
    pub fn pixel_offset(&self) -> u32 {
        self.u32_at(PIXEL_DATA_OFFSET_FIELD)
    }

    pub fn info_header_size(&self) -> u32 {
        self.u32_at(INFO_HEADER_SIZE_OFFSET)
    }

    pub fn bits_per_pixel(&self) -> u16 {
        u16::from_le_bytes([
            self.bytes[BITS_PER_PIXEL_OFFSET],
            self.bytes[BITS_PER_PIXEL_OFFSET + 1],
        ])
    }

    pub fn compression(&self) -> u32 {
        self.u32_at(COMPRESSION_OFFSET)
    }

    /// 头部之后可用于隐写的载体字节数：`宽 × 高 × 3`。
    pub fn capacity(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height()) * CHANNELS_PER_PIXEL
    }

    /// 确认载体是未压缩的 24 位 BMP，且像素数据紧跟在 54 字节头部之后。
    ///
    /// # Errors
    ///
    /// * 缺少 `BM` 魔数时返回 [`StegoError::NotABitmap`]。
    /// * 信息头不是 40 字节或像素偏移不是 54 时返回 [`StegoError::UnsupportedBitmapHeader`]。
    /// * 索引色或压缩格式返回 [`StegoError::UnsupportedBitmap`]。
    pub fn validate(&self) -> Result<()> {
        match image::guess_format(&self.bytes) {
            Ok(ImageFormat::Bmp) => {}
            _ => return Err(StegoError::NotABitmap),
        }

        let pixel_offset = self.pixel_offset();
        let info_header_size = self.info_header_size();
        if pixel_offset != BMP_HEADER_SIZE as u32 || info_header_size != INFO_HEADER_SIZE {
            return Err(StegoError::UnsupportedBitmapHeader {
                pixel_offset,
                info_header_size,
            });
        }

        let bits_per_pixel = self.bits_per_pixel();
        let compression = self.compression();
        if bits_per_pixel != 24 || compression != 0 {
            return Err(StegoError::UnsupportedBitmap {
                bits_per_pixel,
                compression,
            });
        }

        Ok(())
    }
}

/// 构造一个最小的 24 位 BMP 头部，主要供测试和工具使用。
///
/// 只用于小尺寸图像：文件大小和像素数据大小字段超出 `u32` 时饱和为 `u32::MAX`，
/// 宽高字段本身始终准确。
pub fn synthetic_header(width: u32, height: u32) -> BitmapHeader {
    let mut bytes = [0u8; BMP_HEADER_SIZE];
    let pixel_bytes = width
        .saturating_mul(height)
        .saturating_mul(CHANNELS_PER_PIXEL as u32);
    let file_size = pixel_bytes.saturating_add(BMP_HEADER_SIZE as u32);
    bytes[0..2].copy_from_slice(b"BM");
    bytes[2..6].copy_from_slice(&file_size.to_le_bytes());
    bytes[PIXEL_DATA_OFFSET_FIELD..PIXEL_DATA_OFFSET_FIELD + 4]
        .copy_from_slice(&(BMP_HEADER_SIZE as u32).to_le_bytes());
    bytes[INFO_HEADER_SIZE_OFFSET..INFO_HEADER_SIZE_OFFSET + 4]
        .copy_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    bytes[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&width.to_le_bytes());
    bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&height.to_le_bytes());
    bytes[26..28].copy_from_slice(&1u16.to_le_bytes());
    bytes[BITS_PER_PIXEL_OFFSET..BITS_PER_PIXEL_OFFSET + 2].copy_from_slice(&24u16.to_le_bytes());
    bytes[34..38].copy_from_slice(&pixel_bytes.to_le_bytes());
    BitmapHeader::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_dimensions_and_capacity() {
        let header = synthetic_header(20, 10);
        assert_eq!(header.width(), 20);
        assert_eq!(header.height(), 10);
        assert_eq!(header.capacity(), 600);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn top_down_height_is_positive() {
        let mut bytes = *synthetic_header(4, 4).as_bytes();
        bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&(-4i32).to_le_bytes());
        let header = BitmapHeader::from_bytes(bytes);
        assert_eq!(header.height(), 4);
        assert_eq!(header.capacity(), 48);
    }

    #[test]
    fn large_dimensions_do_not_overflow() {
        let header = synthetic_header(100_000, 100_000);
        assert_eq!(header.width(), 100_000);
        assert_eq!(header.height(), 100_000);
        assert_eq!(header.capacity(), 30_000_000_000);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn short_stream_is_not_a_bitmap() {
        let mut short = &b"BM\x00\x00"[..];
        assert!(matches!(
            BitmapHeader::read_from(&mut short),
            Err(StegoError::NotABitmap)
        ));
    }

    #[test]
    fn rejects_foreign_and_indexed_images() {
        let mut bytes = *synthetic_header(4, 4).as_bytes();
        bytes[0..2].copy_from_slice(b"GI");
        assert!(matches!(
            BitmapHeader::from_bytes(bytes).validate(),
            Err(StegoError::NotABitmap)
        ));

        let mut bytes = *synthetic_header(4, 4).as_bytes();
        bytes[BITS_PER_PIXEL_OFFSET] = 8;
        assert!(matches!(
            BitmapHeader::from_bytes(bytes).validate(),
            Err(StegoError::UnsupportedBitmap {
                bits_per_pixel: 8,
                compression: 0
            })
        ));
    }

    #[test]
    fn rejects_headers_that_do_not_end_at_54() {
        // 24 位 BITMAPV5HEADER：124 字节信息头，像素从偏移 138 开始
        let mut bytes = *synthetic_header(40, 40).as_bytes();
        bytes[PIXEL_DATA_OFFSET_FIELD..PIXEL_DATA_OFFSET_FIELD + 4]
            .copy_from_slice(&138u32.to_le_bytes());
        bytes[INFO_HEADER_SIZE_OFFSET..INFO_HEADER_SIZE_OFFSET + 4]
            .copy_from_slice(&124u32.to_le_bytes());
        assert!(matches!(
            BitmapHeader::from_bytes(bytes).validate(),
            Err(StegoError::UnsupportedBitmapHeader {
                pixel_offset: 138,
                info_header_size: 124
            })
        ));

        // 40 字节信息头但像素数据前有间隙
        let mut bytes = *synthetic_header(4, 4).as_bytes();
        bytes[PIXEL_DATA_OFFSET_FIELD..PIXEL_DATA_OFFSET_FIELD + 4]
            .copy_from_slice(&58u32.to_le_bytes());
        assert!(matches!(
            BitmapHeader::from_bytes(bytes).validate(),
            Err(StegoError::UnsupportedBitmapHeader {
                pixel_offset: 58,
                info_header_size: 40
            })
        ));
    }
}
