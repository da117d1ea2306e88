//! # 错误类型模块
//!
//! 隐写编解码过程中所有可能出现的失败情况。每一种错误对当前操作都是终止性的。

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 载体图像的像素数据不足以容纳整个容器，在写入任何字节之前检测。
    #[error(
        "Not enough space in the image to hide the secret file. \nRequired: more than {required} bytes of pixel data, Available: {available}"
    )]
    InsufficientCarrierCapacity { required: u64, available: u64 },

    /// 嵌入过程中载体像素数据提前耗尽。
    #[error("The carrier image ran out of pixel data while embedding")]
    InsufficientCarrier,

    /// 签名不匹配，图像中没有隐藏的容器。
    #[error("The image does not contain a hidden file")]
    NotAContainer,

    /// 秘密文件的扩展名不在允许列表中。
    #[error("Unsupported secret file extension: '{0}'")]
    UnsupportedExtension(String),

    /// 解码过程中载体在容器结束之前耗尽。
    #[error("The hidden container is truncated")]
    TruncatedContainer,

    /// 秘密文件为空。
    #[error("The secret file is empty")]
    EmptySecretFile,

    /// 秘密文件超出 32 位长度字段可以表示的范围。
    #[error("The secret file is too large to hide: {0} bytes")]
    SecretTooLarge(u64),

    /// 秘密数据源提供的字节数少于声明的长度。
    #[error("The secret file ended after {actual} of {expected} bytes")]
    PayloadShort { expected: u32, actual: u32 },

    /// 载体不是 BMP 文件。
    #[error("The carrier is not a BMP image")]
    NotABitmap,

    /// 载体是压缩或索引格式的 BMP。
    #[error(
        "Unsupported bitmap: {bits_per_pixel} bits per pixel with compression {compression}, only uncompressed 24-bit images are supported"
    )]
    UnsupportedBitmap { bits_per_pixel: u16, compression: u32 },

    /// 像素数据不是紧跟在 54 字节头部之后 (例如 V4/V5 信息头或带调色板)。
    #[error(
        "Unsupported bitmap header: pixel data at offset {pixel_offset} with a {info_header_size}-byte info header, expected offset 54 and a 40-byte BITMAPINFOHEADER"
    )]
    UnsupportedBitmapHeader {
        pixel_offset: u32,
        info_header_size: u32,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
