//! # bmp_stego 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑：位编解码、容量规划，
//! 以及把秘密文件写入或读出载体图像的容器编解码器。

// 声明库包含的所有模块。

pub mod bitmap;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod handler;
pub mod steganography;

pub use bitmap::BitmapHeader;
pub use decoder::{ContainerDecoder, RecoveredFile, skip_header};
pub use encoder::ContainerEncoder;
pub use error::StegoError;
pub use format::ContainerFormat;
