//! # 容器解码模块
//!
//! 从隐写图像的像素数据中依次读出签名、扩展名和载荷。
//! 任何一步失败都会中止整个解码，不返回部分结果。

use crate::constants::{BMP_HEADER_SIZE, BYTE_WINDOW, SIZE_WINDOW};
use crate::error::{Result, StegoError};
use crate::format::ContainerFormat;
use crate::steganography::{unpack_byte, unpack_size};
use log::{debug, info};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// 预分配载荷缓冲区的上限，防止损坏的长度字段触发巨大的分配。
const PREALLOC_LIMIT: usize = 1 << 20;

/// 从隐写图像中恢复出的秘密文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredFile {
    pub extension: String,
    pub payload: Vec<u8>,
}

/// 从载体图像中提取秘密文件。
///
/// 同一个载体流不能被多个调用方同时解码。
#[derive(Debug, Clone, Copy)]
pub struct ContainerDecoder<'f> {
    format: &'f ContainerFormat,
}

struct Extractor<'a, C: ?Sized> {
    carrier: &'a mut C,
}

impl<C: Read + ?Sized> Extractor<'_, C> {
    fn next_window<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut window = [0u8; N];
        self.carrier
            .read_exact(&mut window)
            .map_err(|err| match err.kind() {
                ErrorKind::UnexpectedEof => StegoError::TruncatedContainer,
                _ => StegoError::Io(err),
            })?;
        Ok(window)
    }

    fn extract_byte(&mut self) -> Result<u8> {
        Ok(unpack_byte(&self.next_window::<BYTE_WINDOW>()?))
    }

    fn extract_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            data.push(self.extract_byte()?);
        }
        Ok(data)
    }

    fn extract_size(&mut self) -> Result<u32> {
        Ok(unpack_size(&self.next_window::<SIZE_WINDOW>()?))
    }
}

/// 把载体流定位到头部之后的像素数据。
pub fn skip_header<C: Seek + ?Sized>(carrier: &mut C) -> Result<()> {
    carrier.seek(SeekFrom::Start(BMP_HEADER_SIZE as u64))?;
    Ok(())
}

impl<'f> ContainerDecoder<'f> {
    pub fn new(format: &'f ContainerFormat) -> Self {
        Self { format }
    }

    /// 跳过头部后解码整幅图像。
    pub fn decode_image<C: Read + Seek + ?Sized>(&self, carrier: &mut C) -> Result<RecoveredFile> {
        skip_header(carrier)?;
        self.decode(carrier)
    }

    /// 解码位于偏移 54 处的载体流。
    ///
    /// # Errors
    ///
    /// * 签名不匹配：[`StegoError::NotAContainer`]。
    /// * 扩展名过长、不是 UTF-8 或不在允许列表中：[`StegoError::UnsupportedExtension`]。
    /// * 载体在容器结束前耗尽：[`StegoError::TruncatedContainer`]。
    pub fn decode<C: Read + ?Sized>(&self, carrier: &mut C) -> Result<RecoveredFile> {
        let mut extractor = Extractor { carrier };

        let signature = self.format.signature();
        let found = extractor.extract_bytes(signature.len())?;
        if found != signature {
            return Err(StegoError::NotAContainer);
        }
        debug!("signature validated");

        let extension_len = extractor.extract_size()? as usize;
        if extension_len > self.format.max_extension_len() {
            return Err(StegoError::UnsupportedExtension(format!(
                "<{extension_len} bytes>"
            )));
        }
        let extension = String::from_utf8(extractor.extract_bytes(extension_len)?)
            .map_err(|err| {
                StegoError::UnsupportedExtension(String::from_utf8_lossy(err.as_bytes()).into())
            })?;
        self.format.ensure_allowed(&extension)?;
        debug!("extension '{extension}' validated");

        let payload_size = extractor.extract_size()?;
        debug!("payload size {payload_size}");

        let payload = extractor.extract_bytes(payload_size as usize)?;
        info!("recovered {payload_size} bytes ({extension}) from carrier");

        Ok(RecoveredFile { extension, payload })
    }
}
