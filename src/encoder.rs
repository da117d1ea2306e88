//! # 容器编码模块
//!
//! 按顺序把头部、签名、扩展名、载荷长度和载荷写入输出流，
//! 最后原样复制剩余的载体字节。整个过程只对每个流做一次顺序遍历。

use crate::bitmap::BitmapHeader;
use crate::constants::{BYTE_WINDOW, SIZE_WINDOW};
use crate::error::{Result, StegoError};
use crate::format::ContainerFormat;
use crate::steganography::{pack_byte, pack_size};
use log::{debug, info};
use std::io::{self, ErrorKind, Read, Write};

/// 载荷读取的分块大小。
const PAYLOAD_CHUNK: usize = 4096;

/// 把秘密文件嵌入载体图像。
///
/// 编码器本身不持有可变状态，但同一个载体流或输出流不能被多个调用方同时使用。
#[derive(Debug, Clone, Copy)]
pub struct ContainerEncoder<'f> {
    format: &'f ContainerFormat,
}

/// 从载体中取出窗口、写入数据位并输出到目标流。
struct Embedder<'a, C: ?Sized, W: ?Sized> {
    carrier: &'a mut C,
    sink: &'a mut W,
}

impl<C: Read + ?Sized, W: Write + ?Sized> Embedder<'_, C, W> {
    fn next_window<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut window = [0u8; N];
        self.carrier
            .read_exact(&mut window)
            .map_err(|err| match err.kind() {
                ErrorKind::UnexpectedEof => StegoError::InsufficientCarrier,
                _ => StegoError::Io(err),
            })?;
        Ok(window)
    }

    fn embed_byte(&mut self, value: u8) -> Result<()> {
        let mut window = self.next_window::<BYTE_WINDOW>()?;
        pack_byte(value, &mut window);
        self.sink.write_all(&window)?;
        Ok(())
    }

    fn embed_bytes(&mut self, data: &[u8]) -> Result<()> {
        data.iter().try_for_each(|&byte| self.embed_byte(byte))
    }

    fn embed_size(&mut self, value: u32) -> Result<()> {
        let mut window = self.next_window::<SIZE_WINDOW>()?;
        pack_size(value, &mut window);
        self.sink.write_all(&window)?;
        Ok(())
    }

    fn embed_payload<P: Read + ?Sized>(&mut self, payload: &mut P, expected: u32) -> Result<()> {
        let mut chunk = [0u8; PAYLOAD_CHUNK];
        let mut written: u32 = 0;

        while written < expected {
            let wanted = PAYLOAD_CHUNK.min((expected - written) as usize);
            let read = match payload.read(&mut chunk[..wanted]) {
                Ok(0) => {
                    return Err(StegoError::PayloadShort {
                        expected,
                        actual: written,
                    });
                }
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            self.embed_bytes(&chunk[..read])?;
            written += read as u32;
        }

        Ok(())
    }

    fn copy_tail(&mut self) -> Result<u64> {
        Ok(io::copy(&mut *self.carrier, &mut *self.sink)?)
    }
}

impl<'f> ContainerEncoder<'f> {
    pub fn new(format: &'f ContainerFormat) -> Self {
        Self { format }
    }

    /// 把 `payload` 中的 `payload_len` 个字节连同扩展名嵌入载体。
    ///
    /// `carrier` 必须位于头部之后 (偏移 54)，`header` 为已读出的头部。
    /// 写入顺序：头部、签名、扩展名长度、扩展名、载荷长度、载荷、剩余载体。
    ///
    /// # Errors
    ///
    /// 以下检查在写入任何字节之前完成：
    /// * 扩展名不在允许列表中：[`StegoError::UnsupportedExtension`]。
    /// * 载荷为空：[`StegoError::EmptySecretFile`]。
    /// * 载荷超过 `u32::MAX`：[`StegoError::SecretTooLarge`]。
    /// * 容量不足：[`StegoError::InsufficientCarrierCapacity`]。
    ///
    /// 写入过程中载体耗尽返回 [`StegoError::InsufficientCarrier`]，
    /// 载荷源提前结束返回 [`StegoError::PayloadShort`]。此时输出流中已有部分数据，应当丢弃。
    pub fn encode<P, C, W>(
        &self,
        header: &BitmapHeader,
        extension: &str,
        payload: &mut P,
        payload_len: u64,
        carrier: &mut C,
        sink: &mut W,
    ) -> Result<()>
    where
        P: Read + ?Sized,
        C: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.format.ensure_allowed(extension)?;
        if payload_len == 0 {
            return Err(StegoError::EmptySecretFile);
        }
        let payload_size =
            u32::try_from(payload_len).map_err(|_| StegoError::SecretTooLarge(payload_len))?;
        let extension_size = u32::try_from(extension.len())
            .map_err(|_| StegoError::UnsupportedExtension(extension.to_owned()))?;
        self.format.ensure_capacity(header.capacity(), payload_len)?;
        debug!(
            "capacity ok: {} carrier bytes for {} payload bytes",
            header.capacity(),
            payload_len
        );

        sink.write_all(header.as_bytes())?;
        debug!("bitmap header copied");

        let mut embedder = Embedder { carrier, sink };

        embedder.embed_bytes(self.format.signature())?;
        debug!("signature written");

        embedder.embed_size(extension_size)?;
        embedder.embed_bytes(extension.as_bytes())?;
        debug!("extension '{extension}' written");

        embedder.embed_size(payload_size)?;
        debug!("payload size {payload_size} written");

        embedder.embed_payload(payload, payload_size)?;
        debug!("payload written");

        let tail = embedder.copy_tail()?;
        debug!("{tail} trailing carrier bytes copied");

        embedder.sink.flush()?;
        info!("embedded {payload_size} bytes ({extension}) into carrier");
        Ok(())
    }
}
