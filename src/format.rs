//! # 容器格式模块
//!
//! 嵌入载体的容器布局 (每个字段均按 1 bit / 载体字节编码)：
//!
//! ```text
//! [54 字节头部][签名][扩展名长度 u32][扩展名][载荷长度 u32][载荷][剩余载体原样复制]
//! ```
//!
//! 签名与允许的扩展名属于调用方的策略，由 [`ContainerFormat`] 统一携带，
//! 编码端与解码端共享同一个不可变实例。

use crate::capacity::{check_capacity, required_carrier_bytes};
use crate::constants::{DEFAULT_EXTENSIONS, DEFAULT_SIGNATURE};
use crate::error::{Result, StegoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFormat {
    signature: Vec<u8>,
    allowed_extensions: Vec<String>,
}

impl Default for ContainerFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE, DEFAULT_EXTENSIONS)
    }
}

impl ContainerFormat {
    pub fn new<S: AsRef<str>>(signature: &[u8], allowed_extensions: &[S]) -> Self {
        Self {
            signature: signature.to_vec(),
            allowed_extensions: allowed_extensions
                .iter()
                .map(|ext| ext.as_ref().to_owned())
                .collect(),
        }
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|ext| ext == extension)
    }

    /// 允许列表中最长扩展名的字节数，容量计算按它预留空间。
    pub fn max_extension_len(&self) -> usize {
        self.allowed_extensions
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
    }

    pub fn ensure_allowed(&self, extension: &str) -> Result<()> {
        if self.is_allowed(extension) {
            Ok(())
        } else {
            Err(StegoError::UnsupportedExtension(extension.to_owned()))
        }
    }

    /// 在写入任何字节之前检查载体容量。
    ///
    /// # Errors
    ///
    /// 容量不足时返回 [`StegoError::InsufficientCarrierCapacity`]，
    /// 其中 `required` 为必须超过的字节数。
    pub fn ensure_capacity(&self, carrier_bytes: u64, payload_len: u64) -> Result<()> {
        let signature_len = self.signature.len() as u64;
        let max_extension_len = self.max_extension_len() as u64;

        if check_capacity(carrier_bytes, signature_len, max_extension_len, payload_len) {
            return Ok(());
        }

        Err(StegoError::InsufficientCarrierCapacity {
            required: required_carrier_bytes(signature_len, max_extension_len, payload_len)
                .unwrap_or(u64::MAX),
            available: carrier_bytes,
        })
    }
}
