//! # 容量规划模块
//!
//! 在消耗任何载体字节之前，判断载体是否足以容纳整个容器。

use crate::constants::{BYTE_WINDOW, SIZE_FIELD_BYTES};

/// 容纳整个容器所需的载体字节数：
/// `8 × (签名长度 + 4 + 最长扩展名 + 4 + 载荷长度)`。
///
/// 算术溢出时返回 `None`。
pub fn required_carrier_bytes(
    signature_len: u64,
    max_extension_len: u64,
    payload_len: u64,
) -> Option<u64> {
    signature_len
        .checked_add(SIZE_FIELD_BYTES)?
        .checked_add(max_extension_len)?
        .checked_add(SIZE_FIELD_BYTES)?
        .checked_add(payload_len)?
        .checked_mul(BYTE_WINDOW as u64)
}

/// 载体字节数必须严格大于所需字节数，恰好相等视为不足。
pub fn check_capacity(
    carrier_bytes: u64,
    signature_len: u64,
    max_extension_len: u64,
    payload_len: u64,
) -> bool {
    required_carrier_bytes(signature_len, max_extension_len, payload_len)
        .is_some_and(|required| carrier_bytes > required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_scenario() {
        assert_eq!(required_carrier_bytes(2, 4, 2), Some(128));
        assert!(check_capacity(1000, 2, 4, 2));
    }

    #[test]
    fn equality_is_not_enough() {
        let required = required_carrier_bytes(2, 4, 10).unwrap();
        assert!(!check_capacity(required, 2, 4, 10));
        assert!(check_capacity(required + 1, 2, 4, 10));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(required_carrier_bytes(2, 4, u64::MAX), None);
        assert!(!check_capacity(u64::MAX, 2, 4, u64::MAX));
    }
}
