//! # 位编解码模块
//!
//! 把数值的每一位写入载体字节的最低有效位，或从中读回。
//! 位序固定为 MSB 在前：数值的最高位写入窗口的第 0 个字节。

use crate::constants::{BYTE_WINDOW, SIZE_WINDOW};

/// 隐藏一个字节所用的载体窗口。
pub type ByteWindow = [u8; BYTE_WINDOW];

/// 隐藏一个 `u32` 所用的载体窗口。
pub type SizeWindow = [u8; SIZE_WINDOW];

fn pack_bits(value: u32, window: &mut [u8]) {
    let top = window.len() - 1;
    for (index, byte) in window.iter_mut().enumerate() {
        let bit = ((value >> (top - index)) & 1) as u8;
        *byte = (*byte & 0xFE) | bit;
    }
}

fn unpack_bits(window: &[u8]) -> u32 {
    window
        .iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(byte & 1))
}

/// 把 `value` 的 8 位依次写入窗口中 8 个字节的最低有效位，其余位保持不变。
pub fn pack_byte(value: u8, window: &mut ByteWindow) {
    pack_bits(u32::from(value), window);
}

/// 从窗口中 8 个字节的最低有效位组装出一个字节。
pub fn unpack_byte(window: &ByteWindow) -> u8 {
    unpack_bits(window) as u8
}

/// 把 `value` 的 32 位依次写入窗口中 32 个字节的最低有效位。
pub fn pack_size(value: u32, window: &mut SizeWindow) {
    pack_bits(value, window);
}

/// 从窗口中 32 个字节的最低有效位组装出一个 `u32`，第 0 个字节为最高位。
pub fn unpack_size(window: &SizeWindow) -> u32 {
    unpack_bits(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_lands_in_first_carrier_byte() {
        let mut window = [0u8; BYTE_WINDOW];
        pack_byte(0b1000_0001, &mut window);
        assert_eq!(window, [1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn packing_keeps_upper_bits() {
        let mut window = [0xFFu8; BYTE_WINDOW];
        pack_byte(0, &mut window);
        assert_eq!(window, [0xFE; BYTE_WINDOW]);

        let mut window = [0xAAu8; BYTE_WINDOW];
        pack_byte(b'#', &mut window);
        for byte in window {
            assert_eq!(byte & 0xFE, 0xAA);
        }
        assert_eq!(unpack_byte(&window), b'#');
    }

    #[test]
    fn every_byte_value_survives() {
        let mut window = [0x5Cu8; BYTE_WINDOW];
        for value in 0..=u8::MAX {
            pack_byte(value, &mut window);
            assert_eq!(unpack_byte(&window), value);
        }
    }

    #[test]
    fn size_uses_the_same_bit_order() {
        let mut window = [0u8; SIZE_WINDOW];
        pack_size(1, &mut window);
        assert_eq!(window[SIZE_WINDOW - 1], 1);
        assert!(window[..SIZE_WINDOW - 1].iter().all(|&b| b == 0));

        pack_size(0x8000_0000, &mut window);
        assert_eq!(window[0], 1);
        assert!(window[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn size_extremes() {
        let mut window = [0x7Fu8; SIZE_WINDOW];
        for value in [0, 1, 4, 0xDEAD_BEEF, u32::MAX] {
            pack_size(value, &mut window);
            assert_eq!(unpack_size(&window), value);
        }
    }
}
