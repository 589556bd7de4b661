//! # LSB 隐写核心算法
//!
//! 消息按每字符 7 比特 (低位在前) 展开为比特数组，再写入像素的最低有效位。
//! 写入与读取都使用**逆行优先**顺序：从右下角像素 `(height-1, width-1)`
//! 开始，列递减最快，然后行递减。两端必须保持一致，否则无法往返。

use crate::constants::{BITS_PER_CHAR, CHAR_MASK};
use crate::error::{CodecError, Result};
use crate::raster::RasterImage;
use crate::secret::SecretImage;
use log::debug;

/// 逆行优先遍历 `width×height` 网格的所有坐标 `(row, col)`。
pub fn reverse_row_major(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height)
        .rev()
        .flat_map(move |row| (0..width).rev().map(move |col| (row, col)))
}

/// 把文本展开为比特数组。
///
/// 逐字节处理，每个字节只保留低 7 位并按低位在前输出，
/// 因此结果长度恒为 `7 * text.len()`。非 ASCII 字节的最高位被丢弃，这不是错误。
pub fn encode_message(text: &str) -> Vec<u8> {
    let bits: Vec<u8> = text
        .bytes()
        .flat_map(|byte| {
            let byte = byte & CHAR_MASK;
            (0..BITS_PER_CHAR).map(move |i| (byte >> i) & 1)
        })
        .collect();
    debug!("encoded {} characters into {} bits", text.len(), bits.len());
    bits
}

/// 把比特数组还原为文本，每 7 比特 (低位在前) 对应一个字符。
///
/// # Errors
///
/// 比特数不是 7 的倍数时返回 [`CodecError::Format`]。
pub fn decode_bits(bits: &[u8]) -> Result<String> {
    if bits.len() % BITS_PER_CHAR != 0 {
        return Err(CodecError::Format { len: bits.len() });
    }

    Ok(bits
        .chunks_exact(BITS_PER_CHAR)
        .map(|group| {
            let value = group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << i));
            char::from(value)
        })
        .collect())
}

/// 按逆行优先顺序读取 `message_length` 个字符所需的最低有效位。
///
/// # Errors
///
/// 所需比特数超过像素总数时返回 [`CodecError::Capacity`]。
pub fn extract(image: &RasterImage, message_length: usize) -> Result<Vec<u8>> {
    let available = image.pixel_count();
    let required = message_length
        .checked_mul(BITS_PER_CHAR)
        .ok_or(CodecError::Capacity {
            required: usize::MAX,
            available,
        })?;
    if required > available {
        return Err(CodecError::Capacity {
            required,
            available,
        });
    }

    let bits: Vec<u8> = reverse_row_major(image.width(), image.height())
        .take(required)
        .map(|(row, col)| image.get_pixel(row, col) & 1)
        .collect();
    debug!("extracted {} bits for {message_length} characters", bits.len());
    Ok(bits)
}

/// 按逆行优先顺序把比特写入像素最低有效位，返回拆分后的秘密图像。
///
/// 输入图像不会被修改；未访问的像素以及所有高 7 位保持原值。
///
/// # Errors
///
/// * `bits.len()` 超过像素总数时返回 [`CodecError::Capacity`]。
/// * 图像不是正方形时返回 [`CodecError::Shape`]。
///
/// 两项检查都在复制图像之前完成。
pub fn embed(image: &RasterImage, bits: &[u8]) -> Result<SecretImage> {
    let available = image.pixel_count();
    if bits.len() > available {
        return Err(CodecError::Capacity {
            required: bits.len(),
            available,
        });
    }
    if !image.is_square() {
        return Err(CodecError::Shape {
            width: image.width(),
            height: image.height(),
        });
    }

    let mut doctored = image.clone();
    for ((row, col), &bit) in reverse_row_major(image.width(), image.height()).zip(bits) {
        let pixel = doctored.get_pixel(row, col);
        doctored.set_pixel(row, col, (pixel & !1) | (bit & 1));
    }
    debug!("embedded {} bits into {available} pixels", bits.len());

    SecretImage::split(&doctored)
}

/// `embed(image, encode_message(text))`。
pub fn hide(image: &RasterImage, text: &str) -> Result<SecretImage> {
    embed(image, &encode_message(text))
}

/// `decode_bits(extract(image, message_length))`。
pub fn reveal(image: &RasterImage, message_length: usize) -> Result<String> {
    decode_bits(&extract(image, message_length)?)
}

/// 先重建秘密图像，再从中恢复消息。
pub fn reveal_secret(secret: &SecretImage, message_length: usize) -> Result<String> {
    reveal(&secret.reconstruct(), message_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_row_major_starts_bottom_right() {
        let order: Vec<_> = reverse_row_major(2, 2).collect();
        assert_eq!(order, vec![(1, 1), (1, 0), (0, 1), (0, 0)]);
    }

    #[test]
    fn encode_emits_low_bit_first() {
        // 'A' = 0b100_0001
        assert_eq!(encode_message("A"), vec![1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn encode_drops_high_bit() {
        // "é" 的 UTF-8 为 0xC3 0xA9，各自只剩低 7 位。
        let bits = encode_message("é");
        assert_eq!(bits.len(), 14);
        assert_eq!(decode_bits(&bits).unwrap(), "\u{43}\u{29}");
    }
}
