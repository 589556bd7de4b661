//! # 灰度栅格图像模块
//!
//! [`RasterImage`] 持有一块单通道 8 位像素网格，按 `(row, col)` 寻址，
//! 行优先存储。文件读写委托给 `image` crate。

use crate::error::{CodecError, Result};
use image::{GrayImage, Luma};
use log::debug;
use std::path::Path;

/// 单通道灰度图像，像素值范围 `[0, 255]`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    buffer: GrayImage,
}

impl RasterImage {
    /// 创建一幅全零 (全黑) 的空白图像。
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: GrayImage::new(width, height),
        }
    }

    /// 由行优先排列的原始像素构造图像。
    ///
    /// # Errors
    ///
    /// 当 `pixels.len() != width * height` 时返回 [`CodecError::Capacity`]。
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let required = width as usize * height as usize;
        if pixels.len() != required {
            return Err(CodecError::Capacity {
                required,
                available: pixels.len(),
            });
        }
        let available = pixels.len();
        GrayImage::from_raw(width, height, pixels)
            .map(|buffer| Self { buffer })
            .ok_or(CodecError::Capacity {
                required,
                available,
            })
    }

    /// 从文件读取图像，并统一转换为单通道灰度。
    ///
    /// # Errors
    ///
    /// 文件不存在、无法读取或格式不受支持时返回错误，不会终止进程。
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = image::open(path)?.into_luma8();
        debug!(
            "loaded {} as {}x{} grayscale",
            path.display(),
            buffer.width(),
            buffer.height()
        );
        Ok(Self { buffer })
    }

    /// 以无损格式保存图像，格式由扩展名决定。
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.buffer.save(path.as_ref())?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// 像素总数，即 LSB 隐写的比特容量。
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// 读取第 `row` 行、第 `col` 列的像素。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic，与切片索引一致。
    pub fn get_pixel(&self, row: u32, col: u32) -> u8 {
        self.buffer.get_pixel(col, row).0[0]
    }

    /// 写入第 `row` 行、第 `col` 列的像素。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic。
    pub fn set_pixel(&mut self, row: u32, col: u32, value: u8) {
        self.buffer.put_pixel(col, row, Luma([value]));
    }

    /// 行优先排列的像素切片。
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// 逐像素相加并截断到 `[0, 255]`，返回新图像，不修改任何一个操作数。
    pub fn saturating_add(&self, other: &RasterImage) -> Result<RasterImage> {
        self.zip_with(other, u8::saturating_add)
    }

    /// 逐像素相减并截断到 `[0, 255]`，返回新图像。
    pub fn saturating_sub(&self, other: &RasterImage) -> Result<RasterImage> {
        self.zip_with(other, u8::saturating_sub)
    }

    fn zip_with(&self, other: &RasterImage, op: impl Fn(u8, u8) -> u8) -> Result<RasterImage> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(CodecError::DimensionMismatch {
                left_width: self.width(),
                left_height: self.height(),
                right_width: other.width(),
                right_height: other.height(),
            });
        }

        let pixels = self
            .as_raw()
            .iter()
            .zip(other.as_raw())
            .map(|(&a, &b)| op(a, b))
            .collect();

        RasterImage::from_raw(self.width(), self.height(), pixels)
    }
}

impl From<GrayImage> for RasterImage {
    fn from(buffer: GrayImage) -> Self {
        Self { buffer }
    }
}

impl From<RasterImage> for GrayImage {
    fn from(image: RasterImage) -> Self {
        image.buffer
    }
}
