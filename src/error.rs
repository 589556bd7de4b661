//! # 错误类型模块
//!
//! 库层面所有可能失败的操作都返回 [`CodecError`]。
//! 命令行层 (`handler`) 再用 `anyhow` 为其附加上下文。

use thiserror::Error;

/// 库内统一使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, CodecError>;

/// 拆分、重建、隐写与滤波过程中可能出现的错误。
#[derive(Error, Debug)]
pub enum CodecError {
    /// 需要正方形图像的操作收到了非正方形图像。
    #[error("Image is not square: {width}x{height}")]
    Shape { width: u32, height: u32 },

    /// 载荷所需的像素数超过了图像能提供的像素数。
    #[error("Not enough pixels in the image. Required: {required}, Available: {available}")]
    Capacity { required: usize, available: usize },

    /// 比特数组长度不是 7 的倍数。
    #[error("Bit array length {len} is not a multiple of 7")]
    Format { len: usize },

    /// 三角序列的长度与图像边长不符。
    #[error("Triangular sequence holds {actual} values, expected {expected}")]
    TriangleLength { expected: usize, actual: usize },

    /// 两幅图像尺寸不一致，无法逐像素运算。
    #[error("Image dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    /// 卷积核尺寸必须为正奇数。
    #[error("Kernel size must be a positive odd number, got {0}")]
    InvalidKernel(usize),

    /// 高斯核的标准差必须为正的有限数。
    #[error("Gaussian sigma must be positive and finite, got {0}")]
    InvalidSigma(f64),

    /// 秘密图像文件被截断或内容格式错误。
    #[error("Malformed secret image data: {0}")]
    Parse(String),

    /// 图像编解码失败。
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// 文件无法打开、读取或写入。
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
