//! # 卷积滤波模块
//!
//! 提供均值、高斯平滑与反锐化掩模三种滤波。全部为纯函数：
//! 输入图像保持不变，结果写入新分配的图像。适用于任意矩形图像。

use crate::constants::UNSHARP_SIGMA;
use crate::error::{CodecError, Result};
use crate::raster::RasterImage;
use log::debug;
use std::f64::consts::PI;

fn check_kernel(kernel_size: usize) -> Result<()> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(CodecError::InvalidKernel(kernel_size));
    }
    Ok(())
}

/// 以 `(row, col)` 为中心、半径为 `radius` 的窗口内，所有落在图像内部的邻居及其窗口偏移。
fn window(
    image: &RasterImage,
    row: u32,
    col: u32,
    radius: usize,
) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
    let radius = radius as i64;
    let (height, width) = (image.height() as i64, image.width() as i64);
    (-radius..=radius).flat_map(move |dx| {
        (-radius..=radius).filter_map(move |dy| {
            let (r, c) = (row as i64 + dx, col as i64 + dy);
            (r >= 0 && r < height && c >= 0 && c < width).then(|| {
                (
                    (dx + radius) as usize,
                    (dy + radius) as usize,
                    image.get_pixel(r as u32, c as u32),
                )
            })
        })
    })
}

fn map_pixels(image: &RasterImage, f: impl Fn(u32, u32) -> u8) -> RasterImage {
    let mut result = RasterImage::new(image.width(), image.height());
    for row in 0..image.height() {
        for col in 0..image.width() {
            result.set_pixel(row, col, f(row, col));
        }
    }
    result
}

fn clamp_to_pixel(value: f64) -> u8 {
    // `as` 对浮点数向零截断并饱和到目标类型的范围。
    value.clamp(0.0, 255.0) as u8
}

/// 均值滤波。
///
/// 窗口越出图像边界的部分按 0 计入，但仍计入除数，因此边缘会略微变暗。
///
/// # Errors
///
/// `kernel_size` 不是正奇数时返回 [`CodecError::InvalidKernel`]。
pub fn mean(image: &RasterImage, kernel_size: usize) -> Result<RasterImage> {
    check_kernel(kernel_size)?;
    let count = (kernel_size * kernel_size) as f64;
    debug!("mean filter, kernel {kernel_size}x{kernel_size}");

    Ok(map_pixels(image, |row, col| {
        let sum: f64 = window(image, row, col, kernel_size / 2)
            .map(|(_, _, pixel)| f64::from(pixel))
            .sum();
        clamp_to_pixel(sum / count)
    }))
}

/// 归一化的二维高斯核，中心位于 `(k-1)/2`。
fn gaussian_kernel(kernel_size: usize, sigma: f64) -> Vec<Vec<f64>> {
    let center = (kernel_size as f64 - 1.0) / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<Vec<f64>> = (0..kernel_size)
        .map(|i| {
            (0..kernel_size)
                .map(|j| {
                    let x = i as f64 - center;
                    let y = j as f64 - center;
                    (-(x * x + y * y) / two_sigma_sq).exp() / (PI * two_sigma_sq)
                })
                .collect()
        })
        .collect();

    let sum: f64 = kernel.iter().flatten().sum();
    kernel.iter_mut().flatten().for_each(|weight| *weight /= sum);
    kernel
}

/// 高斯平滑。
///
/// 越界邻居直接跳过，权重不再重新归一化。
///
/// # Errors
///
/// * `kernel_size` 不是正奇数时返回 [`CodecError::InvalidKernel`]。
/// * `sigma` 不是正的有限数时返回 [`CodecError::InvalidSigma`]。
pub fn gaussian(image: &RasterImage, kernel_size: usize, sigma: f64) -> Result<RasterImage> {
    check_kernel(kernel_size)?;
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(CodecError::InvalidSigma(sigma));
    }
    debug!("gaussian filter, kernel {kernel_size}x{kernel_size}, sigma {sigma}");

    let kernel = gaussian_kernel(kernel_size, sigma);
    Ok(map_pixels(image, |row, col| {
        let weighted: f64 = window(image, row, col, kernel_size / 2)
            .map(|(i, j, pixel)| f64::from(pixel) * kernel[i][j])
            .sum();
        clamp_to_pixel(weighted)
    }))
}

/// 反锐化掩模：`out = orig + trunc(amount * (orig - blurred))`，结果截断到 `[0, 255]`。
///
/// 模糊图固定使用 `sigma = 1.0` 的高斯平滑。
pub fn unsharp_mask(image: &RasterImage, kernel_size: usize, amount: f64) -> Result<RasterImage> {
    let blurred = gaussian(image, kernel_size, UNSHARP_SIGMA)?;
    debug!("unsharp mask, amount {amount}");

    Ok(map_pixels(image, |row, col| {
        let original = i32::from(image.get_pixel(row, col));
        let edge = original - i32::from(blurred.get_pixel(row, col));
        let sharpened = original + (amount * f64::from(edge)) as i32;
        sharpened.clamp(0, 255) as u8
    }))
}
