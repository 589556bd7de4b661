//! # 秘密图像模块
//!
//! 把一幅 `n×n` 的正方形灰度图沿主对角线拆成两段紧凑序列：
//!
//! * `upper`：所有 `col >= row` 的像素 (含对角线)，共 `n*(n+1)/2` 个；
//! * `lower`：所有 `col < row` 的像素，共 `n*(n-1)/2` 个。
//!
//! 两段序列都按行优先顺序 (外层行、内层列) 填充。拆分、重建与回写
//! 共享同一遍历规则，因此 `reconstruct(split(x)) == x` 严格成立。
//!
//! 磁盘格式为三行文本：
//!
//! ```text
//! <width> <height>
//! <upper[0]> <upper[1]> ... <upper[U-1]>
//! <lower[0]> <lower[1]> ... <lower[L-1]>
//! ```

use crate::error::{CodecError, Result};
use crate::raster::RasterImage;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 以上、下三角两段序列表示的正方形图像。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretImage {
    width: u32,
    height: u32,
    upper: Vec<u8>,
    lower: Vec<u8>,
}

/// 边长为 `n` 时上三角 (含对角线) 的元素个数。
pub fn upper_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// 边长为 `n` 时严格下三角的元素个数。
pub fn lower_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// 行优先遍历 `n×n` 网格的所有坐标。
fn cells(n: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..n).flat_map(move |row| (0..n).map(move |col| (row, col)))
}

fn in_upper(row: u32, col: u32) -> bool {
    col >= row
}

/// 按统一遍历规则把整幅图像划分为上、下两段序列。
fn partition(image: &RasterImage) -> (Vec<u8>, Vec<u8>) {
    let n = image.width();
    let mut upper = Vec::with_capacity(upper_len(n as usize));
    let mut lower = Vec::with_capacity(lower_len(n as usize));

    for (row, col) in cells(n) {
        let pixel = image.get_pixel(row, col);
        if in_upper(row, col) {
            upper.push(pixel);
        } else {
            lower.push(pixel);
        }
    }

    (upper, lower)
}

impl SecretImage {
    /// 将正方形图像拆分为上、下三角序列。
    ///
    /// # Errors
    ///
    /// 图像宽高不等时返回 [`CodecError::Shape`]。
    pub fn split(image: &RasterImage) -> Result<Self> {
        if !image.is_square() {
            return Err(CodecError::Shape {
                width: image.width(),
                height: image.height(),
            });
        }

        let (upper, lower) = partition(image);
        debug!(
            "split {n}x{n} image into {} upper and {} lower values",
            upper.len(),
            lower.len(),
            n = image.width()
        );

        Ok(Self {
            width: image.width(),
            height: image.height(),
            upper,
            lower,
        })
    }

    /// 直接由调用方提供的两段序列构造，序列的所有权随之转移。
    ///
    /// # Errors
    ///
    /// * 宽高不等时返回 [`CodecError::Shape`]。
    /// * 任一序列长度与边长不符时返回 [`CodecError::TriangleLength`]。
    pub fn from_parts(width: u32, height: u32, upper: Vec<u8>, lower: Vec<u8>) -> Result<Self> {
        if width != height {
            return Err(CodecError::Shape { width, height });
        }

        let n = width as usize;
        for (expected, actual) in [(upper_len(n), upper.len()), (lower_len(n), lower.len())] {
            if expected != actual {
                return Err(CodecError::TriangleLength { expected, actual });
            }
        }

        Ok(Self {
            width,
            height,
            upper,
            lower,
        })
    }

    /// 重新分配一幅 `n×n` 图像，并按拆分时的顺序依次取回每个像素。
    pub fn reconstruct(&self) -> RasterImage {
        let mut image = RasterImage::new(self.width, self.height);
        let mut upper = self.upper.iter();
        let mut lower = self.lower.iter();

        for (row, col) in cells(self.width) {
            let source = if in_upper(row, col) {
                upper.next()
            } else {
                lower.next()
            };
            // 长度在构造时已校验，游标不会提前耗尽。
            if let Some(&value) = source {
                image.set_pixel(row, col, value);
            }
        }

        image
    }

    /// 用一幅 (可能已被滤波修改过的) 完整图像覆盖当前的三角序列。
    ///
    /// # Errors
    ///
    /// 图像尺寸与本秘密图像不同时返回 [`CodecError::DimensionMismatch`]，
    /// 此时原有数据保持不变。
    pub fn save_back(&mut self, image: &RasterImage) -> Result<()> {
        if image.width() != self.width || image.height() != self.height {
            return Err(CodecError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: image.width(),
                right_height: image.height(),
            });
        }

        let (upper, lower) = partition(image);
        self.upper = upper;
        self.lower = lower;
        Ok(())
    }

    /// 把三行文本格式写入 `writer`。
    pub fn serialize<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{} {}", self.width, self.height)?;
        write_values(&mut writer, &self.upper)?;
        write_values(&mut writer, &self.lower)?;
        writer.flush()?;
        Ok(())
    }

    /// 从文本流解析秘密图像。
    ///
    /// # Errors
    ///
    /// * 读取失败时返回 [`CodecError::Io`]。
    /// * 数据被截断、含有非整数或越界取值、或在末尾残留多余数据时，
    ///   返回 [`CodecError::Parse`]，不会产生部分结果。
    pub fn deserialize<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut tokens = text.split_ascii_whitespace();

        let width: u32 = next_number(&mut tokens, "width")?;
        let height: u32 = next_number(&mut tokens, "height")?;
        if width != height {
            return Err(CodecError::Shape { width, height });
        }

        let n = width as usize;
        let upper = read_values(&mut tokens, upper_len(n), "upper")?;
        let lower = read_values(&mut tokens, lower_len(n), "lower")?;

        if let Some(extra) = tokens.next() {
            return Err(CodecError::Parse(format!(
                "unexpected trailing token '{extra}'"
            )));
        }

        debug!(
            "parsed {n}x{n} secret image ({} upper, {} lower values)",
            upper.len(),
            lower.len()
        );
        Self::from_parts(width, height, upper, lower)
    }

    /// 保存到文件。
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.serialize(BufWriter::new(file))
    }

    /// 从文件加载。
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::deserialize(BufReader::new(file))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 上三角 (含对角线) 序列。
    pub fn upper(&self) -> &[u8] {
        &self.upper
    }

    /// 严格下三角序列。
    pub fn lower(&self) -> &[u8] {
        &self.lower
    }

    /// 拆出内部的两段序列。
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.upper, self.lower)
    }
}

impl TryFrom<&RasterImage> for SecretImage {
    type Error = CodecError;

    fn try_from(image: &RasterImage) -> Result<Self> {
        Self::split(image)
    }
}

/// 以空格分隔写出一行数值，行尾不留空格。
fn write_values<W: Write>(writer: &mut W, values: &[u8]) -> std::io::Result<()> {
    let mut iter = values.iter();
    if let Some(first) = iter.next() {
        write!(writer, "{first}")?;
        for value in iter {
            write!(writer, " {value}")?;
        }
    }
    writeln!(writer)
}

fn next_number<'a, T, I>(tokens: &mut I, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| CodecError::Parse(format!("unexpected end of data while reading {what}")))?;
    token
        .parse()
        .map_err(|_| CodecError::Parse(format!("invalid {what} value '{token}'")))
}

fn read_values<'a, I>(tokens: &mut I, count: usize, what: &str) -> Result<Vec<u8>>
where
    I: Iterator<Item = &'a str>,
{
    // 不按 count 预分配：count 来自文件头，可能是伪造的巨大值。
    let mut values = Vec::new();
    for found in 0..count {
        let token = tokens.next().ok_or_else(|| {
            CodecError::Parse(format!(
                "unexpected end of data: expected {count} {what} values, found {found}"
            ))
        })?;
        let value = token
            .parse()
            .map_err(|_| CodecError::Parse(format!("invalid {what} value '{token}'")))?;
        values.push(value);
    }
    Ok(values)
}
