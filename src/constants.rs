/// 每个字符隐藏的比特数。
/// 只保留字符的低 7 位 (ASCII)，最高位被丢弃。
pub const BITS_PER_CHAR: usize = 7;

/// 字符低 7 位的掩码。
pub const CHAR_MASK: u8 = 0x7F;

/// 默认卷积核尺寸。
pub const DEFAULT_KERNEL_SIZE: usize = 3;

/// 高斯平滑的默认标准差。
pub const DEFAULT_SIGMA: f64 = 1.0;

/// 反锐化掩模使用的模糊标准差，固定为 1.0。
pub const UNSHARP_SIGMA: f64 = 1.0;

/// 反锐化掩模的默认增强系数。
pub const DEFAULT_AMOUNT: f64 = 1.5;

/// 秘密图像文件的默认扩展名。
pub const SECRET_EXTENSION: &str = "secret";

/// 重建图像的默认扩展名 (PNG 为无损格式)。
pub const IMAGE_EXTENSION: &str = "png";

/// 恢复文本的默认扩展名。
pub const TEXT_EXTENSION: &str = "txt";
