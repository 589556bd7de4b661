//! # clear_vision 库
//!
//! 本库包含秘密图像 (三角拆分) 与 7 位 LSB 隐写的核心逻辑，
//! 以及命令行工具使用的参数定义和处理函数。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod filter;
pub mod handler;
pub mod raster;
pub mod secret;
pub mod steganography;

pub use error::{CodecError, Result};
pub use raster::RasterImage;
pub use secret::SecretImage;
