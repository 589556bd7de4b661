//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_AMOUNT, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// 把正方形灰度图拆分为上/下三角两段的“秘密图像”，并在像素最低有效位中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "把正方形灰度图拆分为上/下三角两段的“秘密图像”文本文件，或在像素最低有效位 (LSB) 中隐藏、恢复 7 位 ASCII 文本。\n日志级别由环境变量 RUST_LOG 控制。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将正方形图像拆分为秘密图像文件。
    Split(SplitArgs),

    /// 从秘密图像文件重建图像并保存为 PNG。
    Reconstruct(ReconstructArgs),

    /// 在图像中隐藏文本，结果保存为秘密图像文件。
    Hide(HideArgs),

    /// 从秘密图像文件或普通图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 对秘密图像施加滤波，并回写为新的秘密图像文件。
    Filter(FilterArgs),
}

/// 'split' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct SplitArgs {
    /// 输入图像文件路径 (必须为正方形)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 秘密图像文件的输出路径。缺省时为输入文件同目录下的 `<文件名>.secret`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'reconstruct' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ReconstructArgs {
    /// 秘密图像文件路径。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 重建图像的输出路径。缺省时为 `reconstructed_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (必须为正方形)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。每个字符只保留低 7 位。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 秘密图像文件的输出路径。缺省时为 `doctored_<文件名>.secret`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["secret", "image"])))]
pub struct RecoverArgs {
    /// 含有隐藏文本的秘密图像文件路径。
    #[arg(short, long)]
    pub secret: Option<PathBuf>,

    /// 含有隐藏文本的普通图像文件路径。
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// 隐藏文本的字符数。
    #[arg(short, long)]
    pub length: usize,

    /// 恢复文本的输出路径。缺省时为 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 可用的滤波器。
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// 均值滤波。
    Mean,
    /// 高斯平滑。
    Gaussian,
    /// 反锐化掩模。
    Unsharp,
}

/// 'filter' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// 秘密图像文件路径。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 滤波器种类。
    #[arg(short, long, value_enum)]
    pub kind: FilterKind,

    /// 卷积核边长，必须为正奇数。
    #[arg(long, default_value_t = DEFAULT_KERNEL_SIZE)]
    pub kernel_size: usize,

    /// 高斯平滑的标准差。
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f64,

    /// 反锐化掩模的增强系数。
    #[arg(long, default_value_t = DEFAULT_AMOUNT)]
    pub amount: f64,

    /// 滤波结果的输出路径。缺省时为 `filtered_<文件名>.secret`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}
