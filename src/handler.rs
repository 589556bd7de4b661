//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心算法以及向用户报告结果。

use crate::cli::{FilterArgs, FilterKind, HideArgs, ReconstructArgs, RecoverArgs, SplitArgs};
use crate::constants::{BITS_PER_CHAR, IMAGE_EXTENSION, SECRET_EXTENSION, TEXT_EXTENSION};
use crate::filter;
use crate::raster::RasterImage;
use crate::secret::SecretImage;
use crate::steganography::{hide, reveal, reveal_secret};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 用户未指定输出路径时，在输入文件旁生成 `<prefix><文件名>.<extension>`。
fn resolve_output(dest: Option<PathBuf>, input: &Path, prefix: &str, extension: &str) -> PathBuf {
    dest.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        input.with_file_name(format!("{prefix}{stem}.{extension}"))
    })
}

/// 目标文件已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn load_image(path: &Path) -> Result<RasterImage> {
    RasterImage::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn load_secret(path: &Path) -> Result<SecretImage> {
    SecretImage::load_from_file(path).with_context(|| {
        format!(
            "Unable to read secret image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn save_secret(secret: &SecretImage, path: &Path) -> Result<()> {
    secret.save_to_file(path).with_context(|| {
        format!(
            "Unable to write to target secret image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    info!(
        "wrote {}x{} secret image to {}",
        secret.width(),
        secret.height(),
        path.display()
    );
    Ok(())
}

/// 处理 'Split' 命令的执行逻辑。
///
/// 读取图像，拆分为上、下三角序列，并写入秘密图像文件。
///
/// # Errors
///
/// * 无法读取输入图像，或图像不是正方形。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入目标文件。
pub fn handle_split(args: SplitArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.image, "", SECRET_EXTENSION);
    ensure_writable(&dest, args.force)?;

    let image = load_image(&args.image)?;
    let secret = SecretImage::split(&image).with_context(|| {
        format!(
            "Failed to split image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    save_secret(&secret, &dest)?;

    println!(
        "The image has been successfully split and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Reconstruct' 命令的执行逻辑。
///
/// # Errors
///
/// * 秘密图像文件无法读取或格式错误。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_reconstruct(args: ReconstructArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.secret, "reconstructed_", IMAGE_EXTENSION);
    ensure_writable(&dest, args.force)?;

    let secret = load_secret(&args.secret)?;
    secret.reconstruct().save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("reconstructed {} into {}", args.secret.display(), dest.display());

    println!(
        "The image has been successfully reconstructed and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、把文本嵌入像素最低有效位，
/// 最后将结果写入秘密图像文件。恢复时需要文本长度，因此成功后会一并打印。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 图像没有足够的像素来隐藏文本，或图像不是正方形。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.image, "doctored_", SECRET_EXTENSION);
    ensure_writable(&dest, args.force)?;

    let image = load_image(&args.image)?;
    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    if !text.is_ascii() {
        warn!("text contains non-ASCII characters; only the low 7 bits of each byte are kept");
    }

    let required_space = text.len() * BITS_PER_CHAR;
    let available_space = image.pixel_count();
    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let secret = hide(&image, &text).with_context(|| {
        format!(
            "Failed to hide the text in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    save_secret(&secret, &dest)?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    println!(
        "Recover it with --length {}",
        text.len().to_string().green().bold()
    );
    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 来源可以是秘密图像文件，也可以是普通图像。
///
/// # Errors
///
/// * 无法读取来源文件。
/// * 请求的长度超出图像容量。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let source = match (&args.secret, &args.image) {
        (Some(secret), _) => secret.clone(),
        (None, Some(image)) => image.clone(),
        (None, None) => anyhow::bail!("Either --secret or --image must be provided."),
    };
    let dest = resolve_output(args.text, &source, "recovered_", TEXT_EXTENSION);
    ensure_writable(&dest, args.force)?;

    let text = if args.secret.is_some() {
        reveal_secret(&load_secret(&source)?, args.length)
    } else {
        reveal(&load_image(&source)?, args.length)
    }
    .with_context(|| {
        format!(
            "Failed to recover {} characters from '{}'.",
            args.length.to_string().red().bold(),
            source.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("recovered {} characters into {}", text.len(), dest.display());

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Filter' 命令的执行逻辑。
///
/// 重建秘密图像、施加滤波、回写三角序列，最后保存为新的秘密图像文件。
///
/// # Errors
///
/// * 秘密图像文件无法读取或格式错误。
/// * 滤波参数无效。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_filter(args: FilterArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.secret, "filtered_", SECRET_EXTENSION);
    ensure_writable(&dest, args.force)?;

    let mut secret = load_secret(&args.secret)?;
    let image = secret.reconstruct();

    let filtered = match args.kind {
        FilterKind::Mean => filter::mean(&image, args.kernel_size),
        FilterKind::Gaussian => filter::gaussian(&image, args.kernel_size, args.sigma),
        FilterKind::Unsharp => filter::unsharp_mask(&image, args.kernel_size, args.amount),
    }
    .with_context(|| format!("Failed to apply {:?} filter", args.kind))?;

    secret.save_back(&filtered)?;
    save_secret(&secret, &dest)?;

    println!(
        "The filtered image has been successfully saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}
