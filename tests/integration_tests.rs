use clear_vision::{
    RasterImage, SecretImage,
    cli::{FilterArgs, FilterKind, HideArgs, ReconstructArgs, RecoverArgs, SplitArgs},
    handler::{handle_filter, handle_hide, handle_reconstruct, handle_recover, handle_split},
};
use image::{ImageBuffer, Rgba};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let secret_path = dir.path().join("hidden.secret");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler!";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    handle_hide(HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: Some(secret_path.clone()),
        force: false,
    })?;
    assert!(secret_path.exists(), "Secret image should be created.");

    // 3. 测试 handle_recover
    handle_recover(RecoverArgs {
        secret: Some(secret_path.clone()),
        image: None,
        length: original_text.len(),
        text: Some(recovered_text_path.clone()),
        force: false,
    })?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 40, 40);
    let original_text = "Testing default path generation.";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide，不提供 dest 路径
    handle_hide(HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: None,
        force: false,
    })?;

    let expected_secret_path = dir.path().join("doctored_original.secret");
    assert!(
        expected_secret_path.exists(),
        "Default secret image should be created at: {:?}",
        expected_secret_path
    );

    // 3. 测试 handle_recover，不提供 text 输出路径
    handle_recover(RecoverArgs {
        secret: Some(expected_secret_path),
        image: None,
        length: original_text.len(),
        text: None,
        force: false,
    })?;

    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(original_text, recovered_text);

    Ok(())
}

/// 验证可以从重建后的 PNG 图像中直接恢复文本
#[test]
fn test_recover_from_reconstructed_image() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.png");
    let text_path = dir.path().join("text.txt");
    let secret_path = dir.path().join("cover.secret");
    let png_path = dir.path().join("cover_out.png");
    let recovered_path = dir.path().join("out.txt");

    create_test_image(&image_path, 16, 16);
    fs::write(&text_path, "Hi!")?;

    handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(secret_path.clone()),
        force: false,
    })?;
    handle_reconstruct(ReconstructArgs {
        secret: secret_path,
        dest: Some(png_path.clone()),
        force: false,
    })?;
    handle_recover(RecoverArgs {
        secret: None,
        image: Some(png_path),
        length: 3,
        text: Some(recovered_path.clone()),
        force: false,
    })?;

    assert_eq!(fs::read_to_string(&recovered_path)?, "Hi!");
    Ok(())
}

/// 验证拆分再重建得到与灰度原图一致的图像
#[test]
fn test_split_and_reconstruct() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("square.png");
    create_test_image(&image_path, 12, 12);

    handle_split(SplitArgs {
        image: image_path.clone(),
        dest: None,
        force: false,
    })?;
    let secret_path = dir.path().join("square.secret");
    assert!(secret_path.exists());

    handle_reconstruct(ReconstructArgs {
        secret: secret_path,
        dest: None,
        force: false,
    })?;
    let reconstructed_path = dir.path().join("reconstructed_square.png");

    assert_eq!(
        RasterImage::open(&reconstructed_path)?,
        RasterImage::open(&image_path)?
    );
    Ok(())
}

/// 验证非正方形图像拆分失败
#[test]
fn test_split_non_square_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("wide.png");
    create_test_image(&image_path, 4, 3);

    let result = handle_split(SplitArgs {
        image: image_path,
        dest: None,
        force: false,
    });
    let err = result.expect_err("non-square image must be rejected");
    assert!(format!("{err:#}").contains("not square"));
    assert!(!dir.path().join("wide.secret").exists());
    Ok(())
}

/// 验证滤波命令会回写出同尺寸的新秘密图像
#[test]
fn test_handle_filter() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("noisy.png");
    create_test_image(&image_path, 10, 10);

    handle_split(SplitArgs {
        image: image_path.clone(),
        dest: None,
        force: false,
    })?;
    let secret_path = dir.path().join("noisy.secret");

    for kind in [FilterKind::Mean, FilterKind::Gaussian, FilterKind::Unsharp] {
        handle_filter(FilterArgs {
            secret: secret_path.clone(),
            kind,
            kernel_size: 3,
            sigma: 1.0,
            amount: 1.5,
            dest: None,
            force: true,
        })?;

        let filtered = SecretImage::load_from_file(dir.path().join("filtered_noisy.secret"))?;
        assert_eq!(filtered.width(), 10);
        assert_eq!(filtered.upper().len(), 55);
        assert_eq!(filtered.lower().len(), 45);
    }

    let result = handle_filter(FilterArgs {
        secret: secret_path,
        kind: FilterKind::Mean,
        kernel_size: 4,
        sigma: 1.0,
        amount: 1.5,
        dest: Some(dir.path().join("bad.secret")),
        force: false,
    });
    assert!(result.is_err(), "even kernel sizes must be rejected");
    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.secret");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        dest: Some(dest_path.clone()),
        force: false,
    });
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let result = handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(dest_path.clone()),
        force: true,
    });
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let content = fs::read_to_string(&dest_path)?;
    assert!(content.starts_with("50 50\n"));

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.secret");

    // 10×10 图像只能容纳 14 个字符
    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(15))?;

    // 2. 执行并断言错误
    let result = handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证请求的长度超出容量时恢复失败
#[test]
fn test_handle_recover_length_too_large() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.png");
    create_test_image(&image_path, 5, 5);

    let result = handle_recover(RecoverArgs {
        secret: None,
        image: Some(image_path),
        length: 4,
        text: None,
        force: false,
    });
    let err = result.expect_err("28 bits do not fit into 25 pixels");
    assert!(format!("{err:#}").contains("Not enough pixels"));
    Ok(())
}
