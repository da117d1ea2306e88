//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责打开文件、选择默认输出路径、调用容器编解码器以及向用户报告结果。

use crate::bitmap::BitmapHeader;
use crate::cli::{HideArgs, RecoverArgs};
use crate::constants::{DEFAULT_DECODED_STEM, DEFAULT_STEGO_NAME};
use crate::decoder::ContainerDecoder;
use crate::encoder::ContainerEncoder;
use crate::error::StegoError;
use crate::format::ContainerFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 秘密文件的扩展名 (带前导 `.`)，没有扩展名时返回 `None`。
pub fn secret_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

/// 隐写图像的输出路径。
///
/// 指定了路径时强制使用 `.bmp` 扩展名，否则在载体所在目录下使用 `steged_img.bmp`。
pub fn stego_destination(image: &Path, dest: Option<&Path>) -> PathBuf {
    match dest {
        Some(dest) => dest.with_extension("bmp"),
        None => sibling(image, DEFAULT_STEGO_NAME),
    }
}

/// 恢复文件的输出路径。
///
/// 指定了路径时把扩展名替换为恢复出的扩展名，否则在图像所在目录下使用 `decoded<ext>`。
pub fn recovered_destination(image: &Path, output: Option<&Path>, extension: &str) -> PathBuf {
    match output {
        Some(output) => output.with_extension(extension.trim_start_matches('.')),
        None => sibling(image, &format!("{DEFAULT_DECODED_STEM}{extension}")),
    }
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).join(name)
}

/// 目标文件已存在且未指定 `--force` 时拒绝覆盖。
fn ensure_writable(target: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !target.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        target.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取载体头部并检查格式与容量，随后把秘密文件逐块嵌入载体，
/// 写入目标图像。任何一步失败都会删除未完成的输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取载体图像或秘密文件。
/// * 载体不是未压缩的 24 位 BMP。
/// * 秘密文件为空、扩展名不受支持，或图像容量不足。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let format = ContainerFormat::default();

    let extension = secret_extension(&args.secret).unwrap_or_default();
    format.ensure_allowed(&extension).with_context(|| {
        format!(
            "Unsupported secret file: {}. \nSupported extensions: {}",
            args.secret.to_string_lossy().red().bold(),
            format.allowed_extensions().join(", ").green()
        )
    })?;

    let dest = stego_destination(&args.image, args.dest.as_deref());
    ensure_writable(&dest, args.force)?;
    if dest.exists() && fs::canonicalize(&dest)? == fs::canonicalize(&args.image)? {
        anyhow::bail!(
            "The output path {} is the cover image itself.",
            dest.to_string_lossy().red().bold()
        );
    }

    let image_file = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let mut carrier = BufReader::new(image_file);
    let header = BitmapHeader::read_from(&mut carrier)
        .and_then(|header| header.validate().map(|()| header))
        .with_context(|| {
            format!(
                "Unsupported cover image: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;
    debug!(
        "cover image {}x{}, {} carrier bytes",
        header.width(),
        header.height(),
        header.capacity()
    );

    let secret_file = File::open(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;
    let secret_len = secret_file.metadata()?.len();
    if secret_len == 0 {
        return Err(StegoError::EmptySecretFile).with_context(|| {
            format!(
                "Nothing to hide in {}",
                args.secret.to_string_lossy().red().bold()
            )
        });
    }
    // 编码器也会检查容量，这里提前检查是为了在创建输出文件之前失败
    format.ensure_capacity(header.capacity(), secret_len)?;

    let output = File::create(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    let mut sink = BufWriter::new(output);
    let mut secret = BufReader::new(secret_file);

    let encoded = ContainerEncoder::new(&format).encode(
        &header,
        &extension,
        &mut secret,
        secret_len,
        &mut carrier,
        &mut sink,
    );
    drop(sink);

    if let Err(err) = encoded {
        if let Err(remove_err) = fs::remove_file(&dest) {
            warn!("failed to remove partial output {}: {remove_err}", dest.display());
        }
        return Err(err).with_context(|| {
            format!(
                "Failed to hide {} in {}. \nThe image may be corrupted or smaller than its header claims.",
                args.secret.to_string_lossy().red().bold(),
                args.image.to_string_lossy().red().bold()
            )
        });
    }

    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 校验隐写图像的头部，解码其中的容器，
/// 并把恢复的文件按隐藏时的扩展名写入目标路径。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件，或它不是 24 位 BMP。
/// * 图像中没有隐藏的文件，或容器已损坏。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let format = ContainerFormat::default();

    let image_file = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let mut carrier = BufReader::new(image_file);
    BitmapHeader::read_from(&mut carrier)
        .and_then(|header| header.validate())
        .with_context(|| {
            format!(
                "Unsupported image: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    let recovered = ContainerDecoder::new(&format)
        .decode(&mut carrier)
        .with_context(|| {
            format!(
                "Failed to recover a hidden file from '{}'. \nThe image may not contain a hidden file or is corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    let target = recovered_destination(&args.image, args.output.as_deref(), &recovered.extension);
    ensure_writable(&target, args.force)?;

    fs::write(&target, &recovered.payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            target.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully recovered and saved: {}",
        target.to_string_lossy().green().bold()
    );
    Ok(())
}
