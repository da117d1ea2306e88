//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 24 位 BMP 图像中隐藏或恢复 .txt、.c、.sh 文件。"
)]
pub struct Cli {
    /// 输出每个编解码阶段的调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把秘密文件隐藏到 BMP 图像中。
    Hide(HideArgs),

    /// 从经过隐写的 BMP 图像中恢复秘密文件。
    Recover(RecoverArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用作载体的 24 位 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的秘密文件路径 (.txt, .c 或 .sh)。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 隐写图像的输出路径，扩展名会被改为 .bmp。默认为载体所在目录下的 steged_img.bmp。
    #[arg(short = 'o', long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文件的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的输出路径，扩展名会被替换为隐藏时的扩展名。默认为图像所在目录下的 decoded.<ext>。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}
