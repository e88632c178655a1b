//! # build 子命令 CLI 定义
//!
//! 只构建结构并写出 POSCAR，不调用引擎
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/build.rs`

use super::experiment::SlabArgs;
use clap::Args;
use std::path::PathBuf;

/// build 子命令参数
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub slab: SlabArgs,

    /// Output directory for the POSCAR files
    #[arg(short, long, default_value = "structures")]
    pub output_dir: PathBuf,

    /// Viewer command to open each structure (e.g. "ase gui")
    #[arg(long)]
    pub viewer: Option<String>,

    /// Overwrite existing files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
