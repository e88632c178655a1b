//! # run 子命令 CLI 定义
//!
//! 在本机按顺序运行全部计算块
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use super::experiment::{EngineArgs, SlabArgs, SolverArgs};
use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub slab: SlabArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Working directory; each block runs in its own sub-directory
    #[arg(short, long, default_value = "oer_runs")]
    pub workdir: PathBuf,

    /// Viewer command to open structures before and after relaxation
    #[arg(long)]
    pub viewer: Option<String>,

    /// Write engine inputs only, do not execute
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Write the energy table to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}
