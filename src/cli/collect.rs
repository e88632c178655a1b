//! # collect 子命令 CLI 定义
//!
//! 收集已完成的计算块结果并汇总
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use super::experiment::SlabArgs;
use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Directory containing the block sub-directories
    #[arg(default_value = "oer_jobs")]
    pub workdir: PathBuf,

    /// Slab options used when the jobs were prepared
    #[command(flatten)]
    pub slab: SlabArgs,

    /// Only collect block directories matching this pattern
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Output CSV file
    #[arg(short, long, default_value = "oer_results.csv")]
    pub output: PathBuf,

    /// Also collect blocks whose optimization did not converge
    #[arg(long, default_value_t = false)]
    pub allow_unconverged: bool,
}
