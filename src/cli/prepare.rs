//! # prepare 子命令 CLI 定义
//!
//! 为每个计算块生成作业目录和 sbatch 脚本，可选提交到 Slurm
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prepare.rs`

use super::experiment::{EngineArgs, SlabArgs, SolverArgs};
use clap::Args;
use std::path::PathBuf;

/// prepare 子命令参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub slab: SlabArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Root directory for job folders
    #[arg(short, long, default_value = "oer_jobs")]
    pub workdir: PathBuf,

    /// Number of MPI processes (0 runs the driver without mpirun)
    #[arg(long, default_value_t = 0)]
    pub np: u32,

    /// Module list to load (comma-separated)
    #[arg(long, default_value = "")]
    pub modules: String,

    // ─────────────────────────────────────────────────────────────
    // Slurm options
    // ─────────────────────────────────────────────────────────────
    /// Slurm partition
    #[arg(long, default_value = "compute")]
    pub partition: String,

    /// Slurm constraint
    #[arg(long)]
    pub constraint: Option<String>,

    /// Number of nodes
    #[arg(long, default_value_t = 1)]
    pub nodes: u32,

    /// Number of tasks
    #[arg(long, default_value_t = 1)]
    pub ntasks: u32,

    /// CPUs per task
    #[arg(long, default_value_t = 1)]
    pub cpus_per_task: u32,

    /// Memory per CPU
    #[arg(long, default_value = "2G")]
    pub mem_per_cpu: String,

    /// Time limit (e.g., '24:00:00')
    #[arg(long, default_value = "24:00:00")]
    pub time: String,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Submit jobs to Slurm after generation
    #[arg(long, default_value_t = false)]
    pub submit: bool,
}
