//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `build`: 构建六个结构并写出 POSCAR
//! - `run`: 在本机顺序运行全部计算块
//! - `prepare`: 生成作业目录与 sbatch 脚本
//! - `collect`: 收集已完成的计算结果
//! - `free-energy`: 计算 OER 自由能台阶
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: experiment, build, run, prepare, collect, free_energy

pub mod build;
pub mod collect;
pub mod experiment;
pub mod free_energy;
pub mod prepare;
pub mod run;

use clap::{Parser, Subcommand};

/// oerflow - fcc(111) 表面 OER 自由能计算流程
#[derive(Parser)]
#[command(name = "oerflow")]
#[command(version)]
#[command(about = "OER free-energy workflow on fcc(111) slabs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Build the slab, adsorbate and molecule structures as POSCAR files
    Build(build::BuildArgs),

    /// Relax all blocks in sequence with the GPAW engine
    Run(run::RunArgs),

    /// Generate per-block job directories and Slurm scripts
    Prepare(prepare::PrepareArgs),

    /// Collect finished block results into a CSV table
    Collect(collect::CollectArgs),

    /// Derive OER free-energy steps from a results CSV
    FreeEnergy(free_energy::FreeEnergyArgs),
}
