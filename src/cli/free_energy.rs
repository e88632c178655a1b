//! # free-energy 子命令 CLI 定义
//!
//! 由结果 CSV 计算 OER 自由能台阶
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/free_energy.rs`

use clap::Args;
use std::path::PathBuf;

/// free-energy 子命令参数
#[derive(Args, Debug)]
pub struct FreeEnergyArgs {
    /// Results CSV written by `run` or `collect`
    #[arg(default_value = "oer_results.csv")]
    pub results: PathBuf,

    /// Applied potentials in V vs RHE (comma-separated)
    #[arg(short = 'U', long, value_delimiter = ',', default_value = "0", allow_hyphen_values = true)]
    pub potential: Vec<f64>,

    /// ZPE - TS correction for OH* in eV
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub corr_oh: f64,

    /// ZPE - TS correction for O* in eV
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub corr_o: f64,

    /// ZPE - TS correction for OOH* in eV
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub corr_ooh: f64,

    /// ZPE - TS correction for H2O in eV
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub corr_h2o: f64,

    /// ZPE - TS correction for H2 in eV
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub corr_h2: f64,

    /// Write the step table to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Plot the step diagram (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}
