//! # 共享实验参数
//!
//! `build`, `run`, `prepare` 三个子命令共用的表面、求解器和引擎参数，
//! 通过 `#[command(flatten)]` 嵌入。
//!
//! ## 依赖关系
//! - 被 `cli/build.rs`, `cli/run.rs`, `cli/prepare.rs` 使用
//! - 转换结果交给 `commands/mod.rs` 组装 ExperimentPlan

use crate::engine::Optimizer;
use crate::workflow::Block;
use clap::Args;

/// 表面模型参数
#[derive(Args, Debug, Clone)]
pub struct SlabArgs {
    /// Metal element of the fcc(111) slab
    #[arg(long, default_value = "Ni")]
    pub element: String,

    /// Lattice constant in Å
    #[arg(long, default_value_t = 3.52)]
    pub lattice: f64,

    /// Slab size as nx,ny,layers
    #[arg(long, value_delimiter = ',', default_value = "2,2,2")]
    pub size: Vec<usize>,

    /// Vacuum padding on each side in Å
    #[arg(long, default_value_t = 2.0)]
    pub vacuum: f64,

    /// Adsorbate height above the binding site in Å
    #[arg(long, default_value_t = 1.5)]
    pub height: f64,

    /// Calculation blocks to include (comma-separated, default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub blocks: Vec<Block>,
}

/// 计算器与优化器参数
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Exchange-correlation functional
    #[arg(long, default_value = "RPBE")]
    pub xc: String,

    /// Plane-wave cutoff in eV
    #[arg(long, default_value_t = 350.0)]
    pub ecut: f64,

    /// k-point mesh for slab calculations (kx,ky,kz)
    #[arg(long, value_delimiter = ',', default_value = "4,4,1")]
    pub kpts: Vec<u32>,

    /// Use a Monkhorst-Pack mesh instead of a Γ-centred one
    #[arg(long, default_value_t = false)]
    pub monkhorst_pack: bool,

    /// Real-space grid spacing in Å
    #[arg(long, default_value_t = 0.2)]
    pub grid_spacing: f64,

    /// Fermi-Dirac smearing width in eV
    #[arg(long, default_value_t = 0.1)]
    pub smearing: f64,

    /// Geometry optimizer
    #[arg(long, value_enum, default_value = "quasi-newton")]
    pub optimizer: Optimizer,

    /// Force convergence threshold in eV/Å
    #[arg(long, default_value_t = 0.05)]
    pub fmax: f64,

    /// Maximum number of optimizer steps
    #[arg(long)]
    pub max_steps: Option<usize>,
}

/// 外部引擎参数
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Python interpreter used to run the GPAW driver script
    #[arg(long, env = "OERFLOW_PYTHON", default_value = "python3")]
    pub python: String,
}
