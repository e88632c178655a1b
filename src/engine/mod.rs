//! # 外部 DFT 引擎接口
//!
//! 电子结构计算和结构弛豫完全交给外部引擎完成，本模块只负责
//! 写输入、调起引擎、读回结果这三步。
//!
//! ## 依赖关系
//! - 被 `workflow/` 和 `commands/` 使用
//! - 使用 `models/`, `parsers/`
//! - 子模块: gpaw

pub mod gpaw;

pub use gpaw::GpawEngine;

use crate::error::Result;
use crate::models::{AtomicStructure, CalculatorConfig};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// 引擎侧的结构优化算法
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Optimizer {
    /// Quasi-Newton with line search (ASE default)
    QuasiNewton,
    /// BFGS
    Bfgs,
    /// Limited-memory BFGS
    Lbfgs,
    /// Fast inertial relaxation engine
    Fire,
}

impl Optimizer {
    /// `ase.optimize` 中的类名
    pub fn class_name(&self) -> &'static str {
        match self {
            Optimizer::QuasiNewton => "QuasiNewton",
            Optimizer::Bfgs => "BFGS",
            Optimizer::Lbfgs => "LBFGS",
            Optimizer::Fire => "FIRE",
        }
    }
}

impl std::fmt::Display for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

/// 一次结构弛豫任务
#[derive(Debug, Clone)]
pub struct RelaxJob {
    /// 计算块标识，同时作为运行目录名
    pub block: String,
    /// 带约束的输入结构
    pub structure: AtomicStructure,
    /// 计算器参数（每个任务一份）
    pub calculator: CalculatorConfig,
    pub optimizer: Optimizer,
    /// 力收敛阈值 (eV/Å)
    pub fmax: f64,
    /// 最大优化步数；None 表示由引擎决定
    pub max_steps: Option<usize>,
    /// 轨迹文件名
    pub trajectory: String,
}

/// 引擎读回的结果
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// 弛豫后的结构（已合并回输入结构的标签与约束）
    pub structure: AtomicStructure,
    pub energy_ev: f64,
    pub converged: bool,
    pub steps: Option<usize>,
    /// 引擎自己记录的耗时 (s)
    pub wall_time_s: Option<f64>,
}

/// 外部引擎需要实现的接口
pub trait Engine {
    /// 引擎名称
    fn name(&self) -> &str;

    /// 在运行目录中写入输入文件，返回待执行的脚本路径
    fn prepare(&self, job: &RelaxJob, run_dir: &Path) -> Result<PathBuf>;

    /// 执行引擎，阻塞直到结束
    fn execute(&self, script: &Path, run_dir: &Path) -> Result<()>;

    /// 读取运行目录中的结果，弛豫后的坐标合并回 `input` 的标签与约束
    fn read_output(&self, input: &AtomicStructure, run_dir: &Path) -> Result<EngineOutput>;

    /// 输入结构文件（供查看器打开）
    fn input_path(&self, run_dir: &Path) -> PathBuf;

    /// 弛豫后结构文件
    fn output_path(&self, run_dir: &Path) -> PathBuf;
}
