//! # 结构优化结果数据模型
//!
//! 存储单个计算块的弛豫结果，以及写入 CSV 的扁平记录。
//!
//! ## 依赖关系
//! - 被 `engine/`, `workflow/` 使用
//! - 被 `commands/collect.rs`, `commands/free_energy.rs` 使用

use super::structure::AtomicStructure;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 单次结构优化的结果
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// 计算块标识 (slab, oh, ...)
    pub block: String,

    /// 弛豫后的结构（保留输入结构的标签与约束）
    pub final_structure: AtomicStructure,

    /// 势能 (eV)
    pub potential_energy: f64,

    /// 轨迹文件路径
    pub trajectory: PathBuf,

    /// 墙钟时间 (s)
    pub wall_clock_seconds: f64,

    /// 引擎报告的收敛状态
    pub converged: bool,

    /// 优化步数
    pub steps: Option<usize>,
}

impl OptimizationResult {
    pub fn wall_clock_minutes(&self) -> f64 {
        self.wall_clock_seconds / 60.0
    }

    /// 转换为 CSV 记录
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            block: self.block.clone(),
            formula: self.final_structure.formula(),
            energy_ev: self.potential_energy,
            wall_clock_s: self.wall_clock_seconds,
            converged: self.converged,
            trajectory: self.trajectory.display().to_string(),
        }
    }
}

/// 结果 CSV 的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub block: String,
    pub formula: String,
    pub energy_ev: f64,
    pub wall_clock_s: f64,
    pub converged: bool,
    pub trajectory: String,
}
