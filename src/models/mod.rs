//! # 数据模型模块
//!
//! 定义原子结构、计算器参数和优化结果数据模型。
//!
//! ## 依赖关系
//! - 被 `geometry/`, `parsers/`, `engine/`, `workflow/` 和 `commands/` 使用
//! - 子模块: structure, calculator, calculation

pub mod calculation;
pub mod calculator;
pub mod structure;

pub use calculation::{OptimizationResult, ResultRecord};
pub use calculator::{CalculatorConfig, KPointMesh};
pub use structure::{Atom, AtomicStructure, Cell};
