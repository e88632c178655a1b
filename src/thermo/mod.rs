//! # 热力学后处理模块
//!
//! 由各计算块的总能推导 OER 四步反应自由能（计算氢电极模型），
//! 并绘制自由能台阶图。与结果报告分开：报告只打印原始数据。
//!
//! ## 依赖关系
//! - 被 `commands/free_energy.rs` 使用
//! - 使用 `models/`, `plotters`
//! - 子模块: che, plot

pub mod che;
pub mod plot;

pub use che::{Corrections, FreeEnergyProfile, SpeciesEnergies};
