//! # 计算流程模块
//!
//! 把几何构建、引擎调用和结果报告串成完整的 OER 计算流程。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `geometry/`, `engine/`, `models/`, `utils/`
//! - 子模块: plan, driver, report, runner, collector

pub mod collector;
pub mod driver;
pub mod plan;
pub mod report;
pub mod runner;

pub use collector::RunCollector;
pub use plan::{Block, ExperimentPlan};
pub use runner::Sequencer;
