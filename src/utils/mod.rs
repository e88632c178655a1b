//! # 工具函数模块
//!
//! 提供美化输出、进度提示、Slurm 脚本生成和结构查看器调用。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `workflow/` 模块使用
//! - 子模块: output, progress, slurm, viewer

pub mod output;
pub mod progress;
pub mod slurm;
pub mod viewer;
