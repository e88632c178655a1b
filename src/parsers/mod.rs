//! # 解析器模块
//!
//! 提供引擎输入输出所需的结构文件读写，以及驱动脚本结果文件的解析。
//!
//! ## 依赖关系
//! - 被 `engine/` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, relax_out

pub mod poscar;
pub mod relax_out;

pub use poscar::{parse_poscar_file, to_poscar_string};
pub use relax_out::parse_result_file;
