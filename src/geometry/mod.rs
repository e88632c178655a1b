//! # 结构构建模块
//!
//! 构建 fcc(111) 表面、放置 OER 中间体、生成孤立分子并施加固定约束。
//!
//! ## 依赖关系
//! - 被 `workflow/plan.rs` 使用
//! - 使用 `models/`
//! - 子模块: slab, templates, constraint, builder

pub mod builder;
pub mod constraint;
pub mod slab;
pub mod templates;

pub use builder::SlabBuilder;
pub use slab::BINDING_SITE;
pub use templates::{Adsorbate, Molecule, ANCHOR, DISTAL, HYDROGEN};
