//! # 原子固定约束
//!
//! 把部分表面原子标记为不可移动，减少优化自由度。
//! 序号在此不做越界校验，越界由引擎准备输入时报告。
//!
//! ## 依赖关系
//! - 被 `geometry/builder.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::Result;
use crate::models::AtomicStructure;

/// 固定原子约束
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAtoms {
    indices: Vec<usize>,
}

impl FixAtoms {
    /// 按序号固定
    pub fn indices(indices: impl IntoIterator<Item = usize>) -> Self {
        FixAtoms {
            indices: indices.into_iter().collect(),
        }
    }

    /// 固定除给定标签外的全部原子
    pub fn all_except(structure: &AtomicStructure, keep: &[&str]) -> Result<Self> {
        let keep = keep
            .iter()
            .map(|label| structure.site(label))
            .collect::<Result<Vec<_>>>()?;

        Ok(FixAtoms {
            indices: (0..structure.len()).filter(|i| !keep.contains(i)).collect(),
        })
    }

    /// 应用到结构上（与已有约束取并集）
    pub fn apply(&self, structure: &mut AtomicStructure) {
        structure.fixed.extend(self.indices.iter().copied());
    }
}
