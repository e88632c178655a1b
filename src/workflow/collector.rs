//! # 运行目录收集器
//!
//! 在工作目录下查找已完成的计算块目录（`slab/`, `oh/` 等），
//! 供 `collect` 子命令在离线或集群运行后读回结果。
//!
//! 只看第一层子目录；目录名必须是已知的块名，且包含结果文件。
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 过滤目录名

use super::plan::Block;
use crate::error::{OerflowError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 一个已完成的运行目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    pub block: Block,
    pub run_dir: PathBuf,
}

/// 运行目录收集器
pub struct RunCollector {
    workdir: PathBuf,
    /// 目录名匹配模式
    pattern: glob::Pattern,
    /// 判定完成所需的文件名
    marker: String,
}

impl RunCollector {
    pub fn new(workdir: &Path, marker: &str) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            pattern: glob::Pattern::new("*").unwrap(),
            marker: marker.to_string(),
        }
    }

    /// 设置目录名匹配模式
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = glob::Pattern::new(pattern).map_err(|e| {
            OerflowError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(self)
    }

    /// 收集已完成的运行，按块的固定顺序返回
    pub fn collect(&self) -> Result<Vec<CompletedRun>> {
        if !self.workdir.is_dir() {
            return Err(OerflowError::DirectoryNotFound {
                path: self.workdir.display().to_string(),
            });
        }

        let mut runs: Vec<CompletedRun> = WalkDir::new(&self.workdir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                if !self.pattern.matches(name) {
                    return None;
                }
                let block = Block::from_slug(name)?;
                let run_dir = entry.path().to_path_buf();
                run_dir.join(&self.marker).is_file().then_some(CompletedRun { block, run_dir })
            })
            .collect();

        runs.sort_by_key(|r| r.block);
        Ok(runs)
    }

    /// 有目录但缺结果文件的块
    pub fn pending(&self) -> Vec<Block> {
        Block::ALL
            .into_iter()
            .filter(|b| {
                let dir = self.workdir.join(b.slug());
                dir.is_dir() && !dir.join(&self.marker).is_file()
            })
            .collect()
    }
}
