//! # 实验顺序执行器
//!
//! 按固定顺序依次运行计划中的各计算块：
//! 构建结构 → 写引擎输入 → (可选) 查看 → 弛豫 → 报告。
//!
//! 严格串行，任一块失败立即返回错误，不保留部分结果。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `workflow/plan.rs`, `workflow/driver.rs`, `workflow/report.rs`
//! - 使用 `utils/output.rs`, `utils/viewer.rs`

use super::driver;
use super::plan::ExperimentPlan;
use super::report;
use crate::engine::Engine;
use crate::error::{OerflowError, Result};
use crate::models::OptimizationResult;
use crate::utils::output;
use crate::utils::viewer::Viewer;

use std::fs;
use std::path::{Path, PathBuf};

/// 顺序执行器
pub struct Sequencer<'a> {
    engine: &'a dyn Engine,
    workdir: PathBuf,
    viewer: Option<Viewer>,
    dry_run: bool,
}

impl<'a> Sequencer<'a> {
    pub fn new(engine: &'a dyn Engine, workdir: &Path) -> Self {
        Self {
            engine,
            workdir: workdir.to_path_buf(),
            viewer: None,
            dry_run: false,
        }
    }

    pub fn with_viewer(mut self, viewer: Option<Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// 只写输入，不执行引擎
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 运行整个计划，返回各块结果（dry run 时为空）
    pub fn run(&self, plan: &ExperimentPlan) -> Result<Vec<OptimizationResult>> {
        let mut results = Vec::with_capacity(plan.blocks().len());

        for &block in plan.blocks() {
            output::print_header(&block.title(plan.element()));

            let job = plan.job(block)?;
            let run_dir = self.workdir.join(block.slug());
            fs::create_dir_all(&run_dir).map_err(|e| OerflowError::FileWriteError {
                path: run_dir.display().to_string(),
                source: e,
            })?;

            let script = self.engine.prepare(&job, &run_dir)?;
            output::print_info(&format!(
                "{} atoms, {} free, inputs in {}",
                job.structure.len(),
                job.structure.free_indices().len(),
                run_dir.display()
            ));

            if let Some(viewer) = &self.viewer {
                viewer.show(&self.engine.input_path(&run_dir));
            }

            if self.dry_run {
                output::print_skip(&format!("[DRY] {} not executed", block));
                continue;
            }

            let result = driver::optimize(self.engine, &job, &script, &run_dir)?;
            report::print_result(block, plan.element(), &result)?;

            if let Some(viewer) = &self.viewer {
                viewer.show(&self.engine.output_path(&run_dir));
            }

            results.push(result);
        }

        Ok(results)
    }
}
