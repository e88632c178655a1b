//! # 结构优化驱动
//!
//! 对已准备好输入的运行目录调用外部引擎，计时并读回结果。
//! 不做重试、不做断点续算：引擎失败或未收敛直接返回错误，由调用方终止流程。
//!
//! ## 依赖关系
//! - 被 `workflow/runner.rs` 使用
//! - 使用 `engine/`, `utils/progress.rs`

use crate::engine::{Engine, RelaxJob};
use crate::error::{OerflowError, Result};
use crate::models::OptimizationResult;
use crate::utils::progress;

use std::path::Path;
use std::time::Instant;

/// 执行一次结构优化
pub fn optimize(
    engine: &dyn Engine,
    job: &RelaxJob,
    script: &Path,
    run_dir: &Path,
) -> Result<OptimizationResult> {
    let spinner = progress::create_spinner(&format!(
        "Relaxing {} with {} ({}, fmax = {} eV/Å)",
        job.structure.name,
        engine.name(),
        job.optimizer,
        job.fmax
    ));

    let start = Instant::now();
    let outcome = engine
        .execute(script, run_dir)
        .and_then(|_| engine.read_output(&job.structure, run_dir));
    let elapsed = start.elapsed().as_secs_f64();

    spinner.finish_and_clear();
    let output = outcome?;

    if !output.converged {
        return Err(OerflowError::NotConverged {
            block: job.block.clone(),
            fmax: job.fmax,
        });
    }

    Ok(OptimizationResult {
        block: job.block.clone(),
        final_structure: output.structure,
        potential_energy: output.energy_ev,
        trajectory: run_dir.join(&job.trajectory),
        wall_clock_seconds: elapsed,
        converged: output.converged,
        steps: output.steps,
    })
}
