//! # prepare 命令实现
//!
//! 为每个计算块生成作业目录，写入引擎输入和 sbatch 脚本，可选提交到 Slurm。
//! 集群上跑完后用 `collect` 读回结果。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs` 定义的参数
//! - 使用 `engine/gpaw.rs`, `workflow/plan.rs`
//! - 使用 `utils/slurm.rs`, `utils/output.rs`

use crate::cli::prepare::PrepareArgs;
use crate::engine::{Engine, GpawEngine};
use crate::error::{OerflowError, Result};
use crate::utils::output;
use crate::utils::slurm::{generate_sbatch_script, SlurmConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const SBATCH_FILE: &str = "submit.sbatch";

/// 执行 prepare 命令
pub fn execute(args: PrepareArgs) -> Result<()> {
    output::print_header("Preparing OER Jobs");

    let plan = super::build_plan(&args.slab, &args.solver)?;
    let engine = GpawEngine::new(args.engine.python.as_str());

    fs::create_dir_all(&args.workdir).map_err(|e| OerflowError::FileWriteError {
        path: args.workdir.display().to_string(),
        source: e,
    })?;

    let modules: Vec<String> = args
        .modules
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let exec_cmd = if args.np > 0 {
        format!("mpirun -np {} {}", args.np, engine.command_line())
    } else {
        engine.command_line()
    };

    let mut generated = Vec::new();
    let mut submitted = Vec::new();

    for &block in plan.blocks() {
        let job = plan.job(block)?;
        let job_dir = args.workdir.join(block.slug());

        engine.prepare(&job, &job_dir)?;
        let job_dir = absolute_dir(&job_dir)?;

        // 创建 slurm_logs 目录
        fs::create_dir_all(job_dir.join("slurm_logs")).ok();

        let config = SlurmConfig {
            job_name: format!("oer_{}", block.slug()),
            partition: args.partition.clone(),
            constraint: args.constraint.clone(),
            nodes: args.nodes,
            ntasks: args.ntasks,
            cpus_per_task: args.cpus_per_task,
            mem_per_cpu: args.mem_per_cpu.clone(),
            time_limit: args.time.clone(),
            modules: modules.clone(),
        };

        let sbatch_path = write_sbatch(&config, &job_dir, &exec_cmd)?;

        generated.push(block);

        if !args.submit {
            output::print_info(&format!("[DRY] Generated job: {}", job_dir.display()));
        } else if submit(&sbatch_path, &job_dir, block.slug()) {
            submitted.push(block);
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "Generated {} jobs, submitted {} jobs",
        generated.len(),
        submitted.len()
    ));

    Ok(())
}

/// 作业目录的绝对路径；sbatch 在作业目录内执行，脚本里的 `cd` 必须是绝对路径
fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    fs::canonicalize(dir).map_err(|e| OerflowError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}

/// 写出 sbatch 脚本，返回脚本路径
fn write_sbatch(config: &SlurmConfig, job_dir: &Path, exec_cmd: &str) -> Result<PathBuf> {
    let job_dir = absolute_dir(job_dir)?;
    let sbatch_path = job_dir.join(SBATCH_FILE);
    fs::write(&sbatch_path, generate_sbatch_script(config, &job_dir, exec_cmd)).map_err(|e| {
        OerflowError::FileWriteError {
            path: sbatch_path.display().to_string(),
            source: e,
        }
    })?;
    Ok(sbatch_path)
}

/// 调用 sbatch 提交；失败只打印错误，继续下一个作业
fn submit(sbatch_path: &Path, job_dir: &Path, name: &str) -> bool {
    match Command::new("sbatch")
        .arg(sbatch_path)
        .current_dir(job_dir)
        .output()
    {
        Ok(out) if out.status.success() => {
            output::print_success(&format!(
                "Submitted: {} - {}",
                name,
                String::from_utf8_lossy(&out.stdout).trim()
            ));
            true
        }
        Ok(out) => {
            output::print_error(&format!(
                "sbatch failed for {}: {}",
                name,
                String::from_utf8_lossy(&out.stderr)
            ));
            false
        }
        Err(e) => {
            output::print_error(&format!("Failed to run sbatch for {}: {}", name, e));
            false
        }
    }
}
