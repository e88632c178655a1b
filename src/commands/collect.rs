//! # collect 命令实现
//!
//! 读回 `prepare` 生成、已在集群上跑完的计算块结果，
//! 打印能量与键长并写出结果 CSV。
//!
//! 标签不随 CONTCAR 保存：按同样的表面参数重建输入结构，再把弛豫坐标合并回去，
//! 所以这里的表面参数必须与 `prepare` 时一致。
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `workflow/collector.rs`, `workflow/report.rs`, `engine/gpaw.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::collect::CollectArgs;
use crate::engine::gpaw::RESULT_FILE;
use crate::engine::{Engine, GpawEngine};
use crate::error::{OerflowError, Result};
use crate::models::{CalculatorConfig, OptimizationResult};
use crate::utils::{output, progress};
use crate::workflow::{report, Block, ExperimentPlan, RunCollector};

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting OER Results");

    let builder = super::slab_builder(&args.slab)?;
    let plan =
        ExperimentPlan::new(builder, CalculatorConfig::default()).with_blocks(&args.slab.blocks);
    let engine = GpawEngine::default();

    let collector = RunCollector::new(&args.workdir, RESULT_FILE).with_pattern(&args.pattern)?;
    let runs: Vec<_> = collector
        .collect()?
        .into_iter()
        .filter(|r| plan.blocks().contains(&r.block))
        .collect();

    for block in collector.pending() {
        output::print_warning(&format!("{}: no {} yet, skipping", block, RESULT_FILE));
    }

    if runs.is_empty() {
        return Err(OerflowError::NoResultsFound {
            path: args.workdir.display().to_string(),
        });
    }

    output::print_info(&format!("Found {} finished blocks", runs.len()));

    let pb = progress::create_progress_bar(runs.len() as u64, "Reading results");
    let mut results: Vec<OptimizationResult> = Vec::new();
    let mut skipped = Vec::new();

    for run in &runs {
        let input = run.block.build(&plan.builder)?;
        let out = engine.read_output(&input, &run.run_dir)?;
        pb.inc(1);

        if !out.converged && !args.allow_unconverged {
            skipped.push(run.block);
            continue;
        }

        results.push(OptimizationResult {
            block: run.block.slug().to_string(),
            final_structure: out.structure,
            potential_energy: out.energy_ev,
            trajectory: run.run_dir.join(run.block.trajectory(plan.element())),
            wall_clock_seconds: out.wall_time_s.unwrap_or(0.0),
            converged: out.converged,
            steps: out.steps,
        });
    }
    pb.finish_and_clear();

    for block in &skipped {
        output::print_warning(&format!(
            "{}: optimization did not converge, skipped (use --allow-unconverged to keep)",
            block
        ));
    }

    for r in &results {
        if let Some(block) = Block::from_slug(&r.block) {
            output::print_header(&block.title(plan.element()));
            report::print_result(block, plan.element(), r)?;
        }
    }

    output::print_separator();
    report::print_summary(&results);

    report::save_results_csv(&results, &args.output)?;
    output::print_done(&format!(
        "Collected {} blocks into {}",
        results.len(),
        args.output.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::engine::gpaw::OUTPUT_FILE;
    use crate::geometry::SlabBuilder;
    use crate::parsers::to_poscar_string;
    use crate::workflow::report::load_results_csv;
    use clap::Parser;
    use std::fs;
    use std::path::Path;

    fn finished_run(root: &Path, block: Block, converged: bool, energy: f64) {
        let builder = SlabBuilder::new("Ni", 3.52, [2, 2, 2]);
        let structure = block.build(&builder).unwrap();
        let dir = root.join(block.slug());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(OUTPUT_FILE), to_poscar_string(&structure)).unwrap();
        fs::write(
            dir.join(RESULT_FILE),
            format!(
                "Optimization converged = {}\nOptimizer steps = 4\nFinal energy = {} eV\nWall time = 12.0 s\n",
                if converged { "True" } else { "False" },
                energy
            ),
        )
        .unwrap();
    }

    fn collect_args(workdir: &Path, output: &Path, extra: &[&str]) -> CollectArgs {
        let mut argv = vec![
            "oerflow".to_string(),
            "collect".to_string(),
            workdir.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Collect(args) => args,
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn test_unconverged_runs_skipped_unless_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let runs = dir.path().join("jobs");
        finished_run(&runs, Block::H2o, false, -14.2);
        finished_run(&runs, Block::H2, true, -6.9);

        let csv_path = dir.path().join("default.csv");
        execute(collect_args(&runs, &csv_path, &[])).unwrap();
        let records = load_results_csv(&csv_path).unwrap();
        let blocks: Vec<&str> = records.iter().map(|r| r.block.as_str()).collect();
        assert_eq!(blocks, ["h2"]);

        let csv_path = dir.path().join("allowed.csv");
        execute(collect_args(&runs, &csv_path, &["--allow-unconverged"])).unwrap();
        let records = load_results_csv(&csv_path).unwrap();
        let blocks: Vec<&str> = records.iter().map(|r| r.block.as_str()).collect();
        assert_eq!(blocks, ["h2o", "h2"]);
        assert!(!records[0].converged);
        assert_eq!(records[0].energy_ev, -14.2);
    }

    #[test]
    fn test_no_finished_runs() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(collect_args(dir.path(), &dir.path().join("out.csv"), &[])).unwrap_err();
        assert!(matches!(err, OerflowError::NoResultsFound { .. }));
    }
}
