//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及由命令行参数组装实验计划。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `workflow/`, `engine/`, `thermo/`, `utils/`
//! - 子模块: build, run, prepare, collect, free_energy

pub mod build;
pub mod collect;
pub mod free_energy;
pub mod prepare;
pub mod run;

use crate::cli::experiment::{SlabArgs, SolverArgs};
use crate::cli::Commands;
use crate::error::{OerflowError, Result};
use crate::geometry::SlabBuilder;
use crate::models::{CalculatorConfig, KPointMesh};
use crate::workflow::ExperimentPlan;

use regex::Regex;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Build(args) => build::execute(args),
        Commands::Run(args) => run::execute(args),
        Commands::Prepare(args) => prepare::execute(args),
        Commands::Collect(args) => collect::execute(args),
        Commands::FreeEnergy(args) => free_energy::execute(args),
    }
}

/// 将 "a,b,c" 形式的参数转成三元组
fn triple<T: Copy>(values: &[T], name: &str) -> Result<[T; 3]> {
    match values {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(OerflowError::InvalidArgument(format!(
            "--{} expects exactly 3 comma-separated values, got {}",
            name,
            values.len()
        ))),
    }
}

/// 检查会被写进驱动脚本字符串字面量的参数
fn check_token(value: &str, pattern: &str, name: &str) -> Result<()> {
    let re = Regex::new(pattern).unwrap();
    if re.is_match(value) {
        Ok(())
    } else {
        Err(OerflowError::InvalidArgument(format!(
            "invalid --{} '{}'",
            name, value
        )))
    }
}

/// 表面构建器
pub(crate) fn slab_builder(args: &SlabArgs) -> Result<SlabBuilder> {
    check_token(&args.element, r"^[A-Z][a-z]?$", "element")?;
    let size = triple(&args.size, "size")?;
    Ok(SlabBuilder::new(args.element.as_str(), args.lattice, size)
        .with_vacuum(args.vacuum)
        .with_adsorbate_height(args.height))
}

/// 表面体系的计算器参数
pub(crate) fn calculator(args: &SolverArgs) -> Result<CalculatorConfig> {
    if args.ecut <= 0.0 || args.grid_spacing <= 0.0 || args.smearing < 0.0 {
        return Err(OerflowError::InvalidArgument(
            "cutoff and grid spacing must be positive, smearing non-negative".to_string(),
        ));
    }
    check_token(&args.xc, r"^[A-Za-z0-9_+-]+$", "xc")?;
    let size = triple(&args.kpts, "kpts")?;
    if size.contains(&0) {
        return Err(OerflowError::InvalidArgument(
            "k-point mesh entries must be at least 1".to_string(),
        ));
    }

    Ok(CalculatorConfig::periodic(
        args.xc.as_str(),
        args.ecut,
        KPointMesh {
            size,
            gamma: !args.monkhorst_pack,
        },
        args.grid_spacing,
        args.smearing,
    ))
}

/// 由命令行参数组装实验计划
pub(crate) fn build_plan(slab: &SlabArgs, solver: &SolverArgs) -> Result<ExperimentPlan> {
    if solver.fmax <= 0.0 {
        return Err(OerflowError::InvalidArgument(format!(
            "fmax must be positive, got {}",
            solver.fmax
        )));
    }

    let mut plan = ExperimentPlan::new(slab_builder(slab)?, calculator(solver)?)
        .with_blocks(&slab.blocks);
    plan.optimizer = solver.optimizer;
    plan.fmax = solver.fmax;
    plan.max_steps = solver.max_steps;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::engine::Optimizer;
    use clap::Parser;

    fn run_args(extra: &[&str]) -> crate::cli::run::RunArgs {
        let mut argv = vec!["oerflow", "run"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_default_plan() {
        let args = run_args(&[]);
        let plan = build_plan(&args.slab, &args.solver).unwrap();

        assert_eq!(plan.calculator, CalculatorConfig::default());
        assert_eq!(plan.optimizer, Optimizer::QuasiNewton);
        assert_eq!(plan.fmax, 0.05);
        assert_eq!(plan.blocks().len(), 6);
        assert_eq!(plan.builder.size, [2, 2, 2]);
    }

    #[test]
    fn test_custom_plan() {
        let args = run_args(&[
            "--element", "Pt", "--lattice", "3.92", "--kpts", "6,6,1", "--monkhorst-pack",
            "--optimizer", "fire", "--max-steps", "200",
        ]);
        let plan = build_plan(&args.slab, &args.solver).unwrap();

        assert_eq!(plan.element(), "Pt");
        let k = plan.calculator.kpoints.unwrap();
        assert_eq!(k.size, [6, 6, 1]);
        assert!(!k.gamma);
        assert_eq!(plan.optimizer, Optimizer::Fire);
        assert_eq!(plan.max_steps, Some(200));
    }

    #[test]
    fn test_bad_triples_rejected() {
        let args = run_args(&["--size", "2,2"]);
        assert!(matches!(
            build_plan(&args.slab, &args.solver),
            Err(OerflowError::InvalidArgument(_))
        ));

        let args = run_args(&["--kpts", "4,0,1"]);
        assert!(build_plan(&args.slab, &args.solver).is_err());
    }

    #[test]
    fn test_quoted_names_rejected() {
        let args = run_args(&["--xc", "RPBE'"]);
        assert!(matches!(
            build_plan(&args.slab, &args.solver),
            Err(OerflowError::InvalidArgument(_))
        ));

        let args = run_args(&["--element", "Ni'; import os"]);
        assert!(build_plan(&args.slab, &args.solver).is_err());

        let args = run_args(&["--xc", "vdW-DF2", "--element", "Pt"]);
        assert!(build_plan(&args.slab, &args.solver).is_ok());
    }
}
