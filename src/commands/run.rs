//! # run 命令实现
//!
//! 在本机按固定顺序弛豫全部计算块，打印能量与键长，
//! 最后输出汇总表，可选写出结果 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `workflow/`, `engine/gpaw.rs`, `utils/`

use crate::cli::run::RunArgs;
use crate::engine::{Engine, GpawEngine};
use crate::error::Result;
use crate::utils::output;
use crate::utils::viewer::Viewer;
use crate::workflow::{report, Sequencer};

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    let plan = super::build_plan(&args.slab, &args.solver)?;
    let engine = GpawEngine::new(args.engine.python.as_str());

    output::print_header("OER Workflow");
    output::print_value("engine", &format!("{} ({})", engine.name(), engine.python));
    output::print_value(
        "slab",
        &format!(
            "{}(111) a = {} Å, {}x{}x{}, vacuum {} Å",
            plan.element(),
            plan.builder.lattice_constant,
            plan.builder.size[0],
            plan.builder.size[1],
            plan.builder.size[2],
            plan.builder.vacuum
        ),
    );
    output::print_value(
        "calculator",
        &format!(
            "{}, {} eV, h = {} Å, width = {} eV",
            plan.calculator.functional,
            plan.calculator.plane_wave_cutoff,
            plan.calculator.grid_spacing,
            plan.calculator.smearing_width
        ),
    );
    output::print_value(
        "optimizer",
        &format!("{}, fmax = {} eV/Å", plan.optimizer, plan.fmax),
    );
    output::print_value("workdir", &args.workdir.display().to_string());

    let viewer = args.viewer.as_deref().and_then(Viewer::parse);
    let results = Sequencer::new(&engine, &args.workdir)
        .with_viewer(viewer)
        .dry_run(args.dry_run)
        .run(&plan)?;

    output::print_separator();

    if args.dry_run {
        output::print_done(&format!(
            "Inputs for {} blocks written to {}",
            plan.blocks().len(),
            args.workdir.display()
        ));
        return Ok(());
    }

    report::print_summary(&results);

    if let Some(csv_path) = &args.output_csv {
        report::save_results_csv(&results, csv_path)?;
        output::print_success(&format!("Saved results to {}", csv_path.display()));
    }

    let total: f64 = results.iter().map(|r| r.wall_clock_minutes()).sum();
    output::print_done(&format!(
        "{} blocks relaxed in {:.1} min",
        results.len(),
        total
    ));

    Ok(())
}
