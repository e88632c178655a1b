//! # build 命令实现
//!
//! 构建各计算块的输入结构并写成 POSCAR，不调用引擎。
//! 约束以 Selective dynamics 写出，便于在查看器中检查固定原子。
//!
//! ## 依赖关系
//! - 使用 `cli/build.rs` 定义的参数
//! - 使用 `workflow/plan.rs`, `parsers/poscar.rs`, `utils/`

use crate::cli::build::BuildArgs;
use crate::error::{OerflowError, Result};
use crate::models::CalculatorConfig;
use crate::parsers::to_poscar_string;
use crate::utils::output;
use crate::utils::viewer::Viewer;
use crate::workflow::ExperimentPlan;

use std::fs;

/// 执行 build 命令
pub fn execute(args: BuildArgs) -> Result<()> {
    output::print_header("Building OER Structures");

    let builder = super::slab_builder(&args.slab)?;
    let plan =
        ExperimentPlan::new(builder, CalculatorConfig::default()).with_blocks(&args.slab.blocks);
    let viewer = args.viewer.as_deref().and_then(Viewer::parse);

    fs::create_dir_all(&args.output_dir).map_err(|e| OerflowError::FileWriteError {
        path: args.output_dir.display().to_string(),
        source: e,
    })?;

    let mut written = 0;
    for &block in plan.blocks() {
        let structure = block.build(&plan.builder)?;
        let path = args.output_dir.join(format!("{}.POSCAR", block.slug()));

        if path.exists() && !args.overwrite {
            output::print_skip(&format!("{} (exists)", path.display()));
            continue;
        }

        fs::write(&path, to_poscar_string(&structure)).map_err(|e| {
            OerflowError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            }
        })?;

        let (_, _, c, _, _, gamma) = structure.cell.parameters();
        output::print_success(&format!(
            "{:<16} {:>3} atoms ({} free), c = {:.3} Å, γ = {:.0}° -> {}",
            block.title(plan.element()),
            structure.len(),
            structure.free_indices().len(),
            c,
            gamma,
            path.display()
        ));

        if let Some(v) = &viewer {
            v.show(&path);
        }
        written += 1;
    }

    output::print_separator();
    output::print_done(&format!(
        "Wrote {} structures to {}",
        written,
        args.output_dir.display()
    ));

    Ok(())
}
