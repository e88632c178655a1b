//! # free-energy 命令实现
//!
//! 读取结果 CSV，用计算氢电极模型得到 OER 四步 ΔG，
//! 打印台阶表、决速步和理论过电位，可选写出 CSV 与台阶图。
//!
//! ## 依赖关系
//! - 使用 `cli/free_energy.rs` 定义的参数
//! - 使用 `thermo/`, `workflow/report.rs`, `utils/output.rs`

use crate::cli::free_energy::FreeEnergyArgs;
use crate::error::{OerflowError, Result};
use crate::thermo::che::EQUILIBRIUM_POTENTIAL;
use crate::thermo::{plot, Corrections, FreeEnergyProfile, SpeciesEnergies};
use crate::utils::output;
use crate::workflow::report;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 台阶表的一行
#[derive(Debug, Clone, Tabled)]
struct StepRow {
    #[tabled(rename = "U (V)")]
    potential: String,
    #[tabled(rename = "Step")]
    step: String,
    #[tabled(rename = "Reaction")]
    reaction: String,
    #[tabled(rename = "ΔG (eV)")]
    delta_g: String,
}

/// 写入 CSV 的一行
#[derive(Debug, Clone, Serialize)]
struct StepRecord {
    potential_v: f64,
    step: usize,
    reaction: &'static str,
    delta_g_ev: f64,
    level_ev: f64,
}

/// 执行 free-energy 命令
pub fn execute(args: FreeEnergyArgs) -> Result<()> {
    output::print_header("OER Free Energy (CHE)");

    let records = report::load_results_csv(&args.results)?;
    let unconverged: Vec<&str> = records
        .iter()
        .filter(|r| !r.converged)
        .map(|r| r.block.as_str())
        .collect();
    if !unconverged.is_empty() {
        output::print_warning(&format!(
            "Unconverged blocks in results: {}",
            unconverged.join(", ")
        ));
    }

    let energies = SpeciesEnergies::from_records(&records)?;
    let corrections = Corrections {
        oh: args.corr_oh,
        o: args.corr_o,
        ooh: args.corr_ooh,
        h2o: args.corr_h2o,
        h2: args.corr_h2,
    };

    let base = FreeEnergyProfile::new(&energies, &corrections, 0.0);
    let profiles: Vec<FreeEnergyProfile> = if args.potential.is_empty() {
        vec![base.clone()]
    } else {
        args.potential.iter().map(|&u| base.at_potential(u)).collect()
    };

    let rows: Vec<StepRow> = profiles
        .iter()
        .flat_map(|p| {
            p.steps.iter().map(move |s| StepRow {
                potential: format!("{:.2}", p.potential),
                step: format!("ΔG{}", s.index),
                reaction: s.reaction.to_string(),
                delta_g: format!("{:.3}", s.delta_g),
            })
        })
        .collect();
    println!("{}", Table::new(&rows));

    let limiting = base.limiting_step();
    output::print_value(
        "limiting step",
        &format!("ΔG{} ({}) = {:.3} eV", limiting.index, limiting.reaction, limiting.delta_g),
    );
    output::print_value(
        "limiting potential",
        &format!("{:.3} V", base.limiting_potential()),
    );
    output::print_value(
        "overpotential",
        &format!("{:.3} V (vs {:.2} V)", base.overpotential(), EQUILIBRIUM_POTENTIAL),
    );

    if let Some(path) = &args.output_csv {
        save_steps_csv(&profiles, path)?;
        output::print_success(&format!("Saved steps to {}", path.display()));
    }

    if let Some(path) = &args.plot {
        let title = "OER free-energy diagram";
        plot::generate_step_diagram(&profiles, path, title, args.width, args.height)?;
        output::print_success(&format!("Saved plot to {}", path.display()));
    }

    output::print_separator();
    output::print_done("Free-energy analysis complete");

    Ok(())
}

fn save_steps_csv(profiles: &[FreeEnergyProfile], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for p in profiles {
        let levels = p.levels();
        for s in &p.steps {
            wtr.serialize(StepRecord {
                potential_v: p.potential,
                step: s.index,
                reaction: s.reaction,
                delta_g_ev: s.delta_g,
                level_ev: levels[s.index],
            })?;
        }
    }

    wtr.flush().map_err(|e| OerflowError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
