//! # 结果报告
//!
//! 打印每个计算块的耗时、能量和键长，汇总成表格并写出 CSV。
//! 这里只做读取和打印，自由能推导在 `thermo/` 中完成。
//!
//! ## 依赖关系
//! - 被 `workflow/runner.rs`, `commands/collect.rs`, `commands/free_energy.rs` 使用
//! - 使用 `utils/output.rs`, `tabled`, `csv`

use super::plan::Block;
use crate::error::{OerflowError, Result};
use crate::models::{OptimizationResult, ResultRecord};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表的一行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
    #[tabled(rename = "Steps")]
    steps: String,
    #[tabled(rename = "Time (min)")]
    minutes: String,
}

/// 打印单个计算块的结果
pub fn print_result(block: Block, element: &str, result: &OptimizationResult) -> Result<()> {
    output::print_info(&format!(
        "Calculation time: {:.2} min.",
        result.wall_clock_minutes()
    ));
    output::print_success(&format!(
        "{} energy: {:.6} eV",
        block.title(element),
        result.potential_energy
    ));

    for bond in block.bonds(element) {
        let d = result.final_structure.site_distance(bond.a, bond.b)?;
        output::print_value(&format!("bond {}", bond.name), &format!("{:.4} Å", d));
    }

    Ok(())
}

/// 打印汇总表
pub fn print_summary(results: &[OptimizationResult]) {
    let rows: Vec<SummaryRow> = results
        .iter()
        .map(|r| SummaryRow {
            block: r.block.clone(),
            formula: r.final_structure.formula(),
            energy: format!("{:.6}", r.potential_energy),
            steps: r.steps.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
            minutes: format!("{:.2}", r.wall_clock_minutes()),
        })
        .collect();

    println!("{}", Table::new(&rows));
}

/// 保存结果到 CSV
pub fn save_results_csv(results: &[OptimizationResult], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for r in results {
        wtr.serialize(r.to_record())?;
    }

    wtr.flush().map_err(|e| OerflowError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 读取结果 CSV
pub fn load_results_csv(path: &Path) -> Result<Vec<ResultRecord>> {
    if !path.exists() {
        return Err(OerflowError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let records = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<ResultRecord>, csv::Error>>()?;

    Ok(records)
}
