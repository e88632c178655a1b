//! # 驱动脚本结果文件解析器
//!
//! 解析 `relax.py` 写出的 `result.out`，提取收敛标志、步数、能量和耗时。
//!
//! ```text
//! Optimization converged = True
//! Optimizer steps = 17
//! Final energy = -123.4567890123 eV
//! Wall time = 345.6 s
//! ```
//!
//! ## 依赖关系
//! - 被 `engine/gpaw.rs` 使用
//! - 使用 `regex` crate

use crate::error::{OerflowError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// 结果文件内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelaxSummary {
    pub converged: Option<bool>,
    pub steps: Option<usize>,
    pub energy_ev: Option<f64>,
    pub wall_time_s: Option<f64>,
}

/// 解析 result.out 文件
pub fn parse_result_file(path: &Path) -> Result<RelaxSummary> {
    let content = fs::read_to_string(path).map_err(|e| OerflowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let summary = parse_result_content(&content);
    if summary.energy_ev.is_none() {
        return Err(OerflowError::ParseError {
            format: "result".to_string(),
            path: path.display().to_string(),
            reason: "No 'Final energy' line".to_string(),
        });
    }
    Ok(summary)
}

/// 从字符串解析；缺失的字段保持 None
pub fn parse_result_content(content: &str) -> RelaxSummary {
    let line = Regex::new(r"^\s*([A-Za-z ]+?)\s*=\s*(\S+)").unwrap();
    let mut summary = RelaxSummary::default();

    for l in content.lines() {
        let Some(caps) = line.captures(l) else {
            continue;
        };
        let value = &caps[2];

        match caps[1].to_lowercase().as_str() {
            "optimization converged" => {
                summary.converged = match value.to_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
            }
            "optimizer steps" => summary.steps = value.parse().ok(),
            "final energy" => summary.energy_ev = value.parse().ok(),
            "wall time" => summary.wall_time_s = value.parse().ok(),
            _ => {}
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_result() {
        let content = "Optimization converged = True\n\
                       Optimizer steps = 17\n\
                       Final energy = -123.4567890123 eV\n\
                       Wall time = 345.6 s\n";
        let s = parse_result_content(content);

        assert_eq!(s.converged, Some(true));
        assert_eq!(s.steps, Some(17));
        assert!((s.energy_ev.unwrap() + 123.4567890123).abs() < 1e-12);
        assert_eq!(s.wall_time_s, Some(345.6));
    }

    #[test]
    fn test_parse_not_converged() {
        let s = parse_result_content("Optimization converged = False\nFinal energy = -1.0 eV\n");
        assert_eq!(s.converged, Some(false));
        assert_eq!(s.steps, None);
    }

    #[test]
    fn test_missing_energy_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.out");
        fs::write(&path, "Optimization converged = True\n").unwrap();

        assert!(matches!(
            parse_result_file(&path),
            Err(OerflowError::ParseError { .. })
        ));
    }
}
