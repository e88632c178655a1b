//! # 计算器参数模型
//!
//! 外部 DFT 引擎的参数集合：交换关联泛函、平面波截断能、k 点网格、
//! 实空间格点间距、Fermi-Dirac 展宽。
//!
//! 表面体系与孤立分子只在 k 点采样上不同；每个计算块都拿到一份新的
//! 配置值，避免引擎端的计算器状态在结构之间串联。
//!
//! ## 依赖关系
//! - 被 `workflow/plan.rs`, `engine/gpaw.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// k 点网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KPointMesh {
    pub size: [u32; 3],
    /// 是否包含 Γ 点
    pub gamma: bool,
}

/// 计算器参数（不可变记录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// 交换关联泛函 (e.g. RPBE)
    pub functional: String,

    /// 平面波截断能 (eV)
    pub plane_wave_cutoff: f64,

    /// k 点网格；孤立分子为 None
    pub kpoints: Option<KPointMesh>,

    /// 实空间格点间距 (Å)
    pub grid_spacing: f64,

    /// Fermi-Dirac 展宽 (eV)
    pub smearing_width: f64,
}

impl CalculatorConfig {
    /// 周期性表面体系使用的配置
    pub fn periodic(
        functional: impl Into<String>,
        plane_wave_cutoff: f64,
        kpoints: KPointMesh,
        grid_spacing: f64,
        smearing_width: f64,
    ) -> Self {
        CalculatorConfig {
            functional: functional.into(),
            plane_wave_cutoff,
            kpoints: Some(kpoints),
            grid_spacing,
            smearing_width,
        }
    }

    /// 孤立分子使用的配置：去掉 k 点网格，其余参数不变
    pub fn without_kpoints(&self) -> Self {
        CalculatorConfig {
            kpoints: None,
            ..self.clone()
        }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig::periodic(
            "RPBE",
            350.0,
            KPointMesh {
                size: [4, 4, 1],
                gamma: true,
            },
            0.2,
            0.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_molecule_variant_differs_only_in_kpoints() {
        let slab = CalculatorConfig::default();
        let mol = slab.without_kpoints();

        assert!(slab.kpoints.is_some());
        assert!(mol.kpoints.is_none());
        assert_eq!(mol.functional, slab.functional);
        assert_eq!(mol.plane_wave_cutoff, slab.plane_wave_cutoff);
        assert_eq!(mol.grid_spacing, slab.grid_spacing);
        assert_eq!(mol.smearing_width, slab.smearing_width);
    }
}
