//! # 计算氢电极 (CHE) 自由能
//!
//! 四电子 OER 机理，每步放出一个 (H⁺ + e⁻)，以 ½H2 计：
//!
//! ```text
//! ΔG1: H2O + *    → OH*  + ½H2
//! ΔG2: OH*        → O*   + ½H2
//! ΔG3: O*  + H2O  → OOH* + ½H2
//! ΔG4: OOH*       → * + O2 + ½H2
//! ```
//!
//! O2 的能量不直接取 DFT 值，而是由 2H2O → O2 + 2H2 的实验反应自由能
//! 4.92 eV 给出，因此四步之和恒为 4.92 − 4eU。
//!
//! ## 依赖关系
//! - 被 `commands/free_energy.rs` 调用
//! - 使用 `models/calculation.rs` 的 ResultRecord

use crate::error::{OerflowError, Result};
use crate::models::ResultRecord;
use crate::workflow::Block;

use serde::{Deserialize, Serialize};

/// 2H2O → O2 + 2H2 的反应自由能 (eV)
pub const WATER_SPLITTING_EV: f64 = 4.92;

/// 平衡电位 (V vs RHE)
pub const EQUILIBRIUM_POTENTIAL: f64 = WATER_SPLITTING_EV / 4.0;

/// 各物种的 DFT 总能 (eV)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesEnergies {
    pub slab: f64,
    pub oh: f64,
    pub o: f64,
    pub ooh: f64,
    pub h2o: f64,
    pub h2: f64,
}

impl SpeciesEnergies {
    /// 从结果记录中取出六个块的能量；缺任何一个都报错
    pub fn from_records(records: &[ResultRecord]) -> Result<Self> {
        let energy = |block: Block| -> Result<f64> {
            records
                .iter()
                .rev()
                .find(|r| r.block == block.slug())
                .map(|r| r.energy_ev)
                .ok_or_else(|| {
                    OerflowError::InvalidArgument(format!(
                        "No energy for block '{}' in results",
                        block
                    ))
                })
        };

        Ok(SpeciesEnergies {
            slab: energy(Block::Slab)?,
            oh: energy(Block::Oh)?,
            o: energy(Block::O)?,
            ooh: energy(Block::Ooh)?,
            h2o: energy(Block::H2o)?,
            h2: energy(Block::H2)?,
        })
    }
}

/// 各物种的 ZPE − TS (+ ∫Cp dT) 修正 (eV)，默认全为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Corrections {
    pub oh: f64,
    pub o: f64,
    pub ooh: f64,
    pub h2o: f64,
    pub h2: f64,
}

/// 单个电化学步骤
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionStep {
    /// 步骤序号 1..=4
    pub index: usize,
    pub reaction: &'static str,
    /// 该电位下的 ΔG (eV)
    pub delta_g: f64,
}

/// 某一电位下的自由能台阶
#[derive(Debug, Clone, PartialEq)]
pub struct FreeEnergyProfile {
    /// 外加电位 U (V vs RHE)
    pub potential: f64,
    pub steps: [ReactionStep; 4],
}

impl FreeEnergyProfile {
    pub fn new(energies: &SpeciesEnergies, corrections: &Corrections, potential: f64) -> Self {
        let g_slab = energies.slab;
        let g_oh = energies.oh + corrections.oh;
        let g_o = energies.o + corrections.o;
        let g_ooh = energies.ooh + corrections.ooh;
        let g_h2o = energies.h2o + corrections.h2o;
        let g_h2 = energies.h2 + corrections.h2;
        let g_o2 = 2.0 * g_h2o - 2.0 * g_h2 + WATER_SPLITTING_EV;
        let half_h2 = 0.5 * g_h2;

        let dg = [
            g_oh + half_h2 - g_slab - g_h2o,
            g_o + half_h2 - g_oh,
            g_ooh + half_h2 - g_o - g_h2o,
            g_slab + g_o2 + half_h2 - g_ooh,
        ];
        let reactions = [
            "H2O + * -> OH* + H+ + e-",
            "OH* -> O* + H+ + e-",
            "O* + H2O -> OOH* + H+ + e-",
            "OOH* -> * + O2 + H+ + e-",
        ];

        let step = |i: usize| ReactionStep {
            index: i + 1,
            reaction: reactions[i],
            delta_g: dg[i] - potential,
        };

        FreeEnergyProfile {
            potential,
            steps: [step(0), step(1), step(2), step(3)],
        }
    }

    /// 同一组能量在另一电位下的台阶
    pub fn at_potential(&self, potential: f64) -> Self {
        let shift = self.potential - potential;
        let mut steps = self.steps.clone();
        for s in steps.iter_mut() {
            s.delta_g += shift;
        }
        FreeEnergyProfile { potential, steps }
    }

    /// 决速步（ΔG 最大的一步）
    pub fn limiting_step(&self) -> &ReactionStep {
        let mut worst = &self.steps[0];
        for s in &self.steps[1..] {
            if s.delta_g > worst.delta_g {
                worst = s;
            }
        }
        worst
    }

    /// 理论过电位 η = max(ΔG(U=0))/e − 1.23 V，与当前电位无关
    pub fn overpotential(&self) -> f64 {
        self.limiting_step().delta_g + self.potential - EQUILIBRIUM_POTENTIAL
    }

    /// 极限电位：所有步骤都下坡所需的最小 U
    pub fn limiting_potential(&self) -> f64 {
        self.limiting_step().delta_g + self.potential
    }

    /// 累积自由能，从 * + 2H2O 的 0 开始，共 5 个台阶
    pub fn levels(&self) -> [f64; 5] {
        let mut levels = [0.0; 5];
        for (i, s) in self.steps.iter().enumerate() {
            levels[i + 1] = levels[i] + s.delta_g;
        }
        levels
    }
}

/// 台阶图上各状态的标签
pub const STATE_LABELS: [&str; 5] = ["*", "OH*", "O*", "OOH*", "* + O2"];

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn energies() -> SpeciesEnergies {
        SpeciesEnergies {
            slab: -40.12,
            oh: -50.31,
            o: -45.02,
            ooh: -54.77,
            h2o: -14.22,
            h2: -6.98,
        }
    }

    fn record(block: &str, energy: f64) -> ResultRecord {
        ResultRecord {
            block: block.to_string(),
            formula: String::new(),
            energy_ev: energy,
            wall_clock_s: 1.0,
            converged: true,
            trajectory: String::new(),
        }
    }

    #[test]
    fn test_steps_sum_to_water_splitting() {
        let corr = Corrections {
            oh: 0.35,
            o: 0.05,
            ooh: 0.40,
            h2o: 0.00,
            h2: -0.04,
        };
        for u in [0.0, 1.23, 1.6] {
            let p = FreeEnergyProfile::new(&energies(), &corr, u);
            let total: f64 = p.steps.iter().map(|s| s.delta_g).sum();
            assert!((total - (WATER_SPLITTING_EV - 4.0 * u)).abs() < TOL);
            assert!((p.levels()[4] - total).abs() < TOL);
        }
    }

    #[test]
    fn test_step_values() {
        let p = FreeEnergyProfile::new(&energies(), &Corrections::default(), 0.0);
        let e = energies();

        assert!((p.steps[0].delta_g - (e.oh + 0.5 * e.h2 - e.slab - e.h2o)).abs() < TOL);
        assert!((p.steps[1].delta_g - (e.o + 0.5 * e.h2 - e.oh)).abs() < TOL);
        assert!((p.steps[2].delta_g - (e.ooh + 0.5 * e.h2 - e.o - e.h2o)).abs() < TOL);
    }

    #[test]
    fn test_overpotential_is_independent_of_potential() {
        let p0 = FreeEnergyProfile::new(&energies(), &Corrections::default(), 0.0);
        let max = p0.steps.iter().map(|s| s.delta_g).fold(f64::MIN, f64::max);

        assert!((p0.overpotential() - (max - 1.23)).abs() < TOL);
        assert!((p0.at_potential(1.23).overpotential() - p0.overpotential()).abs() < TOL);
        assert!((p0.limiting_potential() - max).abs() < TOL);
    }

    #[test]
    fn test_at_potential_matches_fresh_profile() {
        let c = Corrections::default();
        let shifted = FreeEnergyProfile::new(&energies(), &c, 0.0).at_potential(1.5);
        let fresh = FreeEnergyProfile::new(&energies(), &c, 1.5);
        for (a, b) in shifted.steps.iter().zip(fresh.steps.iter()) {
            assert!((a.delta_g - b.delta_g).abs() < TOL);
        }
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            record("slab", -40.0),
            record("oh", -50.0),
            record("o", -45.0),
            record("ooh", -55.0),
            record("h2o", -14.0),
            record("h2", -7.0),
        ];
        let e = SpeciesEnergies::from_records(&records).unwrap();
        assert_eq!(e.ooh, -55.0);
        assert_eq!(e.h2, -7.0);

        let err = SpeciesEnergies::from_records(&records[..5]).unwrap_err();
        assert!(matches!(err, OerflowError::InvalidArgument(_)));
    }
}
