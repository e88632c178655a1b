//! # 结构构建器
//!
//! 由晶格常数、表面尺寸、真空层厚度生成六类计算结构：
//! 裸表面、OH/O/OOH 吸附表面、孤立 H2O 与 H2。
//!
//! 吸附物放在吸附位点正上方固定高度处，不做碰撞或成键检查，只作为优化初猜。
//! 表面结构只沿非周期方向 (z) 加真空；孤立分子放进表面晶胞后三个方向都加真空。
//! 注意：早先的 ASE 脚本对表面调用 `center(vacuum=2.0)` 会在三个方向都加真空，
//! 这里有意只加 z 方向，保持面内周期；与那套结果比较能量时晶胞并不相同。
//!
//! ## 依赖关系
//! - 被 `workflow/plan.rs` 使用
//! - 使用 `geometry/slab.rs`, `geometry/templates.rs`, `geometry/constraint.rs`

use super::constraint::FixAtoms;
use super::slab::{fcc111, BINDING_SITE};
use super::templates::{Adsorbate, Molecule};
use crate::error::{OerflowError, Result};
use crate::models::structure::add;
use crate::models::{AtomicStructure, Cell};

/// 表面的真空方向
const VACUUM_AXIS: usize = 2;

/// 表面与分子结构构建器
#[derive(Debug, Clone, PartialEq)]
pub struct SlabBuilder {
    /// 金属元素
    pub element: String,
    /// 晶格常数 (Å)
    pub lattice_constant: f64,
    /// 表面尺寸 (nx, ny, 层数)
    pub size: [usize; 3],
    /// 单侧真空层厚度 (Å)
    pub vacuum: f64,
    /// 吸附物相对吸附位点的高度 (Å)
    pub adsorbate_height: f64,
}

impl SlabBuilder {
    pub fn new(element: impl Into<String>, lattice_constant: f64, size: [usize; 3]) -> Self {
        SlabBuilder {
            element: element.into(),
            lattice_constant,
            size,
            vacuum: 2.0,
            adsorbate_height: 1.5,
        }
    }

    pub fn with_vacuum(mut self, vacuum: f64) -> Self {
        self.vacuum = vacuum;
        self
    }

    pub fn with_adsorbate_height(mut self, height: f64) -> Self {
        self.adsorbate_height = height;
        self
    }

    /// 固定好约束、尚未加真空的表面
    fn constrained_slab(&self) -> Result<AtomicStructure> {
        if self.vacuum < 0.0 {
            return Err(OerflowError::InvalidArgument(format!(
                "vacuum must be non-negative, got {}",
                self.vacuum
            )));
        }
        let mut slab = fcc111(&self.element, self.lattice_constant, self.size)?;
        FixAtoms::all_except(&slab, &[BINDING_SITE])?.apply(&mut slab);
        Ok(slab)
    }

    /// 裸表面
    pub fn bare_slab(&self) -> Result<AtomicStructure> {
        let mut slab = self.constrained_slab()?;
        slab.center(Some(self.vacuum), &[VACUUM_AXIS])?;
        Ok(slab)
    }

    /// 吸附了中间体的表面
    pub fn slab_with(&self, adsorbate: Adsorbate) -> Result<AtomicStructure> {
        let slab = self.constrained_slab()?;
        let mut combined = place_adsorbate(&slab, BINDING_SITE, adsorbate, self.adsorbate_height)?;
        combined.center(Some(self.vacuum), &[VACUUM_AXIS])?;
        Ok(combined)
    }

    /// 放在（已加真空的）表面晶胞中的孤立分子
    pub fn isolated(&self, molecule: Molecule) -> Result<AtomicStructure> {
        let cell: Cell = self.bare_slab()?.cell;
        let mut mol = molecule.structure();
        mol.set_cell(cell);
        mol.center(Some(self.vacuum), &[0, 1, 2])?;
        Ok(mol)
    }
}

/// 把吸附物放到指定位点正上方 `height` 处，原子追加在表面原子之后
pub fn place_adsorbate(
    slab: &AtomicStructure,
    site: &str,
    adsorbate: Adsorbate,
    height: f64,
) -> Result<AtomicStructure> {
    let anchor = slab.atoms[slab.site(site)?].position;

    let mut ads = AtomicStructure::new(
        adsorbate.formula(),
        slab.cell.clone(),
        slab.pbc,
        adsorbate.atoms(),
    );
    ads.translate(add(anchor, [0.0, 0.0, height]));

    let mut combined = slab.merged(&ads);
    combined.name = format!("{} on {}", adsorbate.formula(), slab.name);
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::templates::{ANCHOR, HYDROGEN};

    fn ni() -> SlabBuilder {
        SlabBuilder::new("Ni", 3.52, [2, 2, 2])
    }

    fn z_extent(s: &AtomicStructure) -> (f64, f64) {
        s.atoms.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
            (lo.min(a.position[2]), hi.max(a.position[2]))
        })
    }

    #[test]
    fn test_bare_slab_vacuum_axis_length() {
        let slab = ni().bare_slab().unwrap();
        assert_eq!(slab.len(), 8);

        // 两层之间的厚度 a/√3，加上两侧各 2.0 Å
        let bulk_extent = 3.52 / 3f64.sqrt();
        let c = slab.cell.lengths()[2];
        assert!((c - (bulk_extent + 2.0 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_vacuum_on_both_sides() {
        for v in [2.0, 5.0, 7.5] {
            let s = ni().with_vacuum(v).slab_with(Adsorbate::Hydroperoxyl).unwrap();
            let (lo, hi) = z_extent(&s);
            let c = s.cell.lengths()[2];
            assert!(lo >= v - 1e-9);
            assert!(c - hi >= v - 1e-9);
        }
    }

    #[test]
    fn test_lateral_cell_unchanged_by_centering() {
        let raw = fcc111("Ni", 3.52, [2, 2, 2]).unwrap();
        let slab = ni().bare_slab().unwrap();
        assert_eq!(slab.cell.matrix[0], raw.cell.matrix[0]);
        assert_eq!(slab.cell.matrix[1], raw.cell.matrix[1]);
    }

    #[test]
    fn test_adsorbate_appended_after_slab() {
        let bare = ni().bare_slab().unwrap();
        for (ads, n) in [
            (Adsorbate::Hydroxyl, 2),
            (Adsorbate::Oxygen, 1),
            (Adsorbate::Hydroperoxyl, 3),
        ] {
            let s = ni().slab_with(ads).unwrap();
            assert_eq!(s.len(), 8 + n);
            for i in 0..8 {
                assert_eq!(s.atoms[i].element, "Ni");
                assert_eq!(s.atoms[i].label, bare.atoms[i].label);
            }
            assert_eq!(s.site(ANCHOR).unwrap(), 8);
        }
    }

    #[test]
    fn test_adsorbate_sits_above_binding_site() {
        let s = ni().slab_with(Adsorbate::Hydroxyl).unwrap();
        let site = s.atoms[s.site(BINDING_SITE).unwrap()].position;
        let anchor = s.atoms[s.site(ANCHOR).unwrap()].position;

        assert!((anchor[0] - site[0]).abs() < 1e-9);
        assert!((anchor[1] - site[1]).abs() < 1e-9);
        assert!((anchor[2] - site[2] - 1.5).abs() < 1e-9);
        assert!((s.site_distance(BINDING_SITE, ANCHOR).unwrap() - 1.5).abs() < 1e-9);
        assert!(s.site(HYDROGEN).is_ok());
    }

    #[test]
    fn test_only_binding_site_is_free() {
        let s = ni().slab_with(Adsorbate::Oxygen).unwrap();
        // 吸附物原子与吸附位点可移动
        assert_eq!(s.free_indices(), vec![4, 8]);
    }

    #[test]
    fn test_bare_slabs_are_reproducible() {
        let a = ni().bare_slab().unwrap();
        let b = ni().bare_slab().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_isolated_molecule_boxed_in_slab_cell() {
        let b = ni();
        let mol = b.isolated(Molecule::Water).unwrap();

        assert_eq!(mol.len(), 3);
        assert_eq!(mol.pbc, [false; 3]);
        assert!(mol.fixed.is_empty());

        let (lo, hi) = z_extent(&mol);
        let c = mol.cell.lengths()[2];
        assert!((lo - 2.0).abs() < 1e-9);
        assert!((c - hi - 2.0).abs() < 1e-9);
        assert!((mol.site_distance("O", "H1").unwrap() - 0.9686).abs() < 1e-3);
    }

    #[test]
    fn test_slab_vacuum_leaves_in_plane_cell_untouched() {
        let raw = fcc111("Ni", 3.52, [2, 2, 2]).unwrap();
        for s in [ni().bare_slab().unwrap(), ni().slab_with(Adsorbate::Hydroperoxyl).unwrap()] {
            assert_eq!(s.cell.matrix[0], raw.cell.matrix[0]);
            assert_eq!(s.cell.matrix[1], raw.cell.matrix[1]);
            assert!(s.cell.lengths()[2] > raw.cell.lengths()[2]);
        }
    }

    #[test]
    fn test_negative_vacuum_rejected() {
        assert!(ni().with_vacuum(-1.0).bare_slab().is_err());
    }
}
