//! # fcc(111) 表面构建
//!
//! 按 ASE `fcc111` 的约定生成非正交晶胞的表面模型：
//!
//! ```text
//! 面内最近邻距离    d = a / √2
//! 表面晶胞向量      (nx·d, 0, 0), (ny·d/2, ny·d·√3/2, 0)
//! 层间距            a / √3
//! 堆垛              ABC，最顶层不平移，往下依次平移 1/3, 2/3
//! 原子顺序          自底向上逐层，层内 x 下标最快
//! ```
//!
//! 顶层第一个原子被标记为吸附位点 [`BINDING_SITE`]。
//!
//! ## 依赖关系
//! - 被 `geometry/builder.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{OerflowError, Result};
use crate::models::{Atom, AtomicStructure, Cell};

/// 吸附位点标签
pub const BINDING_SITE: &str = "site";

/// 构建 fcc(111) 表面（未加真空层）
pub fn fcc111(element: &str, lattice_constant: f64, size: [usize; 3]) -> Result<AtomicStructure> {
    if lattice_constant <= 0.0 || !lattice_constant.is_finite() {
        return Err(OerflowError::InvalidArgument(format!(
            "lattice constant must be positive, got {}",
            lattice_constant
        )));
    }
    if size.iter().any(|&n| n == 0) {
        return Err(OerflowError::InvalidArgument(format!(
            "slab size must be at least 1 in every direction, got {:?}",
            size
        )));
    }

    let [nx, ny, nz] = size;
    let d = lattice_constant / 2f64.sqrt();
    let spacing = lattice_constant / 3f64.sqrt();

    // 单原子表面晶胞
    let v1 = [d, 0.0];
    let v2 = [d * 0.5, d * 3f64.sqrt() * 0.5];

    let mut atoms = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        let offset = ((nz - 1 - k) % 3) as f64 / 3.0;
        for j in 0..ny {
            for i in 0..nx {
                let fi = i as f64 + offset;
                let fj = j as f64 + offset;
                let position = [
                    fi * v1[0] + fj * v2[0],
                    fi * v1[1] + fj * v2[1],
                    k as f64 * spacing,
                ];
                atoms.push(Atom::new(element, position));
            }
        }
    }

    atoms[(nz - 1) * nx * ny].label = Some(BINDING_SITE.to_string());

    let cell = Cell::from_vectors([
        [nx as f64 * v1[0], 0.0, 0.0],
        [ny as f64 * v2[0], ny as f64 * v2[1], 0.0],
        [0.0, 0.0, nz as f64 * spacing],
    ]);

    Ok(AtomicStructure::new(
        format!("{}(111)", element),
        cell,
        [true, true, false],
        atoms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slab_atom_count() {
        let slab = fcc111("Ni", 3.52, [2, 2, 2]).unwrap();
        assert_eq!(slab.len(), 8);
        assert_eq!(slab.formula(), "Ni8");

        let big = fcc111("Pt", 3.92, [3, 3, 4]).unwrap();
        assert_eq!(big.len(), 36);
    }

    #[test]
    fn test_binding_site_is_first_top_layer_atom() {
        let slab = fcc111("Ni", 3.52, [2, 2, 2]).unwrap();
        assert_eq!(slab.site(BINDING_SITE).unwrap(), 4);

        let top_z = slab.atoms[4].position[2];
        assert!(slab.atoms.iter().all(|a| a.position[2] <= top_z + 1e-12));
        assert_eq!(slab.atoms[4].position, [0.0, 0.0, top_z]);
    }

    #[test]
    fn test_nearest_neighbour_distance() {
        let a = 3.52;
        let slab = fcc111("Ni", a, [2, 2, 2]).unwrap();
        let nn = a / 2f64.sqrt();

        // 同层相邻
        assert!((slab.distance(4, 5).unwrap() - nn).abs() < 1e-9);
        // 相邻层最近邻：fcc 中层间最近邻也是 a/√2
        assert!((slab.distance(0, 4).unwrap() - nn).abs() < 1e-9);
    }

    #[test]
    fn test_cell_geometry() {
        let a = 3.52;
        let slab = fcc111("Ni", a, [2, 2, 2]).unwrap();
        let (la, lb, lc, _, _, gamma) = slab.cell.parameters();

        assert!((la - 2.0 * a / 2f64.sqrt()).abs() < 1e-9);
        assert!((lb - la).abs() < 1e-9);
        assert!((lc - 2.0 * a / 3f64.sqrt()).abs() < 1e-9);
        assert!((gamma - 60.0).abs() < 1e-9);
        assert_eq!(slab.pbc, [true, true, false]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(fcc111("Ni", -1.0, [2, 2, 2]).is_err());
        assert!(fcc111("Ni", 3.52, [2, 0, 2]).is_err());
    }
}
