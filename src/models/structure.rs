//! # 原子结构数据模型
//!
//! 定义统一的原子结构表示：有序原子列表 + 晶胞 + 周期性 + 固定原子集合。
//! 坐标一律为笛卡尔坐标 (Å)，与 ASE 的 `Atoms` 约定一致。
//!
//! ## 不变量
//! - 原子顺序一经构造即固定，吸附物原子只会追加在表面原子之后
//! - 位点标签 (`label`) 随原子一起移动，用来代替硬编码的原子序号
//!
//! ## 依赖关系
//! - 被 `geometry/`, `parsers/`, `engine/`, `workflow/` 使用
//! - 无外部模块依赖

use crate::error::{OerflowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ─────────────────────────────────────────────────────────────
// 三维向量小工具
// ─────────────────────────────────────────────────────────────

pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// 晶胞表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// 晶胞向量矩阵 (3x3)，行向量表示 a, b, c
    pub matrix: [[f64; 3]; 3],
}

impl Cell {
    /// 从晶胞向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Cell { matrix }
    }

    /// 三个晶胞向量的长度
    pub fn lengths(&self) -> [f64; 3] {
        [
            norm(self.matrix[0]),
            norm(self.matrix[1]),
            norm(self.matrix[2]),
        ]
    }

    /// 获取晶胞参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;
        let [a, b, c] = self.lengths();

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶胞体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(a, cross(b, c))
    }

    /// 第 i 个晶面的单位法向（与第 i 个晶胞向量同侧）
    fn face_normal(&self, i: usize) -> Option<[f64; 3]> {
        let n = cross(self.matrix[(i + 1) % 3], self.matrix[(i + 2) % 3]);
        let len = norm(n);
        if len < 1e-10 {
            return None;
        }
        let n = scale(n, 1.0 / len);
        if dot(n, self.matrix[i]) < 0.0 {
            Some(scale(n, -1.0))
        } else {
            Some(n)
        }
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],

    /// 可选：位点标签（如 `site`、`anchor`），供报告和约束按名引用
    pub label: Option<String>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 原子结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicStructure {
    /// 结构名称
    pub name: String,

    /// 晶胞
    pub cell: Cell,

    /// 三个方向的周期性
    pub pbc: [bool; 3],

    /// 原子列表（顺序固定）
    pub atoms: Vec<Atom>,

    /// 被固定的原子序号；不在此处校验越界，交给引擎准备输入时检查
    pub fixed: BTreeSet<usize>,
}

impl AtomicStructure {
    pub fn new(name: impl Into<String>, cell: Cell, pbc: [bool; 3], atoms: Vec<Atom>) -> Self {
        AtomicStructure {
            name: name.into(),
            cell,
            pbc,
            atoms,
            fixed: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 按标签查找原子序号
    pub fn site(&self, label: &str) -> Result<usize> {
        self.atoms
            .iter()
            .position(|a| a.label.as_deref() == Some(label))
            .ok_or_else(|| OerflowError::UnknownSite {
                label: label.to_string(),
                structure: self.name.clone(),
            })
    }

    /// 两原子间距离 (Å)，不考虑最小镜像
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        let n = self.atoms.len();
        if i >= n || j >= n {
            return Err(OerflowError::InvalidArgument(format!(
                "atom index out of range ({}, {}) for {} atoms",
                i, j, n
            )));
        }
        Ok(norm(sub(self.atoms[i].position, self.atoms[j].position)))
    }

    /// 按标签计算两原子间距离
    pub fn site_distance(&self, a: &str, b: &str) -> Result<f64> {
        self.distance(self.site(a)?, self.site(b)?)
    }

    /// 平移所有原子
    pub fn translate(&mut self, shift: [f64; 3]) {
        for atom in &mut self.atoms {
            atom.position = add(atom.position, shift);
        }
    }

    /// 替换晶胞，不缩放原子坐标
    pub fn set_cell(&mut self, cell: Cell) {
        self.cell = cell;
    }

    /// 合并：在当前结构之后追加另一结构的原子，保留当前晶胞、周期性和约束
    pub fn merged(&self, other: &AtomicStructure) -> AtomicStructure {
        let mut combined = self.clone();
        combined.atoms.extend(other.atoms.iter().cloned());
        combined
    }

    /// 原子在给定方向上的投影范围 (min, max)
    fn extent_along(&self, dir: [f64; 3]) -> (f64, f64) {
        if self.atoms.is_empty() {
            return (0.0, 0.0);
        }
        self.atoms
            .iter()
            .map(|a| dot(a.position, dir))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }

    /// 沿给定晶轴居中；给出 `vacuum` 时同时重设该方向晶胞长度，
    /// 使原子两侧各留 `vacuum` 的真空层
    pub fn center(&mut self, vacuum: Option<f64>, axes: &[usize]) -> Result<()> {
        let cell = self.cell.matrix;
        let lengths = self.cell.lengths();

        let mut new_cell = cell;
        let mut translation = [0.0; 3];

        for &i in axes {
            if i > 2 {
                return Err(OerflowError::InvalidArgument(format!(
                    "cell axis {} out of range",
                    i
                )));
            }
            let dir = self.cell.face_normal(i).ok_or_else(|| {
                OerflowError::InvalidArgument(format!(
                    "cannot center '{}': degenerate cell",
                    self.name
                ))
            })?;

            let (p0, p1) = self.extent_along(dir);
            let height = dot(cell[i], dir);
            let longer = match vacuum {
                Some(v) => (p1 - p0 + 2.0 * v) - height,
                None => 0.0,
            };
            let top = longer + height - p1;
            let shift = 0.5 * (top - p0);
            let cosphi = height / lengths[i];

            if vacuum.is_some() {
                new_cell[i] = scale(cell[i], 1.0 + longer / cosphi / lengths[i]);
            }
            translation = add(translation, scale(cell[i], shift / cosphi / lengths[i]));
        }

        self.translate(translation);
        self.cell = Cell::from_vectors(new_cell);
        Ok(())
    }

    /// 某原子是否被固定
    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed.contains(&index)
    }

    /// 可移动原子的序号
    pub fn free_indices(&self) -> Vec<usize> {
        (0..self.atoms.len())
            .filter(|i| !self.fixed.contains(i))
            .collect()
    }

    /// 用弛豫后的坐标和晶胞替换当前结构的几何，保留标签与约束
    pub fn with_relaxed(&self, relaxed: &AtomicStructure) -> Result<AtomicStructure> {
        if relaxed.atoms.len() != self.atoms.len() {
            return Err(OerflowError::Other(format!(
                "relaxed structure of '{}' has {} atoms, expected {}",
                self.name,
                relaxed.atoms.len(),
                self.atoms.len()
            )));
        }

        let mut out = self.clone();
        out.cell = relaxed.cell.clone();
        for (atom, new) in out.atoms.iter_mut().zip(&relaxed.atoms) {
            if atom.element != new.element {
                return Err(OerflowError::Other(format!(
                    "atom order changed in relaxed '{}': {} became {}",
                    self.name, atom.element, new.element
                )));
            }
            atom.position = new.position;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> Cell {
        Cell::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    #[test]
    fn test_cell_parameters_cubic() {
        let (a, b, c, alpha, beta, gamma) = cubic(5.0).parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_cell_volume_cubic() {
        // 5^3 = 125
        assert!((cubic(5.0).volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_formula_and_sites() {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.0]).with_label("O"),
            Atom::new("H", [0.0, 0.0, 1.0]).with_label("H1"),
            Atom::new("H", [0.0, 1.0, 0.0]).with_label("H2"),
        ];
        let s = AtomicStructure::new("water", cubic(10.0), [false; 3], atoms);

        assert_eq!(s.formula(), "H2O");
        assert_eq!(s.site("H2").unwrap(), 2);
        assert!((s.site_distance("O", "H1").unwrap() - 1.0).abs() < 1e-12);
        assert!(matches!(
            s.site("anchor"),
            Err(OerflowError::UnknownSite { .. })
        ));
    }

    #[test]
    fn test_distance_out_of_range() {
        let s = AtomicStructure::new("x", cubic(3.0), [true; 3], vec![Atom::new("Ni", [0.0; 3])]);
        assert!(s.distance(0, 3).is_err());
    }

    #[test]
    fn test_center_with_vacuum_single_axis() {
        let atoms = vec![
            Atom::new("Ni", [0.0, 0.0, 1.0]),
            Atom::new("Ni", [0.0, 0.0, 3.0]),
        ];
        let mut s = AtomicStructure::new("pair", cubic(4.0), [true, true, false], atoms);
        s.center(Some(2.5), &[2]).unwrap();

        let c = s.cell.lengths()[2];
        assert!((c - (2.0 + 5.0)).abs() < 1e-9);
        assert!((s.atoms[0].position[2] - 2.5).abs() < 1e-9);
        assert!((s.atoms[1].position[2] - 4.5).abs() < 1e-9);

        // 其余方向不变
        assert!((s.cell.lengths()[0] - 4.0).abs() < 1e-12);
        assert_eq!(s.atoms[0].position[0], 0.0);
    }

    #[test]
    fn test_center_without_vacuum_keeps_cell() {
        let atoms = vec![Atom::new("O", [1.0, 1.0, 1.0])];
        let mut s = AtomicStructure::new("o", cubic(6.0), [false; 3], atoms);
        s.center(None, &[0, 1, 2]).unwrap();

        assert_eq!(s.cell, cubic(6.0));
        for k in 0..3 {
            assert!((s.atoms[0].position[k] - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_merged_appends_after_existing_atoms() {
        let base = AtomicStructure::new("a", cubic(5.0), [true; 3], vec![Atom::new("Ni", [0.0; 3])]);
        let extra = AtomicStructure::new("b", cubic(1.0), [false; 3], vec![Atom::new("O", [0.0, 0.0, 2.0])]);
        let merged = base.merged(&extra);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.atoms[0].element, "Ni");
        assert_eq!(merged.atoms[1].element, "O");
        assert_eq!(merged.cell, cubic(5.0));
    }

    #[test]
    fn test_with_relaxed_keeps_labels() {
        let atoms = vec![Atom::new("Ni", [0.0; 3]).with_label("site")];
        let mut input = AtomicStructure::new("s", cubic(3.0), [true; 3], atoms);
        input.fixed.insert(0);

        let relaxed = AtomicStructure::new(
            "relaxed",
            cubic(3.0),
            [true; 3],
            vec![Atom::new("Ni", [0.1, 0.0, 0.0])],
        );
        let out = input.with_relaxed(&relaxed).unwrap();

        assert_eq!(out.atoms[0].label.as_deref(), Some("site"));
        assert_eq!(out.atoms[0].position, [0.1, 0.0, 0.0]);
        assert!(out.is_fixed(0));
    }

    #[test]
    fn test_with_relaxed_rejects_reordering() {
        let input = AtomicStructure::new("s", cubic(3.0), [true; 3], vec![Atom::new("Ni", [0.0; 3])]);
        let relaxed = AtomicStructure::new("r", cubic(3.0), [true; 3], vec![Atom::new("O", [0.0; 3])]);
        assert!(input.with_relaxed(&relaxed).is_err());
    }
}
