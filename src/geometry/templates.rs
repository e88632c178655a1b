//! # 吸附物与分子模板
//!
//! OER 中间体 (OH, O, OOH) 的相对坐标，以及孤立分子 H2O、H2 的 G2 几何。
//! 每个原子都带位点标签，报告键长时按标签取原子。
//!
//! ## 依赖关系
//! - 被 `geometry/builder.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::{Atom, AtomicStructure, Cell};

/// 与表面成键的吸附原子
pub const ANCHOR: &str = "anchor";
/// OOH 中远离表面的 O
pub const DISTAL: &str = "distal";
/// 吸附物中的 H
pub const HYDROGEN: &str = "H";

/// OER 反应中间体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adsorbate {
    Hydroxyl,
    Oxygen,
    Hydroperoxyl,
}

impl Adsorbate {
    /// 化学式
    pub fn formula(&self) -> &'static str {
        match self {
            Adsorbate::Hydroxyl => "OH",
            Adsorbate::Oxygen => "O",
            Adsorbate::Hydroperoxyl => "OOH",
        }
    }

    /// 以 anchor 原子为原点的模板原子
    pub fn atoms(&self) -> Vec<Atom> {
        match self {
            Adsorbate::Hydroxyl => vec![
                Atom::new("O", [0.0, 0.0, 0.0]).with_label(ANCHOR),
                Atom::new("H", [0.0, -0.763, 0.596]).with_label(HYDROGEN),
            ],
            Adsorbate::Oxygen => vec![Atom::new("O", [0.0, 0.0, 0.0]).with_label(ANCHOR)],
            Adsorbate::Hydroperoxyl => vec![
                Atom::new("O", [0.0, 0.0, 0.0]).with_label(ANCHOR),
                Atom::new("O", [0.0, 0.0, 1.4]).with_label(DISTAL),
                Atom::new("H", [0.0, -0.763, 2.0]).with_label(HYDROGEN),
            ],
        }
    }
}

/// 孤立分子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Molecule {
    Water,
    Hydrogen,
}

impl Molecule {
    pub fn formula(&self) -> &'static str {
        match self {
            Molecule::Water => "H2O",
            Molecule::Hydrogen => "H2",
        }
    }

    /// G2 数据集中的平衡几何（晶胞为空，使用前需 set_cell）
    pub fn structure(&self) -> AtomicStructure {
        let atoms = match self {
            Molecule::Water => vec![
                Atom::new("O", [0.0, 0.0, 0.119262]).with_label("O"),
                Atom::new("H", [0.0, 0.763239, -0.477047]).with_label("H1"),
                Atom::new("H", [0.0, -0.763239, -0.477047]).with_label("H2"),
            ],
            Molecule::Hydrogen => vec![
                Atom::new("H", [0.0, 0.0, 0.368583]).with_label("H1"),
                Atom::new("H", [0.0, 0.0, -0.368583]).with_label("H2"),
            ],
        };
        AtomicStructure::new(
            self.formula(),
            Cell::from_vectors([[0.0; 3]; 3]),
            [false; 3],
            atoms,
        )
    }
}
