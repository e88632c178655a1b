//! # VASP POSCAR 格式读写
//!
//! 引擎输入输出的结构交换格式。ASE 的 `ase.io.read/write(format='vasp')`
//! 直接读写此格式，并把 Selective dynamics 中三个方向全为 `F` 的原子
//! 映射为 `FixAtoms`。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1 [T T T]       # atom positions
//! ...
//! ```
//!
//! 写出时按原子顺序分段（连续同种元素为一段），元素可以重复出现，
//! 保证读回后原子顺序不变。
//!
//! ## 依赖关系
//! - 被 `engine/gpaw.rs`, `commands/build.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{OerflowError, Result};
use crate::models::{Atom, AtomicStructure, Cell};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<AtomicStructure> {
    let content = fs::read_to_string(path).map_err(|e| OerflowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

fn parse_error(name: &str, reason: impl Into<String>) -> OerflowError {
    OerflowError::ParseError {
        format: "poscar".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 从字符串内容解析 POSCAR 格式（仅 VASP 5+，需要元素行）
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<AtomicStructure> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 8 {
        return Err(parse_error(default_name, "File too short"));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1].trim().parse().unwrap_or(1.0);

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_error(
                &name,
                format!("Invalid lattice vector at line {}", 3 + i),
            ));
        }
        matrix[i] = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
    }
    let cell = Cell::from_vectors(matrix);

    // Lines 5-6: Element symbols and counts
    let elements: Vec<&str> = lines[5].split_whitespace().collect();
    if elements.is_empty() || elements[0].parse::<i32>().is_ok() {
        return Err(parse_error(&name, "Missing element symbol line (VASP 4 format)"));
    }
    let counts: Vec<usize> = lines[6]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if counts.len() != elements.len() {
        return Err(parse_error(&name, "Element and count lines disagree"));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = 7;
    let selective = lines[coord_line]
        .trim()
        .to_lowercase()
        .starts_with('s');
    if selective {
        coord_line += 1;
    }

    if lines.len() <= coord_line {
        return Err(parse_error(&name, "Missing coordinate type line"));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let mut atoms: Vec<Atom> = Vec::new();
    let mut fixed = BTreeSet::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let line = lines
                .get(line_idx)
                .ok_or_else(|| parse_error(&name, "Unexpected end of positions"))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let coords: Vec<f64> = tokens
                .iter()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();
            if coords.len() < 3 {
                return Err(parse_error(
                    &name,
                    format!("Invalid position at line {}", line_idx + 1),
                ));
            }

            let raw = [coords[0], coords[1], coords[2]];
            let position = if is_cartesian {
                [raw[0] * scale, raw[1] * scale, raw[2] * scale]
            } else {
                frac_to_cart(raw, &cell)
            };

            if selective && tokens.len() >= 6 && tokens[3..6].iter().all(|f| f.starts_with('F')) {
                fixed.insert(atoms.len());
            }

            atoms.push(Atom::new(*elem, position));
            line_idx += 1;
        }
    }

    let mut structure = AtomicStructure::new(name, cell, [true; 3], atoms);
    structure.fixed = fixed;

    Ok(structure)
}

/// 笛卡尔坐标转分数坐标
fn cart_to_frac(cart: [f64; 3], cell: &Cell) -> [f64; 3] {
    let m = cell.matrix;
    let det = cell.volume();

    if det.abs() < 1e-10 {
        return cart;
    }

    let inv = [
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
        ],
    ];

    // 行向量约定：cart = frac · M，因此 frac = cart · M⁻¹
    [
        cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
        cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
        cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
    ]
}

/// 分数坐标转笛卡尔坐标
fn frac_to_cart(frac: [f64; 3], cell: &Cell) -> [f64; 3] {
    let m = cell.matrix;
    [
        frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
        frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
        frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
    ]
}

/// 按原子顺序把元素分段：[(元素, 连续个数)]
fn element_runs(structure: &AtomicStructure) -> Vec<(&str, usize)> {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    for atom in &structure.atoms {
        match runs.last_mut() {
            Some((el, n)) if *el == atom.element => *n += 1,
            _ => runs.push((atom.element.as_str(), 1)),
        }
    }
    runs
}

/// 将结构转换为 POSCAR 格式字符串（保持原子顺序）
pub fn to_poscar_string(structure: &AtomicStructure) -> String {
    let runs = element_runs(structure);
    let selective = !structure.fixed.is_empty();

    let mut result = String::new();

    // Line 0: Comment
    result.push_str(&format!("{}\n", structure.name));

    // Line 1: Scale
    result.push_str("1.0\n");

    // Lines 2-4: Lattice
    for row in &structure.cell.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    // Lines 5-6: Elements and counts
    let elements: Vec<&str> = runs.iter().map(|(el, _)| *el).collect();
    let counts: Vec<String> = runs.iter().map(|(_, n)| n.to_string()).collect();
    result.push_str(&format!("   {}\n", elements.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));

    if selective {
        result.push_str("Selective dynamics\n");
    }

    // Coordinate type
    result.push_str("Direct\n");

    // Atom positions
    for (i, atom) in structure.atoms.iter().enumerate() {
        let f = cart_to_frac(atom.position, &structure.cell);
        result.push_str(&format!("  {:16.10}  {:16.10}  {:16.10}", f[0], f[1], f[2]));
        if selective {
            let flag = if structure.is_fixed(i) { "F" } else { "T" };
            result.push_str(&format!("   {flag}   {flag}   {flag}"));
        }
        result.push('\n');
    }

    result
}
