//! # 实验计划
//!
//! 六个计算块（裸表面、+OH、+O、+OOH、H2O、H2）统一由 [`Block`] 描述：
//! 结构如何构建、用哪类计算器、轨迹文件名、需要报告的键。
//!
//! ## 依赖关系
//! - 被 `workflow/runner.rs`, `commands/` 使用
//! - 使用 `geometry/`, `engine/`, `models/`

use crate::engine::{Optimizer, RelaxJob};
use crate::error::Result;
use crate::geometry::{Adsorbate, Molecule, SlabBuilder, ANCHOR, BINDING_SITE, DISTAL, HYDROGEN};
use crate::models::{AtomicStructure, CalculatorConfig};
use clap::ValueEnum;

/// 计算块，按执行顺序排列
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    /// Bare slab
    #[value(name = "slab")]
    Slab,
    /// Slab with adsorbed OH
    #[value(name = "oh")]
    Oh,
    /// Slab with adsorbed O
    #[value(name = "o")]
    O,
    /// Slab with adsorbed OOH
    #[value(name = "ooh")]
    Ooh,
    /// Isolated water molecule
    #[value(name = "h2o")]
    H2o,
    /// Isolated hydrogen molecule
    #[value(name = "h2")]
    H2,
}

/// 需要报告的键：显示名 + 两端位点标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub name: String,
    pub a: &'static str,
    pub b: &'static str,
}

impl Bond {
    fn new(name: impl Into<String>, a: &'static str, b: &'static str) -> Self {
        Bond {
            name: name.into(),
            a,
            b,
        }
    }
}

impl Block {
    pub const ALL: [Block; 6] = [
        Block::Slab,
        Block::Oh,
        Block::O,
        Block::Ooh,
        Block::H2o,
        Block::H2,
    ];

    /// 运行目录名
    pub fn slug(&self) -> &'static str {
        match self {
            Block::Slab => "slab",
            Block::Oh => "oh",
            Block::O => "o",
            Block::Ooh => "ooh",
            Block::H2o => "h2o",
            Block::H2 => "h2",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Block> {
        Block::ALL.into_iter().find(|b| b.slug() == slug)
    }

    fn adsorbate(&self) -> Option<Adsorbate> {
        match self {
            Block::Oh => Some(Adsorbate::Hydroxyl),
            Block::O => Some(Adsorbate::Oxygen),
            Block::Ooh => Some(Adsorbate::Hydroperoxyl),
            _ => None,
        }
    }

    fn molecule(&self) -> Option<Molecule> {
        match self {
            Block::H2o => Some(Molecule::Water),
            Block::H2 => Some(Molecule::Hydrogen),
            _ => None,
        }
    }

    /// 是否为孤立分子（不需要 k 点）
    pub fn is_isolated(&self) -> bool {
        self.molecule().is_some()
    }

    /// 显示名，如 "OH on Ni(111)"
    pub fn title(&self, element: &str) -> String {
        match (self.adsorbate(), self.molecule()) {
            (Some(ads), _) => format!("{} on {}(111)", ads.formula(), element),
            (_, Some(mol)) => mol.formula().to_string(),
            _ => format!("{}(111)", element),
        }
    }

    /// 轨迹文件名，如 OH_Ni.traj
    pub fn trajectory(&self, element: &str) -> String {
        match (self.adsorbate(), self.molecule()) {
            (Some(ads), _) => format!("{}_{}.traj", ads.formula(), element),
            (_, Some(mol)) => format!("{}.traj", mol.formula()),
            _ => format!("{}.traj", element),
        }
    }

    /// 需要报告的键长
    pub fn bonds(&self, element: &str) -> Vec<Bond> {
        match self {
            Block::Slab => vec![],
            Block::Oh => vec![
                Bond::new(format!("{}-O", element), BINDING_SITE, ANCHOR),
                Bond::new("O-H", ANCHOR, HYDROGEN),
            ],
            Block::O => vec![Bond::new(format!("{}-O", element), BINDING_SITE, ANCHOR)],
            Block::Ooh => vec![
                Bond::new(format!("{}-O", element), BINDING_SITE, ANCHOR),
                Bond::new("O-O", ANCHOR, DISTAL),
                Bond::new("O-H", DISTAL, HYDROGEN),
            ],
            Block::H2o => vec![Bond::new("O-H", "O", "H1")],
            Block::H2 => vec![Bond::new("H-H", "H1", "H2")],
        }
    }

    /// 构建该块的输入结构
    pub fn build(&self, builder: &SlabBuilder) -> Result<AtomicStructure> {
        match (self.adsorbate(), self.molecule()) {
            (Some(ads), _) => builder.slab_with(ads),
            (_, Some(mol)) => builder.isolated(mol),
            _ => builder.bare_slab(),
        }
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// 完整实验计划
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub builder: SlabBuilder,
    /// 表面体系的计算器参数；分子体系由此派生
    pub calculator: CalculatorConfig,
    pub optimizer: Optimizer,
    pub fmax: f64,
    pub max_steps: Option<usize>,
    blocks: Vec<Block>,
}

impl ExperimentPlan {
    pub fn new(builder: SlabBuilder, calculator: CalculatorConfig) -> Self {
        ExperimentPlan {
            builder,
            calculator,
            optimizer: Optimizer::QuasiNewton,
            fmax: 0.05,
            max_steps: None,
            blocks: Block::ALL.to_vec(),
        }
    }

    /// 只运行部分块；顺序始终按 [`Block::ALL`]
    pub fn with_blocks(mut self, blocks: &[Block]) -> Self {
        if !blocks.is_empty() {
            let mut selected = blocks.to_vec();
            selected.sort();
            selected.dedup();
            self.blocks = selected;
        }
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn element(&self) -> &str {
        &self.builder.element
    }

    /// 每次调用都返回新的计算器配置
    pub fn calculator_for(&self, block: Block) -> CalculatorConfig {
        if block.is_isolated() {
            self.calculator.without_kpoints()
        } else {
            self.calculator.clone()
        }
    }

    /// 生成弛豫任务
    pub fn job(&self, block: Block) -> Result<RelaxJob> {
        Ok(RelaxJob {
            block: block.slug().to_string(),
            structure: block.build(&self.builder)?,
            calculator: self.calculator_for(block),
            optimizer: self.optimizer,
            fmax: self.fmax,
            max_steps: self.max_steps,
            trajectory: block.trajectory(self.element()),
        })
    }
}
