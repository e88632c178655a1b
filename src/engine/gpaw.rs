//! # GPAW 引擎
//!
//! 通过 ASE + GPAW 的 Python 驱动脚本完成弛豫：
//!
//! ```text
//! <run_dir>/POSCAR      输入结构（Selective dynamics 表示固定原子）
//! <run_dir>/relax.py    生成的驱动脚本
//! <run_dir>/relax.log   引擎 stdout/stderr
//! <run_dir>/CONTCAR     弛豫后结构
//! <run_dir>/result.out  收敛标志、步数、能量、耗时
//! <run_dir>/<traj>      ASE 轨迹文件
//! ```
//!
//! ## 依赖关系
//! - 实现 `engine::Engine`
//! - 使用 `parsers/poscar.rs`, `parsers/relax_out.rs`

use super::{Engine, EngineOutput, RelaxJob};
use crate::error::{OerflowError, Result};
use crate::models::{AtomicStructure, CalculatorConfig};
use crate::parsers::{parse_poscar_file, parse_result_file, to_poscar_string};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const INPUT_FILE: &str = "POSCAR";
pub const OUTPUT_FILE: &str = "CONTCAR";
pub const SCRIPT_FILE: &str = "relax.py";
pub const LOG_FILE: &str = "relax.log";
pub const RESULT_FILE: &str = "result.out";

/// 失败时附带的日志行数
const STDERR_TAIL: usize = 20;

/// GPAW 引擎
#[derive(Debug, Clone)]
pub struct GpawEngine {
    /// Python 解释器 (python3, gpaw python, ...)
    pub python: String,
}

impl GpawEngine {
    pub fn new(python: impl Into<String>) -> Self {
        GpawEngine {
            python: python.into(),
        }
    }

    /// 执行脚本所用的命令行（供 sbatch 脚本使用）
    pub fn command_line(&self) -> String {
        format!("{} {}", self.python, SCRIPT_FILE)
    }
}

impl Default for GpawEngine {
    fn default() -> Self {
        GpawEngine::new("python3")
    }
}

fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// GPAW 构造参数
pub fn render_calculator(calc: &CalculatorConfig) -> String {
    let kpts = match calc.kpoints {
        Some(k) => format!(
            "kpts={{'size': ({}, {}, {}), 'gamma': {}}}, ",
            k.size[0],
            k.size[1],
            k.size[2],
            py_bool(k.gamma)
        ),
        None => String::new(),
    };

    format!(
        "GPAW(xc='{}', mode=PW({}), {}h={}, occupations=FermiDirac({}), txt='gpaw.txt')",
        calc.functional, calc.plane_wave_cutoff, kpts, calc.grid_spacing, calc.smearing_width
    )
}

/// 生成驱动脚本
pub fn render_script(job: &RelaxJob) -> String {
    let pbc = job.structure.pbc;
    let steps = job
        .max_steps
        .map(|n| format!(", steps={}", n))
        .unwrap_or_default();

    format!(
        r#"#!/usr/bin/env python3
# oerflow relaxation driver: {block}
import time

from ase.io import read, write
from ase.optimize import {optimizer}
from gpaw import GPAW, PW, FermiDirac

atoms = read('{input}', format='vasp')
atoms.pbc = ({px}, {py}, {pz})
atoms.calc = {calculator}

dyn = {optimizer}(atoms, trajectory='{trajectory}', logfile='opt.log')
t = time.time()
dyn.run(fmax={fmax}{steps})
elapsed = time.time() - t

energy = atoms.get_potential_energy()
forces = atoms.get_forces()
fmax_now = ((forces ** 2).sum(axis=1).max()) ** 0.5 if len(atoms) else 0.0
converged = bool(fmax_now < {fmax})

write('{output}', atoms, format='vasp', direct=True)
with open('{result}', 'w') as fh:
    fh.write('Optimization converged = %s\n' % converged)
    fh.write('Optimizer steps = %d\n' % dyn.get_number_of_steps())
    fh.write('Final energy = %.10f eV\n' % energy)
    fh.write('Wall time = %.3f s\n' % elapsed)

print('Final energy = %.10f eV' % energy)
"#,
        block = job.block,
        optimizer = job.optimizer.class_name(),
        input = INPUT_FILE,
        px = py_bool(pbc[0]),
        py = py_bool(pbc[1]),
        pz = py_bool(pbc[2]),
        calculator = render_calculator(&job.calculator),
        trajectory = job.trajectory,
        fmax = job.fmax,
        steps = steps,
        output = OUTPUT_FILE,
        result = RESULT_FILE,
    )
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| OerflowError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

impl Engine for GpawEngine {
    fn name(&self) -> &str {
        "GPAW"
    }

    fn prepare(&self, job: &RelaxJob, run_dir: &Path) -> Result<PathBuf> {
        let n = job.structure.len();
        if let Some(&bad) = job.structure.fixed.iter().find(|&&i| i >= n) {
            return Err(OerflowError::InvalidArgument(format!(
                "fixed atom index {} out of range for '{}' ({} atoms)",
                bad, job.structure.name, n
            )));
        }

        fs::create_dir_all(run_dir).map_err(|e| OerflowError::FileWriteError {
            path: run_dir.display().to_string(),
            source: e,
        })?;

        write_file(&run_dir.join(INPUT_FILE), &to_poscar_string(&job.structure))?;

        let script = run_dir.join(SCRIPT_FILE);
        write_file(&script, &render_script(job))?;

        Ok(script)
    }

    fn execute(&self, script: &Path, run_dir: &Path) -> Result<()> {
        let script_name = script
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| script.as_os_str().to_os_string());

        let mut parts = self.python.split_whitespace();
        let program = parts.next().unwrap_or("python3");

        let out = Command::new(program)
            .args(parts)
            .arg(&script_name)
            .current_dir(run_dir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OerflowError::CommandNotFound {
                    command: program.to_string(),
                },
                _ => OerflowError::CommandFailed {
                    command: self.command_line(),
                    stderr: e.to_string(),
                },
            })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);
        write_file(&run_dir.join(LOG_FILE), &format!("{}{}", stdout, stderr))?;

        if out.status.success() {
            Ok(())
        } else {
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL)..].join("\n");
            Err(OerflowError::CommandFailed {
                command: format!("{} (in {})", self.command_line(), run_dir.display()),
                stderr: tail,
            })
        }
    }

    fn read_output(&self, input: &AtomicStructure, run_dir: &Path) -> Result<EngineOutput> {
        let result_path = run_dir.join(RESULT_FILE);
        if !result_path.exists() {
            return Err(OerflowError::FileNotFound {
                path: result_path.display().to_string(),
            });
        }
        let summary = parse_result_file(&result_path)?;

        let relaxed = parse_poscar_file(&self.output_path(run_dir))?;
        let structure = input.with_relaxed(&relaxed)?;

        Ok(EngineOutput {
            structure,
            energy_ev: summary.energy_ev.unwrap_or(f64::NAN),
            converged: summary.converged.unwrap_or(false),
            steps: summary.steps,
            wall_time_s: summary.wall_time_s,
        })
    }

    fn input_path(&self, run_dir: &Path) -> PathBuf {
        run_dir.join(INPUT_FILE)
    }

    fn output_path(&self, run_dir: &Path) -> PathBuf {
        run_dir.join(OUTPUT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Optimizer;
    use crate::geometry::{Adsorbate, Molecule, SlabBuilder};
    use crate::models::KPointMesh;

    fn job(structure: AtomicStructure, calculator: CalculatorConfig) -> RelaxJob {
        RelaxJob {
            block: "oh".to_string(),
            structure,
            calculator,
            optimizer: Optimizer::QuasiNewton,
            fmax: 0.05,
            max_steps: None,
            trajectory: "OH_Ni.traj".to_string(),
        }
    }

    #[test]
    fn test_render_periodic_calculator() {
        let calc = CalculatorConfig::default();
        assert_eq!(
            render_calculator(&calc),
            "GPAW(xc='RPBE', mode=PW(350), kpts={'size': (4, 4, 1), 'gamma': True}, \
             h=0.2, occupations=FermiDirac(0.1), txt='gpaw.txt')"
        );
    }

    #[test]
    fn test_render_molecule_calculator_has_no_kpoints() {
        let calc = CalculatorConfig::periodic(
            "PBE",
            500.0,
            KPointMesh {
                size: [2, 2, 1],
                gamma: false,
            },
            0.18,
            0.05,
        )
        .without_kpoints();
        let text = render_calculator(&calc);

        assert!(!text.contains("kpts"));
        assert!(text.contains("xc='PBE'"));
        assert!(text.contains("PW(500)"));
    }

    #[test]
    fn test_render_script() {
        let b = SlabBuilder::new("Ni", 3.52, [2, 2, 2]);
        let mut j = job(b.slab_with(Adsorbate::Hydroxyl).unwrap(), CalculatorConfig::default());
        j.optimizer = Optimizer::Bfgs;
        j.max_steps = Some(200);
        let script = render_script(&j);

        assert!(script.contains("from ase.optimize import BFGS"));
        assert!(script.contains("dyn = BFGS(atoms, trajectory='OH_Ni.traj'"));
        assert!(script.contains("dyn.run(fmax=0.05, steps=200)"));
        assert!(script.contains("atoms.pbc = (True, True, False)"));
        assert!(script.contains("fh.write('Final energy = %.10f eV\\n' % energy)"));
    }

    #[test]
    fn test_prepare_writes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("h2o");
        let b = SlabBuilder::new("Ni", 3.52, [2, 2, 2]);
        let j = job(
            b.isolated(Molecule::Water).unwrap(),
            CalculatorConfig::default().without_kpoints(),
        );

        let script = GpawEngine::new("python3").prepare(&j, &run_dir).unwrap();

        assert_eq!(script, run_dir.join(SCRIPT_FILE));
        let poscar = fs::read_to_string(run_dir.join(INPUT_FILE)).unwrap();
        assert!(poscar.starts_with("H2O\n"));
        let text = fs::read_to_string(&script).unwrap();
        assert!(text.contains("atoms.pbc = (False, False, False)"));
        assert!(!text.contains("kpts"));
    }

    #[test]
    fn test_prepare_rejects_out_of_range_constraint() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = SlabBuilder::new("Ni", 3.52, [2, 2, 2]).bare_slab().unwrap();
        s.fixed.insert(99);

        let err = GpawEngine::new("python3")
            .prepare(&job(s, CalculatorConfig::default()), dir.path())
            .unwrap_err();
        assert!(matches!(err, OerflowError::InvalidArgument(_)));
    }

    #[test]
    fn test_read_output_merges_labels() {
        let dir = tempfile::tempdir().unwrap();
        let b = SlabBuilder::new("Ni", 3.52, [2, 2, 2]);
        let j = job(b.slab_with(Adsorbate::Hydroxyl).unwrap(), CalculatorConfig::default());

        fs::write(dir.path().join(OUTPUT_FILE), to_poscar_string(&j.structure)).unwrap();
        fs::write(
            dir.path().join(RESULT_FILE),
            "Optimization converged = True\nOptimizer steps = 4\nFinal energy = -42.5 eV\n",
        )
        .unwrap();

        let out = GpawEngine::new("python3")
            .read_output(&j.structure, dir.path())
            .unwrap();
        assert!(out.converged);
        assert_eq!(out.steps, Some(4));
        assert_eq!(out.energy_ev, -42.5);
        assert!(out.structure.site("anchor").is_ok());
    }

    #[test]
    fn test_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let engine = GpawEngine::new("definitely-not-a-python-binary");
        let err = engine
            .execute(&dir.path().join(SCRIPT_FILE), dir.path())
            .unwrap_err();
        assert!(matches!(err, OerflowError::CommandNotFound { .. }));
    }
}
