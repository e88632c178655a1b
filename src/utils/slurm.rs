//! # Slurm 脚本生成工具
//!
//! 为每个计算块生成 sbatch 提交脚本。
//!
//! ## 依赖关系
//! - 被 `commands/prepare.rs` 使用
//! - 无外部模块依赖

use std::path::Path;

/// Slurm 作业配置
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub job_name: String,
    pub partition: String,
    pub constraint: Option<String>,
    pub nodes: u32,
    pub ntasks: u32,
    pub cpus_per_task: u32,
    pub mem_per_cpu: String,
    pub time_limit: String,
    pub modules: Vec<String>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        SlurmConfig {
            job_name: "oer".to_string(),
            partition: "compute".to_string(),
            constraint: None,
            nodes: 1,
            ntasks: 32,
            cpus_per_task: 1,
            mem_per_cpu: "3G".to_string(),
            time_limit: "24:00:00".to_string(),
            modules: vec![],
        }
    }
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &SlurmConfig, workdir: &Path, exec_cmd: &str) -> String {
    let module_loads = if config.modules.is_empty() {
        String::new()
    } else {
        let loads = config
            .modules
            .iter()
            .map(|m| format!("module load {}", m))
            .collect::<Vec<_>>()
            .join("\n");
        format!("module purge 2>&1\n{}\necho \"Loaded modules\"\n", loads)
    };

    let constraint = config
        .constraint
        .as_ref()
        .map(|c| format!("#SBATCH --constraint \"{}\"\n", c))
        .unwrap_or_default();

    format!(
        r#"#!/bin/bash
{}#SBATCH --partition {}
#SBATCH --nodes={}
#SBATCH --mem-per-cpu {}
#SBATCH --time {}
#SBATCH -c {}
#SBATCH -n {}
#SBATCH -J {}
#SBATCH -o slurm_logs/%x.out
#SBATCH -e slurm_logs/%x.err

set -euo pipefail

{}
cd "{}"
echo "PWD=$(pwd)"
echo "Running: {}"
{}

echo "Timings:"
sacct -o JobID,Submit,Start,End,CPUTime,State -j $SLURM_JOBID
"#,
        constraint,
        config.partition,
        config.nodes,
        config.mem_per_cpu,
        config.time_limit,
        config.cpus_per_task,
        config.ntasks,
        config.job_name,
        module_loads,
        workdir.display(),
        exec_cmd,
        exec_cmd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbatch_script_contents() {
        let config = SlurmConfig {
            job_name: "oer-ooh".to_string(),
            modules: vec!["gpaw/24.6".to_string()],
            constraint: Some("zen3".to_string()),
            ..SlurmConfig::default()
        };
        let script = generate_sbatch_script(&config, Path::new("/scratch/jobs/ooh"), "mpirun -np 32 python3 relax.py");

        assert!(script.starts_with("#!/bin/bash\n#SBATCH --constraint \"zen3\"\n"));
        assert!(script.contains("#SBATCH -J oer-ooh"));
        assert!(script.contains("module load gpaw/24.6"));
        assert!(script.contains("cd \"/scratch/jobs/ooh\""));
        assert!(script.contains("\nmpirun -np 32 python3 relax.py\n"));
    }

    #[test]
    fn test_sbatch_without_modules_or_constraint() {
        let script = generate_sbatch_script(
            &SlurmConfig::default(),
            Path::new("/scratch/jobs/h2"),
            "python3 relax.py",
        );

        assert!(!script.contains("module"));
        assert!(script.contains("cd \"/scratch/jobs/h2\""));
        assert!(!script.contains("--constraint"));
        assert!(script.contains("#SBATCH --partition compute"));
    }
}
