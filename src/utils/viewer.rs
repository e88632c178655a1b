//! # 结构查看器
//!
//! 构建或优化结束后，用外部查看器（如 `ase gui`）打开结构文件。
//! 查看器在后台启动，主流程不等待；后台线程回收退出的进程。启动失败只给出警告。
//!
//! ## 依赖关系
//! - 被 `workflow/runner.rs`, `commands/build.rs` 使用
//! - 使用 `utils/output.rs`

use crate::utils::output;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// 外部查看器命令
#[derive(Debug, Clone)]
pub struct Viewer {
    program: String,
    args: Vec<String>,
}

impl Viewer {
    /// 从命令行字符串创建，如 "ase gui"；空字符串返回 None
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Viewer {
            program,
            args: parts.collect(),
        })
    }

    /// 打开结构文件
    pub fn show(&self, path: &Path) {
        self.spawn(path);
    }

    /// 启动查看器，并由后台线程等待其退出，避免留下僵尸进程
    fn spawn(&self, path: &Path) -> Option<JoinHandle<Option<ExitStatus>>> {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => Some(thread::spawn(move || child.wait().ok())),
            Err(e) => {
                output::print_warning(&format!(
                    "Failed to open viewer '{}' for {}: {}",
                    self.program,
                    path.display(),
                    e
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewer_command() {
        let v = Viewer::parse("ase gui --repeat 2,2,1").unwrap();
        assert_eq!(v.program, "ase");
        assert_eq!(v.args, ["gui", "--repeat", "2,2,1"]);

        assert!(Viewer::parse("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_viewer_process_is_reaped() {
        let viewer = Viewer::parse("true").unwrap();
        let handle = viewer.spawn(Path::new("POSCAR")).unwrap();
        let status = handle.join().unwrap();
        assert!(status.unwrap().success());
    }

    #[test]
    fn test_missing_viewer_only_warns() {
        let viewer = Viewer::parse("oerflow-no-such-viewer").unwrap();
        assert!(viewer.spawn(Path::new("POSCAR")).is_none());
    }
}
