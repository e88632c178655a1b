//! # oerflow - fcc(111) 表面 OER 自由能计算流程
//!
//! 构建表面与吸附物模型，交给外部 DFT 引擎（GPAW/ASE）弛豫，
//! 报告能量与键长，并用计算氢电极模型推导 OER 自由能台阶。
//!
//! ## 子命令
//! - `build`       - 构建结构并写出 POSCAR
//! - `run`         - 在本机顺序运行全部计算块
//! - `prepare`     - 生成作业目录与 sbatch 脚本
//! - `collect`     - 收集已完成的计算结果
//! - `free-energy` - 计算 OER 自由能台阶
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── workflow/  (计划、执行、报告)
//!   │     ├── thermo/    (自由能)
//!   │     ├── engine/    (外部 DFT 引擎)
//!   │     ├── geometry/  (结构构建)
//!   │     ├── parsers/   (格式读写)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod engine;
mod error;
mod geometry;
mod models;
mod parsers;
mod thermo;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
