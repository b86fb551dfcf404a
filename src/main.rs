//! # sed - 字面字符串批量替换
//!
//! 对 glob 匹配到的每个文件逐行做字面子串替换，先写入同目录临时文件，
//! 全部文件成功后才原子地替换原文件；任何失败或中断都不会留下改动。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (不可变运行配置)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── batch/     (文件收集与并发执行)
//!   │           └── replacer/ (单文件事务)
//!   ├── models/     (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod replacer;
mod utils;

use clap::{CommandFactory, Parser};
use cli::Cli;
use config::Config;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = cli::normalize_args(std::env::args_os());

    // 无参数时打印用法并正常退出
    if args.len() <= 1 {
        Cli::command().print_help().ok();
        std::process::exit(0);
    }

    let cli = Cli::parse_from(args);

    if let Err(e) = commands::run(Config::from(cli)) {
        utils::output::print_error(&e.report());
        std::process::exit(e.exit_code());
    }
}
