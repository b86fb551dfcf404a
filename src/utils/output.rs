//! # 美化输出工具
//!
//! 提供统一的终端输出样式和逐行 diff 打印。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 模块使用
//! - 使用 `colored` crate

use crate::models::FileJob;

use colored::Colorize;
use std::borrow::Cow;

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印一个文件的全部替换，按行号升序
pub fn print_diff(job: &FileJob) {
    for (line_num, replacement) in &job.replacements {
        println!("{}", diff_header(&job.display_path(), *line_num).bold());
        println!("{} {}", "+++".green(), display_line(&replacement.new).green());
        println!("{} {}", "---".red(), display_line(&replacement.original).red());
    }
}

fn diff_header(path: &str, line_num: usize) -> String {
    format!("@{} L{}", path, line_num)
}

/// 去掉行尾换行符后按 UTF-8 (lossy) 显示
fn display_line(line: &[u8]) -> Cow<'_, str> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}
