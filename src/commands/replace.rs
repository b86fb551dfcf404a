//! # replace 命令实现
//!
//! 展开 glob、安装中断处理、执行批次并打印汇总。
//!
//! ## 依赖关系
//! - 使用 `batch/` 的收集器和执行器
//! - 使用 `utils/output.rs`
//! - 使用 `ctrlc` 将 SIGINT / SIGTERM 投递到批次事件通道

use crate::batch::{BatchEvent, BatchRunner, FileCollector};
use crate::config::Config;
use crate::error::Result;
use crate::utils::output;

use std::sync::mpsc;

/// 执行 replace 命令
pub fn execute(config: Config) -> Result<()> {
    let files = FileCollector::new(config.pattern.as_str()).collect()?;

    // 没有匹配文件：静默成功
    if files.is_empty() {
        return Ok(());
    }

    let runner = BatchRunner::new(&config)?;

    let (tx, rx) = mpsc::channel();
    let interrupt = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(BatchEvent::Interrupted);
    })?;

    let report = runner.run(files, tx, rx)?;

    if config.dry_run {
        output::print_info("Dry run, no files were modified");
    }
    output::print_done(&format!(
        "Replaced {} line(s) in {} of {} file(s)",
        report.lines, report.changed_files, report.files
    ));

    Ok(())
}
