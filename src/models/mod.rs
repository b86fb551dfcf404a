//! # 数据模型模块
//!
//! 定义单文件替换任务及其替换记录。
//!
//! ## 依赖关系
//! - 被 `replacer/`, `batch/` 和 `utils/output.rs` 使用
//! - 子模块: job

pub mod job;

pub use job::{FileJob, Replacement, Replacements};
