//! # 替换器模块
//!
//! 单文件的"扫描-替换-交换"事务。
//!
//! ## 流程
//! 1. 只读打开原文件
//! 2. 在同一目录创建唯一命名的临时文件（保证 rename 为同文件系统原子操作）
//! 3. 逐行扫描，字面替换并记录发生替换的行
//! 4. 立即收尾（单阶段）或交由调用者收尾（两阶段）
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `models/job.rs`
//! - 子模块: pattern, transaction

pub mod pattern;
pub mod transaction;

pub use pattern::LiteralPattern;
pub use transaction::{create_temp_file, remove_temp};
