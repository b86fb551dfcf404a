//! # 批量处理模块
//!
//! 将一次调用匹配到的所有文件作为一个 all-or-nothing 批次处理。
//!
//! ## 功能
//! - glob 展开收集待处理文件列表
//! - 每文件一个并发任务
//! - 失败或中断时清理全部临时文件
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchEvent, BatchReport, BatchRunner};
