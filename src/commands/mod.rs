//! # 命令执行模块
//!
//! 实现替换命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `config`, `batch/`, `utils/`
//! - 子模块: replace

pub mod replace;

use crate::config::Config;
use crate::error::Result;

/// 执行命令
pub fn run(config: Config) -> Result<()> {
    replace::execute(config)
}
