//! # 文件收集器
//!
//! 将 glob 路径表达式展开为待处理的普通文件列表。
//!
//! ## 功能
//! - shell 风格通配符 (`*`, `?`, `[...]`)
//! - 目录静默排除
//! - 保持 `glob` 的匹配顺序，不重新排序
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `glob` crate

use crate::error::{Result, SedError};
use crate::utils::output;

use std::fs;
use std::path::PathBuf;

/// 文件收集器
pub struct FileCollector {
    /// glob 路径表达式
    pattern: String,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// 收集所有匹配的普通文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let paths = glob::glob(&self.pattern).map_err(|e| SedError::InvalidPattern {
            pattern: self.pattern.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    output::print_warning(&format!("Skipping unreadable entry: {}", e));
                    continue;
                }
            };

            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => files.push(path),
                Err(e) => {
                    output::print_warning(&format!("Skipping {}: {}", path.display(), e));
                }
            }
        }

        Ok(files)
    }
}
