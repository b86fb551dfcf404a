//! # 文件任务数据模型
//!
//! 一个 `FileJob` 对应一个被替换的文件，记录临时文件路径和逐行替换结果。
//!
//! ## 依赖关系
//! - 被 `replacer/` 填充和收尾
//! - 被 `batch/runner.rs` 创建和调度
//! - 被 `utils/output.rs` 读取以打印 diff

use std::collections::BTreeMap;
use std::path::PathBuf;

/// 单行替换记录（均包含原始行尾字节）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// 原始行内容
    pub original: Vec<u8>,
    /// 替换后的行内容
    pub new: Vec<u8>,
}

/// 行号 (1-based) -> 替换记录，按行号有序
pub type Replacements = BTreeMap<usize, Replacement>;

/// 单文件替换任务
#[derive(Debug)]
pub struct FileJob {
    /// 原始文件路径
    pub file_path: PathBuf,

    /// 临时文件路径，事务开始前为 `None`
    pub temp_path: Option<PathBuf>,

    /// 发生替换的行
    pub replacements: Replacements,

    dry_run: bool,
}

impl FileJob {
    pub fn new(file_path: impl Into<PathBuf>, dry_run: bool) -> Self {
        FileJob {
            file_path: file_path.into(),
            temp_path: None,
            replacements: Replacements::new(),
            dry_run,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// 是否有任何行被替换
    pub fn has_changes(&self) -> bool {
        !self.replacements.is_empty()
    }

    pub fn display_path(&self) -> String {
        self.file_path.display().to_string()
    }
}
