//! # 统一错误处理模块
//!
//! 定义 sed 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// sed 统一错误类型
#[derive(Error, Debug)]
pub enum SedError {
    // ─────────────────────────────────────────────────────────────
    // 匹配错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Search string rejected")]
    InvalidSearch(#[from] regex::Error),

    // ─────────────────────────────────────────────────────────────
    // 单文件事务错误（对整个批次致命）
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to open file: {path}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create temp file: {path}")]
    TempCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O failure while rewriting: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to finalize: {path}")]
    Finalize {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 批次控制
    // ─────────────────────────────────────────────────────────────
    #[error("Interrupted, all temp files removed")]
    Interrupted,

    #[error("Batch already torn down, refusing to create temp file for: {path}")]
    BatchAborted { path: String },

    #[error("A worker exited without reporting a result")]
    WorkerLost,

    #[error("Failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to install signal handler")]
    SignalHandler(#[from] ctrlc::Error),
}

impl SedError {
    /// 进程退出码：中断为 130，其余为 1
    pub fn exit_code(&self) -> i32 {
        match self {
            SedError::Interrupted => 130,
            _ => 1,
        }
    }

    /// 包含所有 source 的单行错误描述
    pub fn report(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        msg
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SedError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_report_includes_source() {
        let err = SedError::FileOpen {
            path: "a.txt".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.report(), "Failed to open file: a.txt: no such file");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_interrupt_exit_code() {
        assert_eq!(SedError::Interrupted.exit_code(), 130);
    }
}
