//! # 运行配置
//!
//! 由命令行参数一次性构造的不可变配置，按引用传入各执行模块。
//!
//! ## 依赖关系
//! - 由 `cli/mod.rs` 的 `Cli` 转换得到
//! - 被 `commands/` 和 `batch/runner.rs` 使用

use crate::cli::Cli;

/// 一次调用的全部配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 要查找的字面子串
    pub from: String,
    /// 替换为的字面子串
    pub to: String,
    /// glob 路径表达式
    pub pattern: String,
    /// 只打印 diff，不修改任何文件
    pub dry_run: bool,
    /// 并行作业数（0 = 自动）
    pub jobs: usize,
}

impl Config {
    /// 实际的线程池大小
    pub fn worker_threads(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            from: cli.from,
            to: cli.to,
            pattern: cli.path,
            dry_run: cli.dry_run,
            jobs: cli.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_threads_auto() {
        let mut config = Config {
            from: "a".into(),
            to: "b".into(),
            pattern: "*".into(),
            dry_run: false,
            jobs: 0,
        };
        assert!(config.worker_threads() >= 1);
        config.jobs = 3;
        assert_eq!(config.worker_threads(), 3);
    }
}
