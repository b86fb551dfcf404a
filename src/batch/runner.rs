//! # 批量执行器
//!
//! 每个文件一个并发任务，全部成功才提交（all-or-nothing）。
//!
//! ## 功能
//! - 基于 rayon 线程池的并发替换（两阶段，只生成临时文件）
//! - 单一事件通道汇集 完成 / 失败 / 中断 事件，先到先得
//! - 成功事件到达即打印 diff
//! - 任一失败或中断：删除所有已登记的临时文件后返回错误
//! - 全部成功：逐个收尾（提交或丢弃临时文件）
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `replacer/` 执行单文件事务
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::config::Config;
use crate::error::{Result, SedError};
use crate::models::FileJob;
use crate::replacer::{self, LiteralPattern};
use crate::utils::{output, progress};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// 事件循环消费的事件
#[derive(Debug)]
pub enum BatchEvent {
    /// 某文件扫描完成，临时文件待收尾
    Completed(FileJob),
    /// 某文件事务失败
    Failed(SedError),
    /// 外部中断 (SIGINT / SIGTERM)
    Interrupted,
}

/// 批量处理结果统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// 处理的文件数
    pub files: usize,
    /// 有替换发生的文件数
    pub changed_files: usize,
    /// 替换的总行数
    pub lines: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    torn_down: bool,
    paths: Vec<PathBuf>,
}

/// 临时文件登记表
///
/// 任务在创建临时文件的同时登记路径，清理时无需等待任务上报即可覆盖所有
/// 进行中的任务。拆除后拒绝任何新的临时文件。
#[derive(Debug, Default)]
pub struct TempRegistry {
    state: Mutex<RegistryState>,
}

impl TempRegistry {
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 创建并登记临时文件
    pub fn create(&self, path: &Path) -> Result<File> {
        let mut state = self.lock();
        if state.torn_down {
            return Err(SedError::BatchAborted {
                path: path.display().to_string(),
            });
        }
        let file = replacer::create_temp_file(path)?;
        state.paths.push(path.to_path_buf());
        Ok(file)
    }

    /// 删除所有已登记的临时文件并关闭登记表
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.torn_down = true;
        for path in state.paths.drain(..) {
            if let Err(e) = replacer::remove_temp(&path) {
                output::print_warning(&format!(
                    "Failed to remove temp file {}: {}",
                    path.display(),
                    e
                ));
            }
        }
    }
}

/// 批量执行器
pub struct BatchRunner {
    pattern: Arc<LiteralPattern>,
    dry_run: bool,
    /// 线程池大小
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pattern: Arc::new(LiteralPattern::new(&config.from, &config.to)?),
            dry_run: config.dry_run,
            jobs: config.worker_threads(),
        })
    }

    /// 处理整个批次
    ///
    /// `tx` / `rx` 为同一事件通道的两端；调用者可以持有 `tx` 的克隆来投递
    /// [`BatchEvent::Interrupted`]。
    pub fn run(
        &self,
        files: Vec<PathBuf>,
        tx: Sender<BatchEvent>,
        rx: Receiver<BatchEvent>,
    ) -> Result<BatchReport> {
        let total = files.len();
        if total == 0 {
            return Ok(BatchReport::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()?;
        let registry = Arc::new(TempRegistry::default());

        for path in files {
            let mut job = FileJob::new(path, self.dry_run);
            let tx = tx.clone();
            let pattern = Arc::clone(&self.pattern);
            let registry = Arc::clone(&registry);

            pool.spawn(move || {
                let event = match job.transform_with(&pattern, false, |p| registry.create(p)) {
                    Ok(()) => BatchEvent::Completed(job),
                    Err(e) => BatchEvent::Failed(e),
                };
                // 接收端已关闭说明批次已放弃，临时文件由登记表负责
                let _ = tx.send(event);
            });
        }
        drop(tx);

        let mut ready = self.drain(&rx, total, &registry)?;
        self.finalize_all(&mut ready, &registry)?;

        Ok(BatchReport {
            files: ready.len(),
            changed_files: ready.iter().filter(|j| j.has_changes()).count(),
            lines: ready.iter().map(|j| j.replacements.len()).sum(),
        })
    }

    /// 事件循环：直到全部完成、首个失败或中断
    fn drain(
        &self,
        rx: &Receiver<BatchEvent>,
        total: usize,
        registry: &TempRegistry,
    ) -> Result<Vec<FileJob>> {
        let pb = progress::create_progress_bar(total as u64, "Replacing");
        let mut ready = Vec::with_capacity(total);

        while ready.len() < total {
            let event = match rx.recv() {
                Ok(event) => event,
                Err(_) => {
                    pb.finish_and_clear();
                    registry.teardown();
                    return Err(SedError::WorkerLost);
                }
            };

            match event {
                BatchEvent::Completed(job) => {
                    pb.suspend(|| output::print_diff(&job));
                    pb.inc(1);
                    ready.push(job);
                }
                BatchEvent::Failed(e) => {
                    pb.finish_and_clear();
                    registry.teardown();
                    return Err(e);
                }
                BatchEvent::Interrupted => {
                    pb.finish_and_clear();
                    registry.teardown();
                    return Err(SedError::Interrupted);
                }
            }
        }

        pb.finish_and_clear();
        Ok(ready)
    }

    /// 收尾所有任务；出错时仍继续处理其余任务，返回第一个错误
    fn finalize_all(&self, ready: &mut [FileJob], registry: &TempRegistry) -> Result<()> {
        let mut first_err = None;
        for job in ready.iter_mut() {
            if let Err(e) = job.finalize() {
                output::print_error(&e.to_string());
                first_err.get_or_insert(e);
            }
        }
        registry.teardown();

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;

    fn config(from: &str, to: &str, dry_run: bool) -> Config {
        Config {
            from: from.to_string(),
            to: to.to_string(),
            pattern: String::new(),
            dry_run,
            jobs: 4,
        }
    }

    fn run_batch(cfg: &Config, files: Vec<PathBuf>) -> Result<BatchReport> {
        let (tx, rx) = mpsc::channel();
        BatchRunner::new(cfg).unwrap().run(files, tx, rx)
    }

    fn leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".sed-"))
            .count()
    }

    fn write_files(dir: &Path, n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| {
                let path = dir.join(format!("f{:03}.txt", i));
                fs::write(&path, format!("foo {}\nbar\nfoo foo {}\n", i, i)).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_run_empty_batch() {
        let report = run_batch(&config("a", "b", false), vec![]).unwrap();
        assert_eq!(report, BatchReport::default());
    }

    #[test]
    fn test_run_many_files_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 60);

        let report = run_batch(&config("foo", "qux", false), files.clone()).unwrap();

        assert_eq!(report.files, 60);
        assert_eq!(report.changed_files, 60);
        assert_eq!(report.lines, 120);
        for (i, path) in files.iter().enumerate() {
            assert_eq!(
                fs::read_to_string(path).unwrap(),
                format!("qux {}\nbar\nqux qux {}\n", i, i)
            );
        }
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[test]
    fn test_run_dry_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 5);

        let report = run_batch(&config("foo", "qux", true), files.clone()).unwrap();

        assert_eq!(report.lines, 10);
        for (i, path) in files.iter().enumerate() {
            assert_eq!(
                fs::read_to_string(path).unwrap(),
                format!("foo {}\nbar\nfoo foo {}\n", i, i)
            );
        }
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[test]
    fn test_run_failure_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path(), 8);
        files.insert(3, dir.path().join("vanished.txt"));

        let err = run_batch(&config("foo", "qux", false), files.clone()).unwrap_err();

        assert!(matches!(err, SedError::FileOpen { .. }));
        for (i, path) in files.iter().filter(|p| p.exists()).enumerate() {
            assert_eq!(
                fs::read_to_string(path).unwrap(),
                format!("foo {}\nbar\nfoo foo {}\n", i, i)
            );
        }
        // 失败后仍在运行的任务不能再创建临时文件
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[test]
    fn test_interrupt_after_first_completion_cleans_everything() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 3);
        let cfg = config("foo", "qux", false);
        let runner = BatchRunner::new(&cfg).unwrap();
        let registry = TempRegistry::default();
        let (tx, rx) = mpsc::channel();

        // 任务 1 完成并上报；任务 2 已创建临时文件但尚未上报；任务 3 未开始
        let mut first = FileJob::new(&files[0], false);
        first
            .transform_with(&runner.pattern, false, |p| registry.create(p))
            .unwrap();
        let mut second = FileJob::new(&files[1], false);
        second
            .transform_with(&runner.pattern, false, |p| registry.create(p))
            .unwrap();
        assert_eq!(leftovers(dir.path()), 2);

        tx.send(BatchEvent::Completed(first)).unwrap();
        tx.send(BatchEvent::Interrupted).unwrap();

        let err = runner.drain(&rx, 3, &registry).unwrap_err();

        assert!(matches!(err, SedError::Interrupted));
        assert_eq!(err.exit_code(), 130);
        assert_eq!(leftovers(dir.path()), 0);
        for (i, path) in files.iter().enumerate() {
            assert_eq!(
                fs::read_to_string(path).unwrap(),
                format!("foo {}\nbar\nfoo foo {}\n", i, i)
            );
        }

        let mut third = FileJob::new(&files[2], false);
        let late = third.transform_with(&runner.pattern, false, |p| registry.create(p));
        assert!(matches!(late, Err(SedError::BatchAborted { .. })));
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[test]
    fn test_run_interrupted_through_sender_clone() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 20);
        let runner = BatchRunner::new(&config("foo", "qux", false)).unwrap();
        let (tx, rx) = mpsc::channel();

        // 与信号处理器相同：持有发送端克隆投递中断，先于任何任务结果入队
        let interrupt = tx.clone();
        interrupt.send(BatchEvent::Interrupted).unwrap();

        let err = runner.run(files.clone(), tx, rx).unwrap_err();

        assert!(matches!(err, SedError::Interrupted));
        for (i, path) in files.iter().enumerate() {
            assert_eq!(
                fs::read_to_string(path).unwrap(),
                format!("foo {}\nbar\nfoo foo {}\n", i, i)
            );
        }
        // 拆除后仍在运行的任务无法再创建临时文件
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(leftovers(dir.path()), 0);
    }

    #[test]
    fn test_registry_teardown_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TempRegistry::default();
        let path = dir.path().join(".x.sed-1.tmp");
        drop(registry.create(&path).unwrap());
        fs::remove_file(&path).unwrap();

        registry.teardown();
        assert!(matches!(
            registry.create(&path),
            Err(SedError::BatchAborted { .. })
        ));
        assert!(!path.exists());
    }
}
