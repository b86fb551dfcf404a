//! # 单文件替换事务
//!
//! `FileJob` 的扫描、收尾（提交或丢弃）与清理。
//!
//! ## 不变量
//! - 任何失败路径上，已创建的临时文件都会在错误返回前删除
//! - 两阶段模式下原文件在调用者收尾前不会被改动
//! - 提交时临时文件通过 rename 原子地替换原文件
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `replacer/pattern.rs`, `models/job.rs`

use super::pattern::LiteralPattern;
use crate::error::{Result, SedError};
use crate::models::{FileJob, Replacement};

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// 为 `file` 生成同目录下的唯一临时文件路径
///
/// 名字由纳秒时间戳、进程号和进程内递增序号组成，并发任务之间不会重复。
/// 长度与原文件名无关。
pub fn temp_path_for(file: &Path) -> PathBuf {
    let dir = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    dir.join(format!(
        ".sed-{}-{}-{}.tmp",
        nanos,
        std::process::id(),
        TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
    ))
}

/// 创建临时文件；目标已存在时失败
pub fn create_temp_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| SedError::TempCreate {
            path: path.display().to_string(),
            source: e,
        })
}

/// 删除临时文件，文件不存在视为成功
pub fn remove_temp(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl FileJob {
    /// 执行替换事务
    ///
    /// `commit_now` 为 `false` 时只生成临时文件（两阶段模式），收尾交给调用者。
    pub fn transform(&mut self, pattern: &LiteralPattern, commit_now: bool) -> Result<()> {
        self.transform_with(pattern, commit_now, create_temp_file)
    }

    /// 同 [`FileJob::transform`]，但由 `create_temp` 负责创建临时文件
    pub fn transform_with<F>(
        &mut self,
        pattern: &LiteralPattern,
        commit_now: bool,
        create_temp: F,
    ) -> Result<()>
    where
        F: FnOnce(&Path) -> Result<File>,
    {
        let input = File::open(&self.file_path).map_err(|e| SedError::FileOpen {
            path: self.display_path(),
            source: e,
        })?;

        let temp_path = temp_path_for(&self.file_path);
        let output = create_temp(&temp_path)?;
        self.temp_path = Some(temp_path);

        if let Err(e) = self.scan(input, output, pattern) {
            self.discard();
            return Err(SedError::Io {
                path: self.display_path(),
                source: e,
            });
        }

        if commit_now {
            self.finalize()?;
        }
        Ok(())
    }

    /// 逐行扫描并写入临时文件；返回时两个句柄均已关闭
    fn scan(&mut self, input: File, output: File, pattern: &LiteralPattern) -> io::Result<()> {
        let mut reader = BufReader::new(input);
        let mut writer = BufWriter::new(output);
        let mut line = Vec::new();
        let mut line_num = 0usize;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_num += 1;

            match pattern.replace_line(&line) {
                Some(new) => {
                    writer.write_all(&new)?;
                    self.replacements.insert(
                        line_num,
                        Replacement {
                            original: line.clone(),
                            new,
                        },
                    );
                }
                None => writer.write_all(&line)?,
            }
        }

        let output = writer.into_inner().map_err(|e| e.into_error())?;
        if !self.dry_run() {
            output.sync_all()?;
        }
        Ok(())
    }

    /// 收尾：dry-run 时丢弃临时文件，否则用临时文件原子替换原文件
    ///
    /// 尚未开始事务（无临时文件）时为空操作。
    pub fn finalize(&mut self) -> Result<()> {
        let temp_path = match self.temp_path.take() {
            Some(p) => p,
            None => return Ok(()),
        };

        if self.dry_run() {
            return remove_temp(&temp_path).map_err(|e| SedError::Finalize {
                path: temp_path.display().to_string(),
                source: e,
            });
        }

        if let Err(e) = self.swap_into_place(&temp_path) {
            let _ = remove_temp(&temp_path);
            return Err(SedError::Finalize {
                path: self.display_path(),
                source: e,
            });
        }
        Ok(())
    }

    fn swap_into_place(&self, temp_path: &Path) -> io::Result<()> {
        // 保留原文件权限
        let permissions = fs::metadata(&self.file_path)?.permissions();
        fs::set_permissions(temp_path, permissions)?;
        fs::rename(temp_path, &self.file_path)
    }

    /// 删除临时文件（若有），不触碰原文件
    pub fn discard(&mut self) {
        if let Some(temp_path) = self.temp_path.take() {
            let _ = remove_temp(&temp_path);
        }
    }
}
