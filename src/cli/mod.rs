//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 用法
//! `sed [OPTIONS] FROMSTRING TOSTRING PATHSTRING`
//!
//! 同时接受 Go 风格的单横线长选项 (`-dryrun`, `-version`, `-help`)，
//! 解析前统一改写为双横线形式。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 转换为 `config::Config`

use clap::Parser;
use std::ffi::OsString;

const USAGE_EXAMPLES: &str = "Examples:
  sed 'XXX' 'YYY' './foo.txt'
  sed 'XXX' 'YYY' './*.txt'
  sed 'XXX' 'YYY' './foo/*'
  sed -dryrun 'XXX' 'YYY' './foo/*'";

/// sed - 按 glob 匹配文件批量做字面字符串替换
#[derive(Parser, Debug)]
#[command(name = "sed")]
#[command(version)]
#[command(about = "Replace a literal string in every file matched by a glob", long_about = None)]
#[command(override_usage = "sed [OPTIONS] FROMSTRING TOSTRING PATHSTRING")]
#[command(after_help = USAGE_EXAMPLES)]
pub struct Cli {
    /// Literal string to search for
    #[arg(value_name = "FROMSTRING")]
    pub from: String,

    /// Literal string to replace it with
    #[arg(value_name = "TOSTRING")]
    pub to: String,

    /// Glob path expression selecting the files
    #[arg(value_name = "PATHSTRING")]
    pub path: String,

    /// Dry run, only diffs are shown and no files are modified
    #[arg(long = "dryrun", default_value_t = false)]
    pub dry_run: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

/// 将单横线长选项改写为 clap 可识别的双横线形式
///
/// `-dryrun=<bool>` 为真时改写为 `--dryrun`，为假时去掉；`--` 之后的参数原样保留。
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .filter_map(|arg| {
            if passthrough {
                return Some(arg);
            }
            let long = match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    None
                }
                Some("-dryrun") => Some("--dryrun"),
                Some("-version") => Some("--version"),
                Some("-help") => Some("--help"),
                Some(flag) => match dryrun_value(flag) {
                    Some(true) => Some("--dryrun"),
                    Some(false) => return None,
                    None => None,
                },
                None => None,
            };
            Some(long.map(OsString::from).unwrap_or(arg))
        })
        .collect()
}

/// 解析 `-dryrun=<bool>` / `--dryrun=<bool>` 的布尔值，取值规则同 Go `strconv.ParseBool`
fn dryrun_value(flag: &str) -> Option<bool> {
    let value = flag
        .strip_prefix("--dryrun=")
        .or_else(|| flag.strip_prefix("-dryrun="))?;
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
