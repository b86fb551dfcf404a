//! # 字面匹配
//!
//! 对字节行做全局字面子串替换（最左优先、不重叠），不做任何正则解释。
//!
//! ## 依赖关系
//! - 被 `replacer/transaction.rs` 使用
//! - 使用 `regex::bytes`，搜索串经 `regex::escape` 转义后作为纯字面量

use crate::error::Result;

use regex::bytes::{NoExpand, Regex};

/// 编译后的字面替换规则，可在多个任务间共享
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    /// 空搜索串不匹配任何位置
    matcher: Option<Regex>,
    to: Vec<u8>,
}

impl LiteralPattern {
    pub fn new(from: &str, to: &str) -> Result<Self> {
        let matcher = if from.is_empty() {
            None
        } else {
            Some(Regex::new(&regex::escape(from))?)
        };

        Ok(LiteralPattern {
            matcher,
            to: to.as_bytes().to_vec(),
        })
    }

    /// 替换一行中所有出现；未出现时返回 `None`
    pub fn replace_line(&self, line: &[u8]) -> Option<Vec<u8>> {
        let matcher = self.matcher.as_ref()?;
        if !matcher.is_match(line) {
            return None;
        }
        Some(matcher.replace_all(line, NoExpand(&self.to)).into_owned())
    }
}
