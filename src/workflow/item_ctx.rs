//! 图片处理上下文
//!
//! 封装"我正在处理批次中第几张图片"这一信息

use std::fmt::Display;

/// 图片处理上下文
///
/// 包含处理单张图片所需的全部上下文信息
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 原始文件名
    pub file_name: String,

    /// 图片在批次中的序号（从1开始，仅用于日志显示）
    pub item_index: usize,

    /// 批次图片总数
    pub total: usize,
}

impl ItemCtx {
    /// 创建新的图片上下文
    pub fn new(file_name: String, item_index: usize, total: usize) -> Self {
        Self {
            file_name,
            item_index,
            total,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[图片 {}/{}: {}]",
            self.item_index, self.total, self.file_name
        )
    }
}
