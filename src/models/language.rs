/// 报告语言枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Language {
    /// 英文
    English,
    /// 中文
    Chinese,
}

impl Language {
    /// 获取语言代码
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "中文",
        }
    }

    /// 从语言代码解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "zh" => Some(Language::Chinese),
            _ => None,
        }
    }

    /// 智能查找语言（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(language) = Self::from_code(s) {
            return Some(language);
        }

        // 模糊匹配
        let s_lower = s.to_lowercase();
        if s_lower.contains("en") || s_lower.contains("english") || s.contains("英") {
            return Some(Language::English);
        }
        if s_lower.contains("zh") || s_lower.contains("chinese") || s.contains("中") {
            return Some(Language::Chinese);
        }

        None
    }

    /// 报告开头的 AI 免责声明
    pub fn disclaimer(self) -> &'static str {
        match self {
            Language::English => {
                "NOTE: AI-generated content, for reference only. Not a substitute for medical diagnosis."
            }
            Language::Chinese => "注意：本报告由AI 生成，仅供参考。不能替代医学诊断。",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Chinese
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
