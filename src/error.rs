use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 凭证错误（运行级，任何图片处理之前失败）
    Credential(CredentialError),
    /// 单张图片分析错误（条目级，被编排层吸收）
    Analysis(AnalysisError),
    /// 结果打包错误
    Packaging(PackagingError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Credential(e) => write!(f, "凭证错误: {}", e),
            AppError::Analysis(e) => write!(f, "分析错误: {}", e),
            AppError::Packaging(e) => write!(f, "打包错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Credential(e) => Some(e),
            AppError::Analysis(e) => Some(e),
            AppError::Packaging(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 凭证相关错误
#[derive(Debug)]
pub enum CredentialError {
    /// 未提供 API 密钥
    MissingApiKey,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::MissingApiKey => {
                write!(f, "未提供 API 密钥，请在开始分析之前配置 LLM_API_KEY")
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// 单张图片分析错误
///
/// 只终止当前图片的分析，不终止整个批次
#[derive(Debug)]
pub enum AnalysisError {
    /// API 调用失败（网络、额度、超时）
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 模型返回内容为空
    EmptyContent {
        model: String,
    },
    /// 模型返回内容无法解析
    MalformedResponse {
        stage: String,
        response: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::ApiCallFailed { model, source } => {
                write!(f, "LLM API 调用失败 (模型: {}): {}", model, source)
            }
            AnalysisError::EmptyContent { model } => {
                write!(f, "LLM 返回内容为空 (模型: {})", model)
            }
            AnalysisError::MalformedResponse { stage, response } => {
                write!(f, "无法解析模型响应 (阶段: {}, 响应: {})", stage, response)
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::ApiCallFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 结果打包错误
///
/// 打包失败只影响打包步骤本身，已计算的分析结果不会丢失，
/// 但不会对外暴露不完整的压缩包
#[derive(Debug)]
pub enum PackagingError {
    /// 压缩包写入失败
    ArchiveWriteFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for PackagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackagingError::ArchiveWriteFailed { source } => {
                write!(f, "压缩包写入失败: {}", source)
            }
        }
    }
}

impl std::error::Error for PackagingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackagingError::ArchiveWriteFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Credential(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<PackagingError> for AppError {
    fn from(err: PackagingError) -> Self {
        AppError::Packaging(err)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Packaging(PackagingError::ArchiveWriteFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少 API 密钥错误
    pub fn missing_api_key() -> Self {
        AppError::Credential(CredentialError::MissingApiKey)
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建压缩包写入错误
    pub fn archive_write_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Packaging(PackagingError::ArchiveWriteFailed {
            source: Box::new(source),
        })
    }
}

impl AnalysisError {
    /// 创建 API 调用失败错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AnalysisError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// 创建响应解析失败错误
    pub fn malformed_response(stage: impl Into<String>, response: impl Into<String>) -> Self {
        AnalysisError::MalformedResponse {
            stage: stage.into(),
            response: response.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
