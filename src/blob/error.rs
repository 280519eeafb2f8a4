use thiserror::Error;

/// Blob 存储统一错误类型
#[derive(Error, Debug)]
pub enum BlobStoreError {
    #[error("对象不存在: {key}")]
    NotFound { key: String },

    #[error("对象已存在: {key}")]
    AlreadyExists { key: String },

    #[error("认证失败: {0}")]
    Authentication(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("无效参数: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("操作超时: {operation} 超过 {elapsed:?}")]
    Timeout {
        operation: String,
        elapsed: std::time::Duration,
    },

    #[error("厂商错误 [{provider}]: {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl BlobStoreError {
    /// 从厂商 SDK 错误转换
    pub fn from_provider<E>(err: E, provider: &str, context: &str) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BlobStoreError::Provider {
            provider: provider.to_string(),
            message: context.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// 是否为认证类错误（凭证无法获取或被服务端拒绝）
    pub fn is_authentication(&self) -> bool {
        matches!(self, BlobStoreError::Authentication(_))
    }
}
