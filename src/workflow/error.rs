use std::path::PathBuf;
use thiserror::Error;

use crate::blob::BlobStoreError;

/// 工作流错误
///
/// 所有错误都会中止剩余步骤，不重试，也不回滚已完成的步骤。
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("[ConfigurationError] 配置无效: {0}")]
    Configuration(String),

    #[error("[AuthenticationError] 认证失败")]
    Authentication(#[source] BlobStoreError),

    #[error("[ContainerCreationError] 创建容器失败: {container}")]
    ContainerCreation {
        container: String,
        #[source]
        source: BlobStoreError,
    },

    #[error("[LocalIOError] 本地文件操作失败: {}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[UploadError] 上传失败: {blob}")]
    Upload {
        blob: String,
        #[source]
        source: BlobStoreError,
    },

    #[error("[ListError] 列举容器失败: {container}")]
    List {
        container: String,
        #[source]
        source: BlobStoreError,
    },

    #[error("[DownloadError] 下载失败: {blob}")]
    Download {
        blob: String,
        #[source]
        source: BlobStoreError,
    },
}

impl WorkflowError {
    /// 错误类别名
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Configuration(_) => "ConfigurationError",
            WorkflowError::Authentication(_) => "AuthenticationError",
            WorkflowError::ContainerCreation { .. } => "ContainerCreationError",
            WorkflowError::LocalIo { .. } => "LocalIOError",
            WorkflowError::Upload { .. } => "UploadError",
            WorkflowError::List { .. } => "ListError",
            WorkflowError::Download { .. } => "DownloadError",
        }
    }

    /// 归类存储错误：认证类错误统一为 `Authentication`，其余归入当前步骤
    pub(crate) fn from_store(
        err: BlobStoreError,
        step: impl FnOnce(BlobStoreError) -> WorkflowError,
    ) -> WorkflowError {
        if err.is_authentication() {
            WorkflowError::Authentication(err)
        } else {
            step(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_overrides_step_kind() {
        let err = WorkflowError::from_store(
            BlobStoreError::Authentication("token expired".to_string()),
            |source| WorkflowError::Upload {
                blob: "file.txt".to_string(),
                source,
            },
        );
        assert_eq!(err.kind(), "AuthenticationError");
    }

    #[test]
    fn test_other_errors_keep_step_kind() {
        let err = WorkflowError::from_store(
            BlobStoreError::AlreadyExists {
                key: "wtblob1".to_string(),
            },
            |source| WorkflowError::ContainerCreation {
                container: "wtblob1".to_string(),
                source,
            },
        );
        assert_eq!(err.kind(), "ContainerCreationError");
        assert!(err.to_string().contains("wtblob1"));
    }
}
