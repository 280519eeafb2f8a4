use futures::Stream;
use smart_default::SmartDefault;
use std::pin::Pin;

use crate::blob::BlobStoreError;

/// Azure 公有云 Blob 服务域名后缀
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";

/// 存储账号
///
/// 由账号名确定服务端点，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccount {
    name: String,
    endpoint: String,
}

impl StorageAccount {
    /// 公有云账号，端点为 `https://{name}.blob.core.windows.net`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let endpoint = format!("https://{}.{}", name, DEFAULT_ENDPOINT_SUFFIX);
        Self { name, endpoint }
    }

    /// 自定义端点（如 Azurite 模拟器 `http://127.0.0.1:10000/devstoreaccount1`）
    pub fn with_endpoint(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 是否使用公有云默认端点
    pub fn is_public(&self) -> bool {
        self.endpoint == format!("https://{}.{}", self.name, DEFAULT_ENDPOINT_SUFFIX)
    }
}

/// 上传选项
#[derive(Debug, Clone, SmartDefault)]
pub struct UploadOptions {
    /// 目标 blob 已存在时是否覆盖
    #[default = false]
    pub overwrite: bool,
}

/// 惰性、有限、不可重启的 blob 名称序列
///
/// 底层按页拉取，序列中途失败时产出一个 `Err` 后结束。
pub type BlobNameStream = Pin<Box<dyn Stream<Item = Result<String, BlobStoreError>> + Send>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_account_endpoint() {
        let account = StorageAccount::new("stblob0226092309a");
        assert_eq!(account.name(), "stblob0226092309a");
        assert_eq!(
            account.endpoint(),
            "https://stblob0226092309a.blob.core.windows.net"
        );
        assert!(account.is_public());
    }

    #[test]
    fn test_custom_endpoint_strips_trailing_slash() {
        let account =
            StorageAccount::with_endpoint("devstoreaccount1", "http://127.0.0.1:10000/devstoreaccount1/");
        assert_eq!(account.endpoint(), "http://127.0.0.1:10000/devstoreaccount1");
        assert!(!account.is_public());
    }

    #[test]
    fn test_upload_options_default() {
        assert!(!UploadOptions::default().overwrite);
    }
}
