use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::blob::{BlobNameStream, BlobStoreError, StorageAccount, UploadOptions};
use crate::credential::Credential;

/// Blob 服务客户端，绑定到一个存储账号
#[async_trait]
pub trait BlobServiceClient: Send + Sync {
    /// 创建容器，容器已存在时返回 `AlreadyExists`
    async fn create_container(&self, name: &str)
        -> Result<Box<dyn ContainerHandle>, BlobStoreError>;
}

/// 容器句柄
pub trait ContainerHandle: Send + Sync {
    fn name(&self) -> &str;

    /// 获取容器内某个 blob 的句柄，不发起远程调用
    fn blob_client(&self, name: &str) -> Box<dyn BlobHandle>;

    /// 列出容器内全部 blob 名称
    fn list_blobs(&self) -> BlobNameStream;
}

/// Blob 句柄
#[async_trait]
pub trait BlobHandle: Send + Sync {
    fn name(&self) -> &str;

    /// blob 的完整 URI
    fn uri(&self) -> Result<String, BlobStoreError>;

    /// 上传全部内容
    async fn upload(&self, data: Bytes, options: UploadOptions) -> Result<(), BlobStoreError>;

    /// 下载全部内容
    async fn download_content(&self) -> Result<Bytes, BlobStoreError>;

    /// 从读取器上传
    ///
    /// 读取器在函数返回前被释放，无论上传成功与否。
    async fn upload_reader(
        &self,
        mut reader: Box<dyn AsyncRead + Send + Unpin>,
        options: UploadOptions,
    ) -> Result<(), BlobStoreError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        drop(reader);
        self.upload(Bytes::from(buffer), options).await
    }
}

/// 根据账号与凭证构建服务客户端
pub trait BlobServiceConnector: Send + Sync {
    /// 由账号名构造存储账号
    fn account(&self, name: &str) -> StorageAccount {
        StorageAccount::new(name)
    }

    fn connect(
        &self,
        account: &StorageAccount,
        credential: Credential,
    ) -> Result<Arc<dyn BlobServiceClient>, BlobStoreError>;
}
