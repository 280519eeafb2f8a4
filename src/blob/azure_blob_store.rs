use async_trait::async_trait;
use azure_core::error::ErrorKind;
use azure_core::request_options::IfMatchCondition;
use azure_core::StatusCode;
use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::prelude::{
    BlobClient, BlobServiceClient as AzureServiceClient, ClientBuilder, ContainerClient,
};
use bytes::Bytes;
use futures::stream::{self, TryStreamExt};
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::sync::Arc;
use tracing::{debug, info};

use crate::blob::{
    BlobHandle, BlobNameStream, BlobServiceClient, BlobServiceConnector, BlobStoreError,
    ContainerHandle, StorageAccount, UploadOptions,
};
use crate::credential::{Credential, CredentialConfig, CredentialProvider};

const PROVIDER: &str = "Azure";

/// Azure Blob 服务配置
///
/// 凭证获取方式（优先级从高到低）：
/// 1. `credential.access_key` - 账号共享密钥
/// 2. `credential.anonymous` - 匿名访问
/// 3. 默认凭证链，按 `credential.options` 排除部分来源
#[derive(Debug, Deserialize, Serialize, SmartDefault, Clone, Validate)]
#[serde(default)]
pub struct AzureBlobServiceConfig {
    /// 自定义端点（用于 Azurite 模拟器等），`{account}` 会被替换为账号名
    ///
    /// 未设置时使用 `https://{account}.blob.core.windows.net`
    #[garde(pattern(r"^https?://"))]
    pub endpoint: Option<String>,

    /// 凭证配置
    #[garde(skip)]
    pub credential: CredentialConfig,
}

/// Azure Blob 连接器
pub struct AzureBlobConnector {
    config: AzureBlobServiceConfig,
}

impl AzureBlobConnector {
    pub fn new(config: AzureBlobServiceConfig) -> Result<Self, BlobStoreError> {
        // 使用 garde 验证配置
        if let Err(errors) = config.validate() {
            return Err(BlobStoreError::Configuration(format!("{}", errors)));
        }
        Ok(Self { config })
    }

    /// 配置对应的凭证提供者
    pub fn credential_provider(&self) -> Arc<dyn CredentialProvider> {
        self.config.credential.provider()
    }
}

impl BlobServiceConnector for AzureBlobConnector {
    fn account(&self, name: &str) -> StorageAccount {
        match &self.config.endpoint {
            Some(endpoint) => StorageAccount::with_endpoint(name, endpoint.replace("{account}", name)),
            None => StorageAccount::new(name),
        }
    }

    fn connect(
        &self,
        account: &StorageAccount,
        credential: Credential,
    ) -> Result<Arc<dyn BlobServiceClient>, BlobStoreError> {
        let credentials = match credential {
            Credential::Token(token) => StorageCredentials::token_credential(token),
            Credential::AccessKey(key) => {
                StorageCredentials::access_key(account.name().to_string(), key)
            }
            Credential::Anonymous => StorageCredentials::anonymous(),
        };

        let builder = if account.is_public() {
            ClientBuilder::new(account.name().to_string(), credentials)
        } else {
            ClientBuilder::with_location(
                CloudLocation::Custom {
                    account: account.name().to_string(),
                    uri: account.endpoint().to_string(),
                },
                credentials,
            )
        };

        debug!(account = account.name(), endpoint = account.endpoint(), "built azure blob client");
        Ok(Arc::new(AzureBlobService {
            client: builder.blob_service_client(),
        }))
    }
}

/// Azure Blob 服务客户端
pub struct AzureBlobService {
    client: AzureServiceClient,
}

#[async_trait]
impl BlobServiceClient for AzureBlobService {
    async fn create_container(
        &self,
        name: &str,
    ) -> Result<Box<dyn ContainerHandle>, BlobStoreError> {
        let client = self.client.container_client(name);
        client
            .create()
            .await
            .map_err(|e| map_azure_error(e, name, "create_container"))?;

        info!(container = name, "container created");
        Ok(Box::new(AzureContainer {
            name: name.to_string(),
            client,
        }))
    }
}

struct AzureContainer {
    name: String,
    client: ContainerClient,
}

impl ContainerHandle for AzureContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn blob_client(&self, name: &str) -> Box<dyn BlobHandle> {
        Box::new(AzureBlob {
            name: name.to_string(),
            client: self.client.blob_client(name),
        })
    }

    fn list_blobs(&self) -> BlobNameStream {
        let container = self.name.clone();
        let pages = self
            .client
            .list_blobs()
            .into_stream()
            .map_err(move |e| map_azure_error(e, &container, "list_blobs"))
            .map_ok(|page| {
                let names: Vec<Result<String, BlobStoreError>> =
                    page.blobs.blobs().map(|blob| Ok(blob.name.clone())).collect();
                stream::iter(names)
            })
            .try_flatten();
        Box::pin(pages)
    }
}

struct AzureBlob {
    name: String,
    client: BlobClient,
}

#[async_trait]
impl BlobHandle for AzureBlob {
    fn name(&self) -> &str {
        &self.name
    }

    fn uri(&self) -> Result<String, BlobStoreError> {
        self.client
            .url()
            .map(|url| url.to_string())
            .map_err(|e| BlobStoreError::from_provider(e, PROVIDER, "blob_url"))
    }

    async fn upload(&self, data: Bytes, options: UploadOptions) -> Result<(), BlobStoreError> {
        let size = data.len();
        let mut request = self.client.put_block_blob(data);
        if !options.overwrite {
            // If-None-Match: * 使已存在的 blob 返回 409
            request = request.if_match(IfMatchCondition::NotMatch("*".to_string()));
        }
        request
            .await
            .map_err(|e| map_azure_error(e, &self.name, "put_block_blob"))?;

        debug!(blob = %self.name, size, "blob uploaded");
        Ok(())
    }

    async fn download_content(&self) -> Result<Bytes, BlobStoreError> {
        let content = self
            .client
            .get_content()
            .await
            .map_err(|e| map_azure_error(e, &self.name, "get_content"))?;
        Ok(Bytes::from(content))
    }
}

/// 将 SDK 错误归类为统一错误
fn map_azure_error(err: azure_core::Error, key: &str, context: &str) -> BlobStoreError {
    let message = format!("{}: {}", context, err);
    match err.kind() {
        ErrorKind::Credential => return BlobStoreError::Authentication(message),
        ErrorKind::Io => return BlobStoreError::Network(message),
        ErrorKind::HttpResponse { status, .. } => match status {
            StatusCode::Unauthorized => return BlobStoreError::Authentication(message),
            StatusCode::Forbidden => return BlobStoreError::PermissionDenied(message),
            StatusCode::NotFound => {
                return BlobStoreError::NotFound {
                    key: key.to_string(),
                }
            }
            StatusCode::Conflict | StatusCode::PreconditionFailed => {
                return BlobStoreError::AlreadyExists {
                    key: key.to_string(),
                }
            }
            _ => {}
        },
        _ => {}
    }
    BlobStoreError::from_provider(err, PROVIDER, context)
}
