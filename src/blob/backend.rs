use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::blob::{
    AzureBlobConnector, AzureBlobServiceConfig, BlobServiceConnector, BlobStoreError,
    MemoryBlobService, MemoryBlobServiceConfig,
};
use crate::credential::{CredentialProvider, StaticCredentialProvider};

/// 存储后端配置
///
/// ```yaml
/// backend:
///   type: AzureBlobService
///   endpoint: http://127.0.0.1:10000/{account}
///   credential:
///     access_key: ${AZURITE_KEY}
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    AzureBlobService(AzureBlobServiceConfig),
    MemoryBlobService(MemoryBlobServiceConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::AzureBlobService(AzureBlobServiceConfig::default())
    }
}

/// 已装配的后端：连接器与对应的凭证提供者
#[derive(Clone)]
pub struct Backend {
    pub connector: Arc<dyn BlobServiceConnector>,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl BackendConfig {
    pub fn build(&self) -> Result<Backend, BlobStoreError> {
        match self {
            BackendConfig::AzureBlobService(config) => {
                let connector = AzureBlobConnector::new(config.clone())?;
                Ok(Backend {
                    credentials: connector.credential_provider(),
                    connector: Arc::new(connector),
                })
            }
            BackendConfig::MemoryBlobService(config) => Ok(Backend {
                connector: Arc::new(MemoryBlobService::new(config.clone())),
                credentials: Arc::new(StaticCredentialProvider::anonymous()),
            }),
        }
    }
}
