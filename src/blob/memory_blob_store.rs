use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::blob::{
    BlobHandle, BlobNameStream, BlobServiceClient, BlobServiceConnector, BlobStoreError,
    ContainerHandle, StorageAccount, UploadOptions,
};
use crate::credential::Credential;

type BlobMap = Arc<RwLock<BTreeMap<String, Bytes>>>;

/// 注入故障的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryFault {
    Connect,
    CreateContainer,
    Upload,
    /// 产出第一个名称后失败
    List,
    Download,
}

/// 内存 Blob 服务配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryBlobServiceConfig {
    /// 需要失败的操作
    pub faults: Vec<MemoryFault>,
}

/// 进程内 Blob 服务
///
/// 克隆共享同一份数据，`connect` 返回的客户端也指向同一份数据。
/// 列举结果按名称字典序排列。
#[derive(Clone, Default)]
pub struct MemoryBlobService {
    containers: Arc<DashMap<String, BlobMap>>,
    faults: Arc<Vec<MemoryFault>>,
}

impl MemoryBlobService {
    pub fn new(config: MemoryBlobServiceConfig) -> Self {
        Self {
            containers: Arc::default(),
            faults: Arc::new(config.faults),
        }
    }

    /// 注入故障
    pub fn with_fault(mut self, fault: MemoryFault) -> Self {
        Arc::make_mut(&mut self.faults).push(fault);
        self
    }

    /// 全部容器名
    pub fn container_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.containers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// 容器内全部 blob 名，容器不存在时返回 `None`
    pub fn blob_names(&self, container: &str) -> Option<Vec<String>> {
        let blobs = self.containers.get(container)?.value().clone();
        let names = read_blobs(&blobs).keys().cloned().collect();
        Some(names)
    }

    /// 读取 blob 内容
    pub fn blob_content(&self, container: &str, blob: &str) -> Option<Bytes> {
        let blobs = self.containers.get(container)?.value().clone();
        let content = read_blobs(&blobs).get(blob).cloned();
        content
    }

    fn check(faults: &[MemoryFault], fault: MemoryFault, operation: &str) -> Result<(), BlobStoreError> {
        if faults.contains(&fault) {
            return Err(BlobStoreError::Provider {
                provider: "Memory".to_string(),
                message: format!("injected failure: {}", operation),
                source: None,
            });
        }
        Ok(())
    }
}

fn read_blobs(blobs: &BlobMap) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Bytes>> {
    blobs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_blobs(blobs: &BlobMap) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Bytes>> {
    blobs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl BlobServiceConnector for MemoryBlobService {
    fn connect(
        &self,
        account: &StorageAccount,
        _credential: Credential,
    ) -> Result<Arc<dyn BlobServiceClient>, BlobStoreError> {
        Self::check(&self.faults, MemoryFault::Connect, "connect")?;
        debug!(account = account.name(), "connected to memory blob service");
        Ok(Arc::new(MemoryServiceClient {
            endpoint: account.endpoint().to_string(),
            service: self.clone(),
        }))
    }
}

struct MemoryServiceClient {
    endpoint: String,
    service: MemoryBlobService,
}

#[async_trait]
impl BlobServiceClient for MemoryServiceClient {
    async fn create_container(
        &self,
        name: &str,
    ) -> Result<Box<dyn ContainerHandle>, BlobStoreError> {
        MemoryBlobService::check(&self.service.faults, MemoryFault::CreateContainer, "create_container")?;
        if name.is_empty() {
            return Err(BlobStoreError::InvalidInput("容器名不能为空".to_string()));
        }

        let blobs = match self.service.containers.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(BlobStoreError::AlreadyExists {
                    key: name.to_string(),
                })
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => entry.insert(BlobMap::default()).clone(),
        };

        Ok(Box::new(MemoryContainer {
            name: name.to_string(),
            uri: format!("{}/{}", self.endpoint, name),
            blobs,
            faults: self.service.faults.clone(),
        }))
    }
}

struct MemoryContainer {
    name: String,
    uri: String,
    blobs: BlobMap,
    faults: Arc<Vec<MemoryFault>>,
}

impl ContainerHandle for MemoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn blob_client(&self, name: &str) -> Box<dyn BlobHandle> {
        Box::new(MemoryBlob {
            name: name.to_string(),
            uri: format!("{}/{}", self.uri, name),
            blobs: self.blobs.clone(),
            faults: self.faults.clone(),
        })
    }

    fn list_blobs(&self) -> BlobNameStream {
        let names: Vec<String> = read_blobs(&self.blobs).keys().cloned().collect();
        let mut items: Vec<Result<String, BlobStoreError>> = Vec::with_capacity(names.len() + 1);

        if self.faults.contains(&MemoryFault::List) {
            items.extend(names.into_iter().take(1).map(Ok));
            if let Err(e) = MemoryBlobService::check(&self.faults, MemoryFault::List, "list_blobs") {
                items.push(Err(e));
            }
        } else {
            items.extend(names.into_iter().map(Ok));
        }

        Box::pin(stream::iter(items))
    }
}

struct MemoryBlob {
    name: String,
    uri: String,
    blobs: BlobMap,
    faults: Arc<Vec<MemoryFault>>,
}

#[async_trait]
impl BlobHandle for MemoryBlob {
    fn name(&self) -> &str {
        &self.name
    }

    fn uri(&self) -> Result<String, BlobStoreError> {
        Ok(self.uri.clone())
    }

    async fn upload(&self, data: Bytes, options: UploadOptions) -> Result<(), BlobStoreError> {
        MemoryBlobService::check(&self.faults, MemoryFault::Upload, "upload")?;
        let mut blobs = write_blobs(&self.blobs);
        if !options.overwrite && blobs.contains_key(&self.name) {
            return Err(BlobStoreError::AlreadyExists {
                key: self.name.clone(),
            });
        }
        blobs.insert(self.name.clone(), data);
        Ok(())
    }

    async fn download_content(&self) -> Result<Bytes, BlobStoreError> {
        MemoryBlobService::check(&self.faults, MemoryFault::Download, "download_content")?;
        read_blobs(&self.blobs)
            .get(&self.name)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound {
                key: self.name.clone(),
            })
    }
}
