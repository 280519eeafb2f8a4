use futures::StreamExt;
use garde::Validate;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::blob::{BlobServiceConnector, BlobStoreError, StorageAccount, UploadOptions};
use crate::console::Console;
use crate::credential::CredentialProvider;
use crate::workflow::{names, WorkflowConfig, WorkflowError};

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub account: StorageAccount,
    pub container_name: String,
    pub local_file_path: PathBuf,
    pub blob_uri: String,
    pub listed_blobs: Vec<String>,
    pub content: String,
}

/// Blob 存储示例工作流
///
/// 依次执行：解析账号 → 解析凭证 → 创建客户端 → 创建容器 → 写本地文件
/// → 上传 → 列举 → 下载。每一步等待上一步完成，任一步失败即中止。
/// 创建的容器与本地文件不会被清理。
pub struct BlobWorkflow {
    config: WorkflowConfig,
    credentials: Arc<dyn CredentialProvider>,
    connector: Arc<dyn BlobServiceConnector>,
    console: Arc<dyn Console>,
}

impl BlobWorkflow {
    pub fn new(
        config: WorkflowConfig,
        credentials: Arc<dyn CredentialProvider>,
        connector: Arc<dyn BlobServiceConnector>,
        console: Arc<dyn Console>,
    ) -> Result<Self, WorkflowError> {
        if let Err(errors) = config.validate() {
            return Err(WorkflowError::Configuration(format!("{}", errors)));
        }
        Ok(Self {
            config,
            credentials,
            connector,
            console,
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    #[instrument(skip(self), fields(account = tracing::field::Empty))]
    pub async fn run(
        &self,
        account_name_override: Option<String>,
    ) -> Result<WorkflowReport, WorkflowError> {
        let account_name = account_name_override.unwrap_or_else(|| self.config.account_name.clone());
        tracing::Span::current().record("account", account_name.as_str());

        let credential = self
            .credentials
            .resolve()
            .map_err(WorkflowError::Authentication)?;

        let account = self.connector.account(&account_name);
        let client = self
            .connector
            .connect(&account, credential)
            .map_err(|e| match e {
                BlobStoreError::Authentication(_) => WorkflowError::Authentication(e),
                other => WorkflowError::Configuration(other.to_string()),
            })?;
        debug!(endpoint = account.endpoint(), "blob service client ready");

        let container_name = names::container_name(&self.config.container_prefix);
        self.console
            .write_line(&format!("Creating container: {}", container_name));
        let container = self
            .deadline("create_container", client.create_container(&container_name))
            .await
            .and_then(|result| result)
            .map_err(|e| {
                WorkflowError::from_store(e, |source| WorkflowError::ContainerCreation {
                    container: container_name.clone(),
                    source,
                })
            })?;

        let local_dir = self.config.local_dir.clone();
        tokio::fs::create_dir_all(&local_dir)
            .await
            .map_err(|source| WorkflowError::LocalIo {
                path: local_dir.clone(),
                source,
            })?;

        let file_name = names::file_name(&self.config.file_prefix, &self.config.file_extension);
        let local_file_path = local_dir.join(&file_name);
        tokio::fs::write(&local_file_path, &self.config.content)
            .await
            .map_err(|source| WorkflowError::LocalIo {
                path: local_file_path.clone(),
                source,
            })?;
        self.console
            .write_line(&format!("Local file created: {}", local_file_path.display()));

        let blob = container.blob_client(&file_name);
        let blob_uri = blob.uri().map_err(|e| {
            WorkflowError::from_store(e, |source| WorkflowError::Upload {
                blob: file_name.clone(),
                source,
            })
        })?;
        self.console
            .write_line(&format!("Uploading to Blob storage as blob:\n\t{}", blob_uri));

        {
            // 文件句柄随 upload_reader 一起释放，上传失败时同样如此
            let file = tokio::fs::File::open(&local_file_path)
                .await
                .map_err(|source| WorkflowError::LocalIo {
                    path: local_file_path.clone(),
                    source,
                })?;
            let options = UploadOptions {
                overwrite: self.config.overwrite,
            };
            self.deadline("upload", blob.upload_reader(Box::new(file), options))
                .await
                .and_then(|result| result)
                .map_err(|e| {
                    WorkflowError::from_store(e, |source| WorkflowError::Upload {
                        blob: file_name.clone(),
                        source,
                    })
                })?;
        }
        self.console.write_line("Blob uploaded successfully.");
        info!(container = container.name(), blob = blob.name(), "blob uploaded");

        self.console.write_line("Listing blobs in container...");
        let list_error = |e: BlobStoreError| {
            WorkflowError::from_store(e, |source| WorkflowError::List {
                container: container_name.clone(),
                source,
            })
        };
        let mut listed_blobs = Vec::new();
        let mut blob_names = container.list_blobs();
        while let Some(item) = self
            .deadline("list_blobs", blob_names.next())
            .await
            .map_err(list_error)?
        {
            let name = item.map_err(list_error)?;
            self.console.write_line(&format!("\t{}", name));
            listed_blobs.push(name);
        }

        let data = self
            .deadline("download_content", blob.download_content())
            .await
            .and_then(|result| result)
            .map_err(|e| {
                WorkflowError::from_store(e, |source| WorkflowError::Download {
                    blob: file_name.clone(),
                    source,
                })
            })?;
        let content = String::from_utf8_lossy(&data).into_owned();
        self.console
            .write_line("\nContenido del fichero subido al blob:");
        self.console.write_line(&content);

        Ok(WorkflowReport {
            account,
            container_name,
            local_file_path,
            blob_uri,
            listed_blobs,
            content,
        })
    }

    /// 按配置为单次远程调用加超时
    async fn deadline<F>(&self, operation: &str, call: F) -> Result<F::Output, BlobStoreError>
    where
        F: Future,
    {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| BlobStoreError::Timeout {
                    operation: operation.to_string(),
                    elapsed: limit,
                }),
            None => Ok(call.await),
        }
    }
}

/// 读取覆盖账号名的环境变量，未设置或为空时返回 `None`
pub fn account_override_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{MemoryBlobService, MemoryFault};
    use crate::console::MemoryConsole;
    use crate::credential::StaticCredentialProvider;
    use serial_test::serial;

    fn workflow(
        service: &MemoryBlobService,
        console: &MemoryConsole,
        dir: &std::path::Path,
    ) -> BlobWorkflow {
        let config = WorkflowConfig {
            local_dir: dir.join("data"),
            ..Default::default()
        };
        BlobWorkflow::new(
            config,
            Arc::new(StaticCredentialProvider::anonymous()),
            Arc::new(service.clone()),
            Arc::new(console.clone()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_override_account_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = MemoryBlobService::default();
        let console = MemoryConsole::new();

        let report = workflow(&service, &console, dir.path())
            .run(Some("otheraccount".to_string()))
            .await
            .unwrap();

        assert_eq!(report.account.name(), "otheraccount");
        assert!(report
            .blob_uri
            .starts_with("https://otheraccount.blob.core.windows.net/"));
    }

    #[tokio::test]
    async fn test_connect_failure_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = MemoryBlobService::default().with_fault(MemoryFault::Connect);
        let console = MemoryConsole::new();

        let err = workflow(&service, &console, dir.path())
            .run(None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "ConfigurationError");
        assert!(console.lines().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WorkflowConfig {
            container_prefix: String::new(),
            ..Default::default()
        };
        let result = BlobWorkflow::new(
            config,
            Arc::new(StaticCredentialProvider::anonymous()),
            Arc::new(MemoryBlobService::default()),
            Arc::new(MemoryConsole::new()),
        );
        assert!(matches!(result, Err(WorkflowError::Configuration(_))));
    }

    #[test]
    #[serial]
    fn test_account_override_from_env() {
        std::env::set_var("BLOBFLOW_TEST_ACCOUNT", "envaccount");
        assert_eq!(
            account_override_from_env("BLOBFLOW_TEST_ACCOUNT"),
            Some("envaccount".to_string())
        );

        std::env::set_var("BLOBFLOW_TEST_ACCOUNT", "  ");
        assert_eq!(account_override_from_env("BLOBFLOW_TEST_ACCOUNT"), None);

        std::env::remove_var("BLOBFLOW_TEST_ACCOUNT");
        assert_eq!(account_override_from_env("BLOBFLOW_TEST_ACCOUNT"), None);
    }
}
