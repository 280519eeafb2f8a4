//! blobflow - Azure Blob 存储示例工作流
//!
//! 认证、创建容器、写入本地文件、上传为 blob、列举容器并下载打印内容。
//!
//! ## 模块
//!
//! - **blob**: Blob 存储能力接口（服务 / 容器 / blob 句柄）与 Azure、内存两种实现
//! - **credential**: 凭证链排除选项与凭证提供者
//! - **workflow**: 串行执行的示例工作流
//! - **console**: 进度输出
//! - **logging**: tracing 日志初始化
//! - **cfg**: 配置辅助（人性化时长）

pub mod blob;
pub mod cfg;
pub mod console;
pub mod credential;
pub mod logging;
pub mod workflow;

// 重新导出主要的公共 API
pub use blob::{
    Backend, BackendConfig, BlobHandle, BlobServiceClient, BlobServiceConnector, BlobStoreError,
    ContainerHandle, MemoryBlobService, StorageAccount, UploadOptions,
};
pub use console::{Console, MemoryConsole, StdoutConsole};
pub use credential::{Credential, CredentialOptions, CredentialProvider};
pub use logging::{init_logging, LogConfig};
pub use workflow::{account_override_from_env, BlobWorkflow, WorkflowConfig, WorkflowError, WorkflowReport};
