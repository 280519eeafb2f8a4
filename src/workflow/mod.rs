//! workflow 模块 - Blob 存储示例工作流
//!
//! 创建容器、写入本地文件、上传、列举并下载，全部步骤串行执行。

mod blob_workflow;
mod config;
mod error;
pub mod names;

pub use blob_workflow::{account_override_from_env, BlobWorkflow, WorkflowReport};
pub use config::WorkflowConfig;
pub use error::WorkflowError;
