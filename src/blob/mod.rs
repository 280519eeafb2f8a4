mod azure_blob_store;
mod backend;
mod blob_store;
mod blob_store_types;
mod error;
mod memory_blob_store;

pub use azure_blob_store::{AzureBlobConnector, AzureBlobService, AzureBlobServiceConfig};
pub use backend::{Backend, BackendConfig};
pub use blob_store::{BlobHandle, BlobServiceClient, BlobServiceConnector, ContainerHandle};
pub use blob_store_types::{BlobNameStream, StorageAccount, UploadOptions, DEFAULT_ENDPOINT_SUFFIX};
pub use error::BlobStoreError;
pub use memory_blob_store::{MemoryBlobService, MemoryBlobServiceConfig, MemoryFault};
