//! 凭证解析
//!
//! 默认凭证链（DefaultAzureCredential）按顺序尝试多种凭证来源，
//! `CredentialOptions` 用于显式排除其中的部分来源。

use azure_core::auth::TokenCredential;
use azure_identity::DefaultAzureCredentialBuilder;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::blob::BlobStoreError;

/// 凭证链排除选项
///
/// 默认排除环境变量凭证与托管身份凭证，只保留 Azure CLI 等交互式登录方式。
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialOptions {
    /// 排除 `AZURE_CLIENT_ID` / `AZURE_CLIENT_SECRET` 等环境变量凭证
    #[default = true]
    pub exclude_environment_credential: bool,

    /// 排除托管身份凭证（App Service、虚拟机）
    #[default = true]
    pub exclude_managed_identity_credential: bool,

    /// 排除 `az login` 凭证
    #[default = false]
    pub exclude_azure_cli_credential: bool,
}

/// 已解析的凭证
#[derive(Clone)]
pub enum Credential {
    /// Entra ID 令牌
    Token(Arc<dyn TokenCredential>),
    /// 账号共享密钥
    AccessKey(String),
    /// 匿名访问（模拟器公开容器、内存后端）
    Anonymous,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Credential::Token(..)"),
            Credential::AccessKey(_) => f.write_str("Credential::AccessKey(***)"),
            Credential::Anonymous => f.write_str("Credential::Anonymous"),
        }
    }
}

/// 凭证提供者
pub trait CredentialProvider: Send + Sync {
    fn resolve(&self) -> Result<Credential, BlobStoreError>;
}

/// 基于默认凭证链的提供者
#[derive(Debug, Clone, Default)]
pub struct DefaultCredentialProvider {
    options: CredentialOptions,
}

impl DefaultCredentialProvider {
    pub fn new(options: CredentialOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CredentialOptions {
        &self.options
    }
}

impl CredentialProvider for DefaultCredentialProvider {
    fn resolve(&self) -> Result<Credential, BlobStoreError> {
        let mut builder = DefaultAzureCredentialBuilder::new();
        if self.options.exclude_environment_credential {
            builder.exclude_environment_credential();
        }
        if self.options.exclude_managed_identity_credential {
            builder.exclude_managed_identity_credential();
        }
        if self.options.exclude_azure_cli_credential {
            builder.exclude_azure_cli_credential();
        }

        let credential = builder
            .build()
            .map_err(|e| BlobStoreError::Authentication(e.to_string()))?;
        debug!(options = ?self.options, "resolved default credential chain");

        Ok(Credential::Token(Arc::new(credential)))
    }
}

/// 固定凭证提供者
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn anonymous() -> Self {
        Self::new(Credential::Anonymous)
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn resolve(&self) -> Result<Credential, BlobStoreError> {
        Ok(self.credential.clone())
    }
}

/// 凭证配置
///
/// 配置了 `access_key` 时使用共享密钥，`anonymous` 为 true 时匿名访问，
/// 否则走默认凭证链。
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialConfig {
    pub options: CredentialOptions,
    pub access_key: Option<String>,
    pub anonymous: bool,
}

impl CredentialConfig {
    pub fn provider(&self) -> Arc<dyn CredentialProvider> {
        if let Some(key) = &self.access_key {
            return Arc::new(StaticCredentialProvider::new(Credential::AccessKey(key.clone())));
        }
        if self.anonymous {
            return Arc::new(StaticCredentialProvider::anonymous());
        }
        Arc::new(DefaultCredentialProvider::new(self.options.clone()))
    }
}
