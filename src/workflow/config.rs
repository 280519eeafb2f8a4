use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::path::PathBuf;
use std::time::Duration;

use crate::cfg::serde_duration::{serde_as, HumanDur};

/// 工作流配置
///
/// 默认值即示例程序的固定行为。
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct WorkflowConfig {
    /// 未被环境变量覆盖时使用的存储账号名
    #[garde(length(min = 3, max = 24), pattern(r"^[a-z0-9]+$"))]
    #[default = "stblob0226092309a"]
    pub account_name: String,

    /// 覆盖账号名的环境变量
    #[garde(length(min = 1))]
    #[default = "AZURE_STORAGE_ACCOUNT"]
    pub account_env: String,

    /// 容器名前缀，后接 32 位十六进制随机串
    #[garde(length(min = 1, max = 31), pattern(r"^[a-z0-9][a-z0-9-]*$"))]
    #[default = "wtblob"]
    pub container_prefix: String,

    /// 本地文件名前缀
    #[garde(length(min = 1))]
    #[default = "wtfile"]
    pub file_prefix: String,

    /// 本地文件扩展名
    #[garde(skip)]
    #[default = ".txt"]
    pub file_extension: String,

    /// 本地工作目录
    #[garde(skip)]
    #[default = "./data/"]
    pub local_dir: PathBuf,

    /// 写入本地文件并上传的内容
    #[garde(skip)]
    #[default = "Felicitaciones, aprobaste!"]
    pub content: String,

    /// 上传时覆盖已存在的 blob
    #[garde(skip)]
    #[default = true]
    pub overwrite: bool,

    /// 单次远程调用的超时，未设置时一直等待
    #[garde(skip)]
    #[serde_as(as = "Option<HumanDur>")]
    pub call_timeout: Option<Duration>,
}
