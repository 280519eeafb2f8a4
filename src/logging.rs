//! 日志初始化
//!
//! 日志写入 stderr，stdout 只用于工作流的进度输出。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// 日志级别: "trace", "debug", "info", "warn", "error"
    ///
    /// 设置了 `RUST_LOG` 时以环境变量为准
    #[default = "warn"]
    pub level: String,

    /// 是否输出事件所在模块
    #[default = false]
    pub with_target: bool,

    /// 是否输出 ANSI 颜色
    #[default = true]
    pub ansi: bool,
}

impl LogConfig {
    /// 构造过滤器，`RUST_LOG` 优先
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.level.to_lowercase()))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// 保证 init_logging 只被调用一次
static INIT_ONCE: OnceLock<Result<(), String>> = OnceLock::new();

/// 初始化全局 tracing_subscriber
///
/// 多次调用只会初始化一次，后续调用返回第一次初始化的结果
pub fn init_logging(config: &LogConfig) -> Result<()> {
    INIT_ONCE
        .get_or_init(|| {
            tracing_subscriber::fmt()
                .with_env_filter(config.filter())
                .with_target(config.with_target)
                .with_ansi(config.ansi)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {}", e))
}
