//! cfg 模块 - 配置辅助
//!
//! 提供配置文件中使用的 serde 适配器

pub mod serde_duration;

pub use serde_duration::{format_duration, parse_duration, HumanDur};
