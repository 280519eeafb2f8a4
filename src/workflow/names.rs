//! 每次运行生成的唯一名称

/// 128 位随机串，32 位小写十六进制
pub fn random_token() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 容器名: 前缀 + 随机串
pub fn container_name(prefix: &str) -> String {
    format!("{}{}", prefix, random_token())
}

/// 文件名: 前缀 + 随机串 + 扩展名
pub fn file_name(prefix: &str, extension: &str) -> String {
    format!("{}{}{}", prefix, random_token(), extension)
}
