use std::sync::{Arc, Mutex};

/// 进度与结果输出
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str);
}

/// 标准输出
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// 记录输出内容，克隆共享同一缓冲区
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的行（行内可能包含换行符）
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 与标准输出一致的完整文本
    pub fn output(&self) -> String {
        self.lines()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }
}

impl Console for MemoryConsole {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
