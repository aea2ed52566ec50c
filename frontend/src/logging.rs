//! 日志初始化
//!
//! `tracing-subscriber` 的 fmt 层格式化每条日志，再整行转发到浏览器控制台。

use std::io;
use tracing::Level;

/// 缓冲一条格式化后的日志，drop 时输出到控制台
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&line.into());
        }
    }
}

/// 安装全局日志订阅者；重复调用无副作用
pub fn init_logging_default() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .compact()
        .with_writer(|| ConsoleWriter { buf: Vec::new() })
        .try_init();
}
