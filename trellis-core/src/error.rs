/// 统一的错误处理类型
///
/// 配置加载、日志初始化等启动阶段的操作使用 anyhow::Result，
/// 通过 .context() 方法添加错误上下文信息。
///
/// # 示例
///
/// ```rust,ignore
/// use anyhow::{Context, Result};
///
/// fn load(path: &str) -> Result<TomlPropertySource> {
///     TomlPropertySource::from_file(path)
///         .with_context(|| format!("Failed to load routing config '{}'", path))
/// }
/// ```
pub use anyhow::Result;

/// 启动阶段可识别的错误
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML source '{name}': {source}")]
    ConfigParse {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for config key '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to initialize logging: {0}")]
    LoggingInitFailed(String),
}
