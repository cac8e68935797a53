//! 核心配置键常量定义
//!
//! 日志相关的配置键，供 `LoggingConfig::from_environment` 使用

/// 日志级别，例如 "debug"
pub const LOGGING_LEVEL: &str = "logging.level";

/// 日志格式：compact / full / json / pretty
pub const LOGGING_FORMAT: &str = "logging.format";

/// 自定义过滤器，例如 "trellis_web=trace"
pub const LOGGING_FILTER: &str = "logging.filter";

/// 是否显示目标（模块路径）
pub const LOGGING_SHOW_TARGET: &str = "logging.show-target";
