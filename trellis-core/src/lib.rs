// trellis-core: Trellis 路由引擎的基础设施
//
// 提供：
// - 分层配置（TOML 文件、环境变量、内存配置源）
// - 日志初始化（基于 tracing-subscriber）
// - 命名约定工具（类型名、包路径转换）

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod utils;

// 重新导出常用类型
pub use config::{
    ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource, PropertySource,
    TomlPropertySource,
};
pub use constants::*;
pub use error::{CoreError, Result};
pub use logging::{LogFormat, LogLevel, LoggingConfig};

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::config::{
        self, ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource,
        PropertySource, TomlPropertySource,
    };
    pub use crate::error::{CoreError, Result};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::utils;
    // Re-export anyhow for convenience
    pub use anyhow::{anyhow, Context};
}
