//! 路由配置错误
//!
//! 所有错误都发生在注册（启动）阶段。请求解析阶段不会产生错误，
//! 未命中的路由以 `None` 表示。

use http::Method;

/// 注册/编译阶段的配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Malformed path template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Path template '{template}' binds parameter '{name}' more than once")]
    DuplicateParameter { template: String, name: String },

    #[error("Invalid pattern for parameter '{name}' in '{template}': {source}")]
    InvalidPattern {
        template: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Action {action}: {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("Action {action}: unknown path alias '#{alias}'")]
    UnknownAlias { action: String, alias: String },

    #[error("Action {action}: invalid HTTP method '{method}'")]
    InvalidHttpMethod { action: String, method: String },

    #[error("Path alias '{alias}' already points to '{existing}', cannot rebind it to '{path}'")]
    AliasConflict {
        alias: String,
        existing: String,
        path: String,
    },

    #[error("Action path '{path}' ({method}) is already registered by {existing}, cannot register {action}")]
    DuplicateActionPath {
        path: String,
        method: MethodLabel,
        existing: String,
        action: String,
    },
}

impl ConfigurationError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_action(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

/// 错误消息中使用的 HTTP 方法标签，`None` 表示任意方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLabel(pub Option<Method>);

impl std::fmt::Display for MethodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(method) => write!(f, "{}", method),
            None => f.write_str("any method"),
        }
    }
}

/// 路由模块的结果类型
pub type Result<T> = std::result::Result<T, ConfigurationError>;
