//! 动作命名解析器
//!
//! 根据命名约定和显式覆盖，把 (类型, 方法) 描述解析成 `ActionConfig`：
//!
//! ```text
//! <包前缀><类段>.<方法段>.<扩展名>
//! app::tst::BooAction#foo    ->  /tst/boo.foo.html   (根包 app)
//! app::tst::BooAction#view   ->  /tst/boo.html       (默认方法名)
//! ```
//!
//! 解析是纯计算：不注册任何东西，只读取配置和别名表。

use std::sync::Arc;

use http::Method;
use trellis_core::utils::naming::{module_segments, strip_type_suffix, to_camel_case};

use crate::action::{ActionConfig, MethodDescriptor, TypeDescriptor};
use crate::alias::PathAliases;
use crate::config::RouterConfig;
use crate::error::{ConfigurationError, Result};

const PLACEHOLDER_START: &str = "${:";

/// 动作命名解析器
#[derive(Debug, Clone)]
pub struct ActionMethodParser {
    config: Arc<RouterConfig>,
    aliases: Arc<PathAliases>,
}

impl ActionMethodParser {
    pub fn new(config: Arc<RouterConfig>, aliases: Arc<PathAliases>) -> Self {
        Self { config, aliases }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// 解析一个动作方法
    pub fn parse(&self, action_type: &TypeDescriptor, method: &MethodDescriptor) -> Result<ActionConfig> {
        let action = format!("{}#{}", action_type.qualified_name(), method.name);
        if method.name.is_empty() {
            return Err(ConfigurationError::invalid_action(action, "empty method name"));
        }

        let class_name = to_camel_case(strip_type_suffix(
            &action_type.name,
            &self.config.action_class_suffix,
        ));
        let extension = match method.extension.as_deref() {
            None => self.config.default_extension.clone(),
            Some("") => None,
            Some(extension) => Some(extension.trim_start_matches('.').to_string()),
        };

        let action_path = match self.method_path(&action, &class_name, method)? {
            // 绝对路径原样使用，不追加扩展名
            Some(path) if path.starts_with('/') => path,
            method_path => {
                let mut path = self.class_path(&action, &class_name, action_type)?;
                let child = path.ends_with('/');
                if let Some(method_path) = method_path {
                    if !child {
                        path.push('.');
                    }
                    path.push_str(&method_path);
                }
                if let Some(extension) = &extension {
                    if !path.ends_with('/') {
                        path.push('.');
                        path.push_str(extension);
                    }
                }
                path
            }
        };

        if action_path.contains("//") {
            return Err(ConfigurationError::invalid_action(
                action,
                format!("action path '{}' contains an empty segment", action_path),
            ));
        }

        let config = ActionConfig {
            action_class: action_type.qualified_name(),
            action_handler: method.name.clone(),
            action_method: parse_http_method(&action, method.http_method.as_deref())?,
            action_path,
            action_path_extension: extension,
            result_type: method.result_type.clone().filter(|r| !r.is_empty()),
            alias: match method.alias.as_deref() {
                Some("") => {
                    return Err(ConfigurationError::invalid_action(action, "empty alias name"))
                }
                alias => alias.map(String::from),
            },
        };

        tracing::trace!("Parsed action {} -> {}", action, config.action_path);
        Ok(config)
    }

    /// 方法段：`None` 表示省略
    fn method_path(&self, action: &str, class_name: &str, method: &MethodDescriptor) -> Result<Option<String>> {
        let explicit = match method.path.as_deref() {
            None if self.config.is_default_action_method(&method.name) => return Ok(None),
            None => return Ok(Some(method.name.clone())),
            Some("") => return Ok(None),
            Some(path) => path,
        };

        let path = match explicit.strip_prefix('#') {
            Some(alias) => self.resolve_alias(action, alias)?,
            None => explicit.to_string(),
        };
        let path = replace_placeholders(action, &path, &method.name, class_name)?;
        Ok((!path.is_empty()).then_some(path))
    }

    fn resolve_alias(&self, action: &str, alias: &str) -> Result<String> {
        if alias.is_empty() || alias.contains(char::is_whitespace) {
            return Err(ConfigurationError::invalid_action(
                action,
                format!("malformed alias reference '#{}'", alias),
            ));
        }
        self.aliases
            .lookup(alias)
            .ok_or_else(|| ConfigurationError::UnknownAlias {
                action: action.to_string(),
                alias: alias.to_string(),
            })
    }

    /// 类段（含包前缀）
    fn class_path(&self, action: &str, class_name: &str, action_type: &TypeDescriptor) -> Result<String> {
        let segment = match action_type.path.as_deref() {
            Some(path) => replace_placeholders(action, path, "", class_name)?,
            None => class_name.to_string(),
        };
        if segment.starts_with('/') {
            return Ok(segment);
        }
        Ok(format!("{}{}", self.package_path(action_type), segment))
    }

    /// 包前缀，总是以 `/` 开头和结尾
    fn package_path(&self, action_type: &TypeDescriptor) -> String {
        if let Some(path) = &action_type.package_path {
            return as_directory(path);
        }

        let package = module_segments(&action_type.package).join("::");
        if let Some(path) = self.config.package_aliases.get(&package) {
            return as_directory(path);
        }

        if self.config.root_packages.is_empty() {
            return "/".to_string();
        }
        match self.config.find_root_package(&package) {
            Some((root, relative)) => as_directory(&format!("{}/{}", root.path, relative.join("/"))),
            None => {
                tracing::debug!(
                    "Type {} is outside every root package, using '/'",
                    action_type.qualified_name()
                );
                "/".to_string()
            }
        }
    }
}

fn as_directory(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// 替换 `${:method}` 和 `${:class}` 占位符
fn replace_placeholders(action: &str, path: &str, method_name: &str, class_name: &str) -> Result<String> {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find(PLACEHOLDER_START) {
        result.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_START.len()..];
        let end = after.find('}').ok_or_else(|| {
            ConfigurationError::invalid_action(action, format!("unterminated placeholder in '{}'", path))
        })?;

        match &after[..end] {
            "method" if !method_name.is_empty() => result.push_str(method_name),
            "class" => result.push_str(class_name),
            other => {
                return Err(ConfigurationError::invalid_action(
                    action,
                    format!("unknown placeholder '${{:{}}}' in '{}'", other, path),
                ))
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

fn parse_http_method(action: &str, method: Option<&str>) -> Result<Option<Method>> {
    let method = match method.map(str::trim) {
        None | Some("") | Some("*") => return Ok(None),
        Some(method) => method.to_ascii_uppercase(),
    };
    Method::from_bytes(method.as_bytes())
        .map(Some)
        .map_err(|_| ConfigurationError::InvalidHttpMethod {
            action: action.to_string(),
            method,
        })
}
