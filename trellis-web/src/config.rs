//! 路由引擎配置
//!
//! `RouterConfig` 汇总命名约定、根包映射和路径宏策略，
//! 启动时从 `Environment` 读取一次，之后只读。

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::Context;
use trellis_core::utils::naming::{module_segments, split_type_path};
use trellis_core::{CoreError, Environment};

use crate::constants::*;

/// 路径宏策略，注册表构建时选定，之后不再变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMacroKind {
    /// `${name}` / `${name:glob}`，约束为 `*` `?` 通配模式
    #[default]
    Wildcard,
    /// `${name:regex}`，约束为完整匹配的正则表达式
    Regex,
}

impl FromStr for PathMacroKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wildcard" | "glob" => Ok(PathMacroKind::Wildcard),
            "regex" | "regexp" => Ok(PathMacroKind::Regex),
            _ => Err(CoreError::InvalidValue {
                key: ROUTER_PATH_MACRO.to_string(),
                value: s.to_string(),
                expected: "wildcard or regex",
            }),
        }
    }
}

/// 根包：该模块下的动作类型以模块相对路径作为默认前缀
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPackage {
    /// 规范化的模块路径（`::` 连接）
    pub package: String,
    /// 映射到的 URL 前缀，例如 "/admin"；空字符串表示站点根
    pub path: String,
}

impl RootPackage {
    pub fn new(package: &str, path: &str) -> Self {
        Self {
            package: normalize_module(package),
            path: path.trim_end_matches('/').to_string(),
        }
    }

    /// 返回 `package` 相对于该根包的模块段；不在根包内时返回 `None`
    pub(crate) fn relative<'a>(&self, package: &'a str) -> Option<Vec<&'a str>> {
        let root = module_segments(&self.package);
        let segments = module_segments(package);
        if segments.len() < root.len() || segments[..root.len()] != root[..] {
            return None;
        }
        Some(segments[root.len()..].to_vec())
    }
}

/// 路由引擎配置
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// 默认扩展名（默认 "html"），`None` 表示不追加
    pub default_extension: Option<String>,

    /// 从类型名去除的后缀（默认 "Action"）
    pub action_class_suffix: String,

    /// 不产生方法段的方法名（默认 view、execute）
    pub default_action_method_names: Vec<String>,

    /// 根包列表，按最长匹配选择
    pub root_packages: Vec<RootPackage>,

    /// 包路径别名：规范化模块路径 -> URL 前缀
    pub package_aliases: HashMap<String, String>,

    /// 路径宏策略
    pub path_macro: PathMacroKind,

    /// 初始路径别名表
    pub path_aliases: Vec<(String, String)>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_extension: Some(DEFAULT_EXTENSION.to_string()),
            action_class_suffix: DEFAULT_ACTION_CLASS_SUFFIX.to_string(),
            default_action_method_names: DEFAULT_ACTION_METHOD_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            root_packages: Vec::new(),
            package_aliases: HashMap::new(),
            path_macro: PathMacroKind::default(),
            path_aliases: Vec::new(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置默认扩展名，空字符串等同于不追加扩展名
    pub fn default_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.default_extension = (!extension.is_empty()).then_some(extension);
        self
    }

    pub fn action_class_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.action_class_suffix = suffix.into();
        self
    }

    pub fn default_action_method_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_action_method_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// 添加根包映射
    pub fn root_package(mut self, package: &str, path: &str) -> Self {
        self.root_packages.push(RootPackage::new(package, path));
        self
    }

    /// 以类型 `T` 所在模块作为根包，映射到站点根
    pub fn root_package_of<T: ?Sized>(self) -> Self {
        let (module, _) = split_type_path(std::any::type_name::<T>());
        let module = module.to_string();
        self.root_package(&module, "")
    }

    /// 为某个模块指定固定的 URL 前缀
    pub fn package_alias(mut self, package: &str, path: impl Into<String>) -> Self {
        self.package_aliases
            .insert(normalize_module(package), path.into());
        self
    }

    pub fn path_macro(mut self, kind: PathMacroKind) -> Self {
        self.path_macro = kind;
        self
    }

    pub fn path_alias(mut self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.path_aliases.push((alias.into(), path.into()));
        self
    }

    pub fn is_default_action_method(&self, method_name: &str) -> bool {
        self.default_action_method_names
            .iter()
            .any(|name| name == method_name)
    }

    /// 查找 `package` 的最长匹配根包及相对模块段
    pub(crate) fn find_root_package<'a>(
        &self,
        package: &'a str,
    ) -> Option<(&RootPackage, Vec<&'a str>)> {
        self.root_packages
            .iter()
            .filter_map(|root| root.relative(package).map(|rel| (root, rel)))
            .max_by_key(|(root, _)| module_segments(&root.package).len())
    }

    /// 从 Environment 读取配置，未设置的键保留默认值
    pub fn from_environment(env: &Environment) -> trellis_core::Result<Self> {
        let mut config = Self::default();

        if let Some(extension) = env.get_string(ROUTER_DEFAULT_EXTENSION) {
            config = config.default_extension(extension);
        }
        if let Some(suffix) = env.get_string(ROUTER_ACTION_CLASS_SUFFIX) {
            config.action_class_suffix = suffix;
        }
        if let Some(names) = env.get_string_array(ROUTER_DEFAULT_ACTION_METHODS) {
            config.default_action_method_names = names;
        }
        if let Some(kind) = env.get_string(ROUTER_PATH_MACRO) {
            config.path_macro = kind
                .parse()
                .with_context(|| format!("Failed to read '{}'", ROUTER_PATH_MACRO))?;
        }

        for entry in env.get_string_array(ROUTER_ROOT_PACKAGES).unwrap_or_default() {
            let (package, path) = split_mapping(ROUTER_ROOT_PACKAGES, &entry)?;
            config = config.root_package(package, path);
        }
        for entry in env.get_string_array(ROUTER_PACKAGE_ALIASES).unwrap_or_default() {
            let (package, path) = split_mapping(ROUTER_PACKAGE_ALIASES, &entry)?;
            config = config.package_alias(package, path);
        }

        for alias in env.keys_with_prefix(ROUTER_PATH_ALIASES_PREFIX) {
            let key = format!("{}{}", ROUTER_PATH_ALIASES_PREFIX, alias);
            if let Some(path) = env.get_string(&key) {
                config.path_aliases.push((alias, path));
            }
        }

        tracing::debug!(
            "Router config loaded: extension={:?}, macro={:?}, {} root package(s), {} path alias(es)",
            config.default_extension,
            config.path_macro,
            config.root_packages.len(),
            config.path_aliases.len()
        );

        Ok(config)
    }
}

fn normalize_module(package: &str) -> String {
    module_segments(package).join("::")
}

/// 解析 "module=path" 形式的映射
fn split_mapping<'a>(key: &str, entry: &'a str) -> Result<(&'a str, &'a str), CoreError> {
    entry
        .split_once('=')
        .map(|(package, path)| (package.trim(), path.trim()))
        .filter(|(package, _)| !package.is_empty())
        .ok_or_else(|| CoreError::InvalidValue {
            key: key.to_string(),
            value: entry.to_string(),
            expected: "entries of the form 'module::path=/url/prefix'",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{MapPropertySource, TomlPropertySource};

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.default_extension.as_deref(), Some("html"));
        assert_eq!(config.action_class_suffix, "Action");
        assert!(config.is_default_action_method("view"));
        assert!(config.is_default_action_method("execute"));
        assert!(!config.is_default_action_method("foo"));
        assert_eq!(config.path_macro, PathMacroKind::Wildcard);
    }

    #[test]
    fn test_empty_default_extension_disables_it() {
        let config = RouterConfig::new().default_extension("");
        assert_eq!(config.default_extension, None);
    }

    #[test]
    fn test_root_package_longest_match() {
        let config = RouterConfig::new()
            .root_package("app", "")
            .root_package("app::admin", "/admin");

        let (root, rel) = config.find_root_package("app::admin::users").unwrap();
        assert_eq!(root.path, "/admin");
        assert_eq!(rel, vec!["users"]);

        let (root, rel) = config.find_root_package("app::shop").unwrap();
        assert_eq!(root.path, "");
        assert_eq!(rel, vec!["shop"]);

        assert!(config.find_root_package("other::shop").is_none());
        // 前缀相同但不是模块边界
        assert!(config.find_root_package("application").is_none());
    }

    #[test]
    fn test_root_package_of_type() {
        struct Marker;
        let config = RouterConfig::new().root_package_of::<Marker>();
        assert_eq!(config.root_packages.len(), 1);
        assert!(config.root_packages[0].package.starts_with("trellis_web::config"));
    }

    #[test]
    fn test_from_environment() {
        let env = Environment::new();
        env.add_property_source(Box::new(
            TomlPropertySource::parse(
                r#"
                [trellis.router]
                default-extension = "do"
                path-macro = "regex"
                root-packages = ["app=/", "app::admin=/admin"]
                package-aliases = "app::legacy=/old"

                [trellis.router.path-aliases]
                home = "/index.do"
                "#,
                "router.toml",
            )
            .unwrap(),
        ));

        let config = RouterConfig::from_environment(&env).unwrap();
        assert_eq!(config.default_extension.as_deref(), Some("do"));
        assert_eq!(config.path_macro, PathMacroKind::Regex);
        assert_eq!(config.root_packages.len(), 2);
        assert_eq!(config.root_packages[1], RootPackage::new("app::admin", "/admin"));
        assert_eq!(config.package_aliases.get("app::legacy").map(String::as_str), Some("/old"));
        assert_eq!(
            config.path_aliases,
            vec![("home".to_string(), "/index.do".to_string())]
        );
    }

    #[test]
    fn test_from_environment_rejects_unknown_macro_kind() {
        let env = Environment::new();
        env.add_property_source(Box::new(
            MapPropertySource::new("m").with_property(ROUTER_PATH_MACRO, "ant"),
        ));
        let err = RouterConfig::from_environment(&env).unwrap_err();
        assert!(format!("{:#}", err).contains("wildcard or regex"));
    }

    #[test]
    fn test_from_environment_rejects_bad_mapping() {
        let env = Environment::new();
        env.add_property_source(Box::new(
            MapPropertySource::new("m").with_property(ROUTER_ROOT_PACKAGES, "app"),
        ));
        assert!(RouterConfig::from_environment(&env).is_err());
    }
}
