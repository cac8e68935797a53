//! 动作描述与动作配置
//!
//! `TypeDescriptor` / `MethodDescriptor` 是注册方提供的显式描述，
//! 取代运行时注解扫描；`ActionMethodParser` 把它们解析成不可变的
//! `ActionConfig`。

use http::Method;
use serde::{Serialize, Serializer};
use trellis_core::utils::naming::split_type_path;

/// 动作所属类型的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// 模块路径，例如 "app::web::tst"
    pub package: String,

    /// 类型名，例如 "BooAction"
    pub name: String,

    /// 类型级路径覆盖：以 `/` 开头为绝对路径，以 `/` 结尾时方法段作为子路径
    pub path: Option<String>,

    /// 模块级路径覆盖，取代根包推导出的前缀
    pub package_path: Option<String>,
}

impl TypeDescriptor {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            path: None,
            package_path: None,
        }
    }

    /// 根据 `std::any::type_name` 推导模块路径和类型名
    pub fn of<T: ?Sized>() -> Self {
        let (package, name) = split_type_path(std::any::type_name::<T>());
        Self::new(package, name)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_package_path(mut self, path: impl Into<String>) -> Self {
        self.package_path = Some(path.into());
        self
    }

    /// 完整类型名，作为动作的类型标识
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.package, self.name)
        }
    }
}

/// 动作方法的描述，每个字段都是可选的显式覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,

    /// 显式路径：`None` 使用约定，`""` 省略方法段，`/...` 绝对路径，
    /// `#alias` 引用路径别名
    pub path: Option<String>,

    /// 显式扩展名：`""` 表示不追加扩展名
    pub extension: Option<String>,

    /// HTTP 方法限制，例如 "POST"
    pub http_method: Option<String>,

    /// 为最终路径注册的别名
    pub alias: Option<String>,

    /// 结果类型标签
    pub result_type: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn no_extension(self) -> Self {
        self.extension("")
    }

    pub fn http_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn result_type(mut self, result_type: impl Into<String>) -> Self {
        self.result_type = Some(result_type.into());
        self
    }
}

/// 一个已解析的动作路由定义，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionConfig {
    /// 所属类型的完整名称
    pub action_class: String,

    /// 处理方法名
    pub action_handler: String,

    /// HTTP 方法限制，`None` 表示任意方法
    #[serde(serialize_with = "serialize_method")]
    pub action_method: Option<Method>,

    /// 规范路径模板
    pub action_path: String,

    /// 动作的扩展名，即使没有追加到绝对路径上也会记录
    pub action_path_extension: Option<String>,

    /// 结果类型标签
    pub result_type: Option<String>,

    /// 路径别名
    pub alias: Option<String>,
}

impl ActionConfig {
    /// `类型#方法`，用于日志和错误消息
    pub fn signature(&self) -> String {
        format!("{}#{}", self.action_class, self.action_handler)
    }

    pub fn has_macros(&self) -> bool {
        self.action_path.contains("${")
    }

    /// 路径是否已以 `.扩展名` 结尾；绝对路径 `/xxx` 记录了扩展名但没有追加
    pub fn extension_appended(&self) -> bool {
        self.action_path_extension.as_deref().is_some_and(|extension| {
            self.action_path
                .strip_suffix(extension)
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

fn serialize_method<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
    match method {
        Some(method) => serializer.serialize_some(method.as_str()),
        None => serializer.serialize_none(),
    }
}

/// 路由清单中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// HTTP 方法，"*" 表示任意方法
    pub method: String,
    pub path: String,
    pub action: String,
}

impl From<&ActionConfig> for RouteInfo {
    fn from(config: &ActionConfig) -> Self {
        Self {
            method: config
                .action_method
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "*".to_string()),
            path: config.action_path.clone(),
            action: config.signature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod shop {
        pub struct CartAction;
    }

    #[test]
    fn test_type_descriptor_of() {
        let descriptor = TypeDescriptor::of::<shop::CartAction>();
        assert_eq!(descriptor.name, "CartAction");
        assert_eq!(descriptor.package, "trellis_web::action::tests::shop");
        assert_eq!(
            descriptor.qualified_name(),
            "trellis_web::action::tests::shop::CartAction"
        );
    }

    #[test]
    fn test_method_descriptor_builder() {
        let method = MethodDescriptor::new("save")
            .path("/cart/save")
            .no_extension()
            .http_method("post")
            .alias("cartSave")
            .result_type("json");

        assert_eq!(method.path.as_deref(), Some("/cart/save"));
        assert_eq!(method.extension.as_deref(), Some(""));
        assert_eq!(method.http_method.as_deref(), Some("post"));
        assert_eq!(method.alias.as_deref(), Some("cartSave"));
        assert_eq!(method.result_type.as_deref(), Some("json"));
    }

    #[test]
    fn test_action_config_serializes_method() {
        let config = ActionConfig {
            action_class: "app::CartAction".to_string(),
            action_handler: "save".to_string(),
            action_method: Some(Method::POST),
            action_path: "/cart.save.html".to_string(),
            action_path_extension: Some("html".to_string()),
            result_type: None,
            alias: None,
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["action_method"], "POST");
        assert_eq!(json["action_path"], "/cart.save.html");
        assert!(json["result_type"].is_null());

        let route = RouteInfo::from(&config);
        assert_eq!(route.method, "POST");
        assert_eq!(route.action, "app::CartAction#save");
    }

    #[test]
    fn test_extension_appended() {
        let mut config = ActionConfig {
            action_class: "app::BooAction".to_string(),
            action_handler: "foo".to_string(),
            action_method: None,
            action_path: "/boo.foo.html".to_string(),
            action_path_extension: Some("html".to_string()),
            result_type: None,
            alias: None,
        };
        assert!(config.extension_appended());

        config.action_path = "/xxx".to_string();
        assert!(!config.extension_appended());

        config.action_path = "/xhtml".to_string();
        assert!(!config.extension_appended());

        config.action_path_extension = None;
        assert!(!config.extension_appended());
    }
}
