//! 请求路径解析
//!
//! 解析顺序：
//!
//! 1. 完整路径的精确匹配
//! 2. 去掉扩展名后的精确匹配，仅接受记录了相同扩展名、且路径本身没有
//!    追加扩展名的动作（例如绝对路径 `/xxx` 的动作也响应 `/xxx.html`）
//! 3. 按优先级逐个尝试含宏的模板
//!
//! 每一步都先找方法完全一致的动作，再找不限方法的动作。解析从不报错，
//! 未命中返回 `None`。

use std::sync::Arc;

use http::Method;

use crate::action::ActionConfig;
use crate::config_set::ActionConfigSet;
use crate::registry::ActionsManager;

/// 一次成功的解析结果
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    config: Arc<ActionConfig>,
    config_set: Arc<ActionConfigSet>,
    params: Vec<(String, String)>,
    extension: Option<String>,
}

impl ResolvedAction {
    pub fn config(&self) -> &Arc<ActionConfig> {
        &self.config
    }

    pub fn config_set(&self) -> &Arc<ActionConfigSet> {
        &self.config_set
    }

    /// 路径参数，按模板中出现的顺序
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 请求路径的扩展名
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn into_config(self) -> Arc<ActionConfig> {
        self.config
    }
}

/// 请求路径到动作的映射器
#[derive(Debug, Clone)]
pub struct ActionPathMapper {
    manager: Arc<ActionsManager>,
}

impl ActionPathMapper {
    pub fn new(manager: Arc<ActionsManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<ActionsManager> {
        &self.manager
    }

    /// 解析请求路径和方法
    pub fn resolve(&self, path: &str, method: &Method) -> Option<ResolvedAction> {
        let table = self.manager.snapshot();
        let extension = request_extension(path);
        let resolved = |config: &Arc<ActionConfig>, set: &Arc<ActionConfigSet>, params| ResolvedAction {
            config: config.clone(),
            config_set: set.clone(),
            params,
            extension: extension.map(String::from),
        };

        if let Some(set) = table.exact(path) {
            if let Some(config) = set.lookup(method) {
                tracing::trace!("{} {} -> {}", method, path, config.signature());
                return Some(resolved(config, set, Vec::new()));
            }
        }

        if let Some(extension) = extension {
            let base = &path[..path.len() - extension.len() - 1];
            if let Some(set) = table.exact(base) {
                let config = set.lookup_by(method, |config| {
                    !config.extension_appended()
                        && config.action_path_extension.as_deref() == Some(extension)
                });
                if let Some(config) = config {
                    tracing::trace!("{} {} -> {} (extension)", method, path, config.signature());
                    return Some(resolved(config, set, Vec::new()));
                }
            }
        }

        let chunks: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
        for set in table.macro_sets() {
            if set.deep() != chunks.len() {
                continue;
            }
            let Some(params) = set.match_chunks(&chunks) else {
                continue;
            };
            if let Some(config) = set.lookup(method) {
                tracing::trace!("{} {} -> {} {:?}", method, path, config.signature(), params);
                return Some(resolved(config, set, params));
            }
        }

        tracing::trace!("{} {} -> no action", method, path);
        None
    }

    /// 以方法名字符串解析，无效的方法名视为未命中
    pub fn resolve_str(&self, path: &str, method: &str) -> Option<ResolvedAction> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok()?;
        self.resolve(path, &method)
    }
}

/// 最后一个路径块中最后一个 `.` 之后的部分
fn request_extension(path: &str) -> Option<&str> {
    let last = path.rsplit('/').next()?;
    match last.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < last.len() => Some(&last[dot + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MethodDescriptor, TypeDescriptor};
    use crate::config::{PathMacroKind, RouterConfig};

    fn mapper(config: RouterConfig) -> ActionPathMapper {
        ActionPathMapper::new(Arc::new(ActionsManager::new(config).unwrap()))
    }

    fn boo() -> TypeDescriptor {
        TypeDescriptor::new("app::tst", "BooAction")
    }

    #[test]
    fn test_request_extension() {
        assert_eq!(request_extension("/boo.foo.html"), Some("html"));
        assert_eq!(request_extension("/re/user/173/macro"), None);
        assert_eq!(request_extension("/dir.d/file"), None);
        assert_eq!(request_extension("/.hidden"), None);
        assert_eq!(request_extension("/trailing."), None);
    }

    #[test]
    fn test_exact_hit_and_miss() {
        let mapper = mapper(RouterConfig::default());
        mapper
            .manager()
            .register(&boo(), &MethodDescriptor::new("foo"))
            .unwrap();

        let resolved = mapper.resolve("/boo.foo.html", &Method::GET).unwrap();
        assert_eq!(resolved.config().action_handler, "foo");
        assert_eq!(resolved.extension(), Some("html"));
        assert!(resolved.params().is_empty());

        assert!(mapper.resolve("/boo.foo.htm", &Method::GET).is_none());
        assert!(mapper.resolve("/boo.bar.html", &Method::GET).is_none());
        assert!(mapper.resolve("boo.foo.html", &Method::GET).is_none());
    }

    #[test]
    fn test_absolute_path_accepts_recorded_extension() {
        let mapper = mapper(RouterConfig::default());
        mapper
            .manager()
            .register(&boo(), &MethodDescriptor::new("foo4").path("/xxx"))
            .unwrap();

        assert_eq!(mapper.resolve("/xxx", &Method::GET).unwrap().config().action_handler, "foo4");
        let resolved = mapper.resolve("/xxx.html", &Method::GET).unwrap();
        assert_eq!(resolved.config().action_handler, "foo4");
        assert_eq!(resolved.extension(), Some("html"));
        assert!(mapper.resolve("/xxx.json", &Method::GET).is_none());
    }

    #[test]
    fn test_extension_is_not_stripped_twice() {
        let mapper = mapper(RouterConfig::default());
        let manager = mapper.manager();
        manager
            .register(&boo(), &MethodDescriptor::new("foo"))
            .unwrap();
        manager
            .register(&boo(), &MethodDescriptor::new("foo5").path("/xxx.html"))
            .unwrap();

        assert!(mapper.resolve("/boo.foo.html", &Method::GET).is_some());
        assert!(mapper.resolve("/boo.foo.html.html", &Method::GET).is_none());
        assert!(mapper.resolve("/xxx.html.html", &Method::GET).is_none());
    }

    #[test]
    fn test_method_specific_wins_over_unrestricted() {
        let mapper = mapper(RouterConfig::default());
        let manager = mapper.manager();
        manager
            .register(&boo(), &MethodDescriptor::new("foo4").path("/xxx"))
            .unwrap();
        manager
            .register(
                &boo(),
                &MethodDescriptor::new("foo41").path("/xxx").http_method("DELETE"),
            )
            .unwrap();

        assert_eq!(mapper.resolve("/xxx", &Method::DELETE).unwrap().config().action_handler, "foo41");
        assert_eq!(mapper.resolve("/xxx", &Method::PUT).unwrap().config().action_handler, "foo4");
        assert_eq!(mapper.resolve_str("/xxx", "delete").unwrap().config().action_handler, "foo41");
        assert!(mapper.resolve_str("/xxx", "BAD METHOD").is_none());
    }

    #[test]
    fn test_macro_binding() {
        let mapper = mapper(RouterConfig::default());
        let re = TypeDescriptor::new("app", "ReAction").with_path("/re/");
        mapper
            .manager()
            .register(&re, &MethodDescriptor::new("macro").path("user/${id}/macro"))
            .unwrap();

        let resolved = mapper.resolve("/re/user/173/macro.html", &Method::GET).unwrap();
        assert_eq!(resolved.param("id"), Some("173"));
        assert_eq!(resolved.param("missing"), None);
        assert_eq!(resolved.config_set().action_path, "/re/user/${id}/macro.html");

        // 块数不同
        assert!(mapper.resolve("/re/user/173/x/macro.html", &Method::GET).is_none());
        assert!(mapper.resolve("/re/user/macro.html", &Method::GET).is_none());
    }

    #[test]
    fn test_constraint_falls_through() {
        let mapper = mapper(RouterConfig::new().path_macro(PathMacroKind::Regex));
        let duplo = TypeDescriptor::new("app", "DuploAction").with_path("/duplo/");
        let manager = mapper.manager();
        manager
            .register(&duplo, &MethodDescriptor::new("text").path("${sid}").no_extension())
            .unwrap();
        manager
            .register(&duplo, &MethodDescriptor::new("numeric").path("${id:^[0-9]+}").no_extension())
            .unwrap();

        let resolved = mapper.resolve("/duplo/123", &Method::GET).unwrap();
        assert_eq!(resolved.config().action_handler, "numeric");
        assert_eq!(resolved.param("id"), Some("123"));

        let resolved = mapper.resolve("/duplo/aaa", &Method::GET).unwrap();
        assert_eq!(resolved.config().action_handler, "text");
        assert_eq!(resolved.param("sid"), Some("aaa"));
    }

    #[test]
    fn test_method_mismatch_keeps_scanning() {
        let mapper = mapper(RouterConfig::default());
        let re = TypeDescriptor::new("app", "ReAction").with_path("/re/");
        let manager = mapper.manager();
        manager
            .register(&re, &MethodDescriptor::new("update").path("item/edit.${id}").http_method("POST"))
            .unwrap();
        manager
            .register(&re, &MethodDescriptor::new("show").path("${kind}/edit.${id}"))
            .unwrap();

        assert_eq!(
            mapper.resolve("/re/item/edit.7.html", &Method::POST).unwrap().config().action_handler,
            "update"
        );
        let resolved = mapper.resolve("/re/item/edit.7.html", &Method::GET).unwrap();
        assert_eq!(resolved.config().action_handler, "show");
        assert_eq!(resolved.param("kind"), Some("item"));
    }

    #[test]
    fn test_snapshot_sees_later_registrations() {
        let mapper = mapper(RouterConfig::default());
        assert!(mapper.resolve("/boo.foo.html", &Method::GET).is_none());

        mapper
            .manager()
            .register(&boo(), &MethodDescriptor::new("foo"))
            .unwrap();
        assert!(mapper.resolve("/boo.foo.html", &Method::GET).is_some());
    }
}
