//! 路由配置常量定义
//!
//! 定义所有路由引擎使用的配置键名称及默认值

// ==================== 命名约定 ====================

/// 默认扩展名，空字符串表示不追加扩展名
pub const ROUTER_DEFAULT_EXTENSION: &str = "trellis.router.default-extension";

/// 从类型名中去除的后缀
pub const ROUTER_ACTION_CLASS_SUFFIX: &str = "trellis.router.action-class-suffix";

/// 不产生方法段的默认方法名
pub const ROUTER_DEFAULT_ACTION_METHODS: &str = "trellis.router.default-action-methods";

/// 根包映射，格式 "app::web=/" 或 "app::admin=/admin"
pub const ROUTER_ROOT_PACKAGES: &str = "trellis.router.root-packages";

/// 包路径别名，格式 "app::web::legacy=/old"
pub const ROUTER_PACKAGE_ALIASES: &str = "trellis.router.package-aliases";

// ==================== 路径宏 ====================

/// 路径宏策略：wildcard / regex
pub const ROUTER_PATH_MACRO: &str = "trellis.router.path-macro";

/// 路径别名表前缀，例如 trellis.router.path-aliases.home = "/index.html"
pub const ROUTER_PATH_ALIASES_PREFIX: &str = "trellis.router.path-aliases.";

// ==================== 默认值 ====================

pub const DEFAULT_EXTENSION: &str = "html";

pub const DEFAULT_ACTION_CLASS_SUFFIX: &str = "Action";

pub const DEFAULT_ACTION_METHOD_NAMES: &[&str] = &["view", "execute"];
