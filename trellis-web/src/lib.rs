//! # Trellis Web
//!
//! 基于命名约定的动作路由引擎
//!
//! ## 核心特性
//!
//! - **命名约定** - 从类型名和方法名推导默认路径，例如 `BooAction#foo` -> `/boo.foo.html`
//! - **路径宏** - `${id}` / `${id:pattern}` 参数，支持通配符和正则两种策略
//! - **无锁解析** - 路由表以不可变快照发布，请求解析不加锁
//! - **编译时注册** - 通过 inventory 收集动作描述
//!
//! ```
//! use http::Method;
//! use std::sync::Arc;
//! use trellis_web::prelude::*;
//!
//! let manager = Arc::new(ActionsManager::new(RouterConfig::default()).unwrap());
//! let user = TypeDescriptor::new("app", "UserAction").with_path("/user/");
//! manager
//!     .register(&user, &MethodDescriptor::new("show").path("${id}/show"))
//!     .unwrap();
//!
//! let mapper = ActionPathMapper::new(manager);
//! let resolved = mapper.resolve("/user/173/show.html", &Method::GET).unwrap();
//! assert_eq!(resolved.param("id"), Some("173"));
//! ```

pub mod action;
pub mod alias;
pub mod compiler;
pub mod config;
pub mod config_set;
pub mod constants;
pub mod error;
pub mod parser;
pub mod path_macro;
pub mod registration;
pub mod registry;
pub mod resolver;

pub use action::{ActionConfig, MethodDescriptor, RouteInfo, TypeDescriptor};
pub use alias::PathAliases;
pub use compiler::MacroCompiler;
pub use config::{PathMacroKind, RootPackage, RouterConfig};
pub use config_set::ActionConfigSet;
pub use error::{ConfigurationError, MethodLabel, Result};
pub use parser::ActionMethodParser;
pub use path_macro::{ChunkPart, PathMacros, RegexPathMacros, WildcardPathMacros};
pub use registration::ActionRegistration;
pub use registry::{ActionsManager, RouteTable};
pub use resolver::{ActionPathMapper, ResolvedAction};

// 导出 inventory，供注册使用
pub use inventory;

pub mod prelude {
    //! 预导入模块

    pub use crate::action::{ActionConfig, MethodDescriptor, RouteInfo, TypeDescriptor};
    pub use crate::config::{PathMacroKind, RouterConfig};
    pub use crate::error::ConfigurationError;
    pub use crate::registration::ActionRegistration;
    pub use crate::registry::ActionsManager;
    pub use crate::resolver::{ActionPathMapper, ResolvedAction};
}
