//! 路径别名表
//!
//! 动作可以用 `alias` 声明一个名字，其他动作在显式路径里用 `#name`
//! 引用它。别名只在注册阶段解析一次。

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{ConfigurationError, Result};

/// 别名名称 -> 动作路径
#[derive(Debug, Default)]
pub struct PathAliases {
    aliases: RwLock<HashMap<String, String>>,
}

impl PathAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册别名；同名别名重复注册相同路径是幂等的，指向不同路径则报错
    pub fn register(&self, alias: &str, path: &str) -> Result<()> {
        let mut aliases = self.aliases.write();
        match aliases.get(alias) {
            Some(existing) if existing == path => Ok(()),
            Some(existing) => Err(ConfigurationError::AliasConflict {
                alias: alias.to_string(),
                existing: existing.clone(),
                path: path.to_string(),
            }),
            None => {
                tracing::debug!("Registered path alias '{}' -> '{}'", alias, path);
                aliases.insert(alias.to_string(), path.to_string());
                Ok(())
            }
        }
    }

    pub fn lookup(&self, alias: &str) -> Option<String> {
        self.aliases.read().get(alias).cloned()
    }

    pub fn len(&self) -> usize {
        self.aliases.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.read().is_empty()
    }
}
