//! 编译后的路径模板
//!
//! 同一个路径模板的所有动作（按 HTTP 方法区分）共享一个
//! `ActionConfigSet`。

use std::sync::Arc;

use http::Method;

use crate::action::ActionConfig;
use crate::error::{ConfigurationError, MethodLabel, Result};
use crate::path_macro::PathMacros;

/// 一个路径模板的可匹配形式
#[derive(Debug, Clone)]
pub struct ActionConfigSet {
    /// 路径模板
    pub action_path: String,

    /// 模板按 `/` 切分出的块（不含开头的 `/`）
    pub action_path_chunks: Vec<String>,

    /// 每个块一个槽位：字面量块为 `None`
    pub action_path_macros: Vec<Option<Arc<dyn PathMacros>>>,

    /// 共享该模板的动作，每个 HTTP 方法至多一个，外加至多一个不限方法的
    configs: Vec<Arc<ActionConfig>>,
}

impl ActionConfigSet {
    pub(crate) fn new(
        action_path: String,
        action_path_chunks: Vec<String>,
        action_path_macros: Vec<Option<Arc<dyn PathMacros>>>,
    ) -> Self {
        Self {
            action_path,
            action_path_chunks,
            action_path_macros,
            configs: Vec::new(),
        }
    }

    /// 块数
    pub fn deep(&self) -> usize {
        self.action_path_chunks.len()
    }

    pub fn has_macros(&self) -> bool {
        self.action_path_macros.iter().any(Option::is_some)
    }

    pub fn configs(&self) -> &[Arc<ActionConfig>] {
        &self.configs
    }

    /// 按请求方法选择动作：先找方法完全一致的，再找不限方法的
    pub fn lookup(&self, method: &Method) -> Option<&Arc<ActionConfig>> {
        self.lookup_by(method, |_| true)
    }

    /// 同 `lookup`，但只考虑满足 `accept` 的动作
    pub fn lookup_by<F>(&self, method: &Method, accept: F) -> Option<&Arc<ActionConfig>>
    where
        F: Fn(&ActionConfig) -> bool,
    {
        let mut candidates = self.configs.iter().filter(|config| accept(Arc::as_ref(config)));
        candidates
            .clone()
            .find(|config| config.action_method.as_ref() == Some(method))
            .or_else(|| candidates.find(|config| config.action_method.is_none()))
    }

    /// 返回加入 `config` 后的新集合；同一方法已被其他动作占用时报错
    pub(crate) fn with_config(&self, config: Arc<ActionConfig>) -> Result<Self> {
        if let Some(existing) = self
            .configs
            .iter()
            .find(|existing| existing.action_method == config.action_method)
        {
            return Err(ConfigurationError::DuplicateActionPath {
                path: self.action_path.clone(),
                method: MethodLabel(config.action_method.clone()),
                existing: existing.signature(),
                action: config.signature(),
            });
        }

        let mut set = self.clone();
        set.configs.push(config);
        Ok(set)
    }

    /// 逐块匹配请求路径，成功时返回参数绑定
    pub fn match_chunks(&self, chunks: &[&str]) -> Option<Vec<(String, String)>> {
        if chunks.len() != self.deep() {
            return None;
        }

        let mut params = Vec::new();
        for ((chunk, template), path_macros) in chunks
            .iter()
            .zip(&self.action_path_chunks)
            .zip(&self.action_path_macros)
        {
            match path_macros {
                None => {
                    if *chunk != template.as_str() {
                        return None;
                    }
                }
                Some(path_macros) => {
                    let values = path_macros.try_match(chunk)?;
                    params.extend(path_macros.names().iter().cloned().zip(values));
                }
            }
        }
        Some(params)
    }

    /// 优先级键，越大越先匹配：字面量块数、带约束参数数、字面量字符数
    pub(crate) fn specificity(&self) -> (usize, usize, usize) {
        let mut literal_chunks = 0;
        let mut constrained = 0;
        let mut literal_chars = 0;
        for (chunk, path_macros) in self.action_path_chunks.iter().zip(&self.action_path_macros) {
            match path_macros {
                None => {
                    literal_chunks += 1;
                    literal_chars += chunk.len();
                }
                Some(path_macros) => {
                    constrained += path_macros.constrained_count();
                    literal_chars += path_macros.literal_len();
                }
            }
        }
        (literal_chunks, constrained, literal_chars)
    }
}
