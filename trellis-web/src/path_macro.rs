//! 路径宏：单个路径块的匹配器
//!
//! 一个路径块（两个 `/` 之间的内容）可以混合字面量和参数，例如
//! `wild${id}cat.html`。整个块编译成一个锚定的正则表达式：字面量转义，
//! 每个参数一个命名捕获组，参数约束直接参与切分。两种策略只在约束的
//! 写法上不同：通配符策略把约束当作 `*` / `?` 模式，正则策略把约束当作
//! 完整匹配参数值的正则表达式。

use std::fmt;

use regex::Regex;

use crate::error::{ConfigurationError, Result};

/// 无约束参数：至少一个字符，尽量短
const DEFAULT_PARAM: &str = "[^/]+?";

/// 最后一块带扩展名时的无约束参数，不跨越 `.`
const DEFAULT_PARAM_NO_DOT: &str = "[^/.]+?";

/// 路径块中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPart {
    Literal(String),
    Param {
        name: String,
        pattern: Option<String>,
    },
}

/// 路径块匹配能力
///
/// 实现必须是无状态的：`try_match` 只读取自身，可被任意多个线程并发调用。
pub trait PathMacros: Send + Sync + fmt::Debug {
    /// 参数名，按出现顺序
    fn names(&self) -> &[String];

    /// 参数约束，与 `names()` 一一对应
    fn patterns(&self) -> &[Option<String>];

    /// 匹配一个请求路径块，成功时返回与 `names()` 顺序一致的参数值
    fn try_match(&self, chunk: &str) -> Option<Vec<String>>;

    /// 带约束的参数个数，用于路由优先级排序
    fn constrained_count(&self) -> usize {
        self.patterns().iter().filter(|p| p.is_some()).count()
    }

    /// 字面量字符数，用于路由优先级排序
    fn literal_len(&self) -> usize;
}

/// 两种策略共享的块布局
#[derive(Debug, Clone)]
pub(crate) struct ChunkLayout {
    parts: Vec<ChunkPart>,
    names: Vec<String>,
    patterns: Vec<Option<String>>,
    /// 默认约束是否排除扩展名分隔符 `.`
    default_excludes_dot: bool,
}

impl ChunkLayout {
    pub(crate) fn new(parts: Vec<ChunkPart>, default_excludes_dot: bool) -> Self {
        let (names, patterns) = parts
            .iter()
            .filter_map(|part| match part {
                ChunkPart::Param { name, pattern } => Some((name.clone(), pattern.clone())),
                ChunkPart::Literal(_) => None,
            })
            .unzip();
        Self {
            parts,
            names,
            patterns,
            default_excludes_dot,
        }
    }

    fn literal_len(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                ChunkPart::Literal(literal) => literal.len(),
                ChunkPart::Param { .. } => 0,
            })
            .sum()
    }

    /// 编译整块的匹配正则，`constraint` 把显式约束翻译成正则片段
    fn compile<F>(&self, template: &str, constraint: F) -> Result<ChunkRegex>
    where
        F: Fn(&str) -> String,
    {
        let mut expr = String::from("^");
        let mut groups: Vec<String> = Vec::with_capacity(self.names.len());

        for part in &self.parts {
            match part {
                ChunkPart::Literal(literal) => expr.push_str(&regex::escape(literal)),
                ChunkPart::Param { pattern, .. } => {
                    let group = format!("__p{}", groups.len());
                    let fragment = match pattern {
                        Some(pattern) => constraint(pattern.as_str()),
                        None if self.default_excludes_dot => DEFAULT_PARAM_NO_DOT.to_string(),
                        None => DEFAULT_PARAM.to_string(),
                    };
                    expr.push_str(&format!("(?P<{}>{})", group, fragment));
                    groups.push(group);
                }
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|source| ConfigurationError::InvalidPattern {
            template: template.to_string(),
            name: self.names.join(", "),
            source,
        })?;
        Ok(ChunkRegex { regex, groups })
    }
}

/// 编译后的块正则及参数对应的捕获组名
#[derive(Debug, Clone)]
struct ChunkRegex {
    regex: Regex,
    groups: Vec<String>,
}

impl ChunkRegex {
    fn captures(&self, chunk: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(chunk)?;
        self.groups
            .iter()
            .map(|group| captures.name(group).map(|m| m.as_str().to_string()))
            .collect()
    }
}

/// 通配符策略：`${name}` 或 `${name:glob}`
#[derive(Debug, Clone)]
pub struct WildcardPathMacros {
    layout: ChunkLayout,
    matcher: ChunkRegex,
}

impl WildcardPathMacros {
    pub(crate) fn new(template: &str, layout: ChunkLayout) -> Result<Self> {
        let matcher = layout.compile(template, glob_to_regex)?;
        Ok(Self { layout, matcher })
    }
}

impl PathMacros for WildcardPathMacros {
    fn names(&self) -> &[String] {
        &self.layout.names
    }

    fn patterns(&self) -> &[Option<String>] {
        &self.layout.patterns
    }

    fn try_match(&self, chunk: &str) -> Option<Vec<String>> {
        self.matcher.captures(chunk)
    }

    /// 只由 `*` 组成的模式接受任何值，不算约束
    fn constrained_count(&self) -> usize {
        self.layout
            .patterns
            .iter()
            .flatten()
            .filter(|pattern| !pattern.chars().all(|c| c == '*'))
            .count()
    }

    fn literal_len(&self) -> usize {
        self.layout.literal_len()
    }
}

/// 正则策略：`${name}` 或 `${name:regex}`，正则需完整匹配参数值
#[derive(Debug, Clone)]
pub struct RegexPathMacros {
    layout: ChunkLayout,
    matcher: ChunkRegex,
}

impl RegexPathMacros {
    pub(crate) fn new(template: &str, layout: ChunkLayout) -> Result<Self> {
        // 先逐个校验，错误消息才能指出具体参数
        for (name, pattern) in layout.names.iter().zip(&layout.patterns) {
            if let Some(pattern) = pattern {
                Regex::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
                    template: template.to_string(),
                    name: name.clone(),
                    source,
                })?;
            }
        }

        let matcher = layout.compile(template, |pattern| {
            format!("(?:{})", strip_anchors(pattern))
        })?;
        Ok(Self { layout, matcher })
    }
}

impl PathMacros for RegexPathMacros {
    fn names(&self) -> &[String] {
        &self.layout.names
    }

    fn patterns(&self) -> &[Option<String>] {
        &self.layout.patterns
    }

    fn try_match(&self, chunk: &str) -> Option<Vec<String>> {
        self.matcher.captures(chunk)
    }

    fn literal_len(&self) -> usize {
        self.layout.literal_len()
    }
}

/// 把通配符模式翻译成正则片段：`*` 匹配任意长度（含空），`?` 匹配单个字符
fn glob_to_regex(pattern: &str) -> String {
    let mut fragment = String::with_capacity(pattern.len() * 2);
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => fragment.push_str(".*"),
            '?' => fragment.push('.'),
            c => fragment.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    fragment
}

/// 参数值总是完整匹配，去掉约束首尾多余的 `^` / `$`
fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => pattern,
    }
}
