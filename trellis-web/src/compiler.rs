//! 路径宏编译器
//!
//! 把 `/re/user/${id}/macro.html` 这样的路径模板编译成 `ActionConfigSet`：
//! 每个 `/` 块一个槽位，字面量块为 `None`，含参数的块为策略对应的
//! `PathMacros`。所有语法错误都在这里（注册阶段）报告。

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::PathMacroKind;
use crate::config_set::ActionConfigSet;
use crate::error::{ConfigurationError, Result};
use crate::path_macro::{ChunkLayout, ChunkPart, PathMacros, RegexPathMacros, WildcardPathMacros};

const MACRO_START: &str = "${";

/// 宏编译器，策略在构建时选定
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroCompiler {
    kind: PathMacroKind,
}

impl MacroCompiler {
    pub fn new(kind: PathMacroKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PathMacroKind {
        self.kind
    }

    /// 模板是否含有路径宏
    pub fn has_macros(template: &str) -> bool {
        template.contains(MACRO_START)
    }

    /// 编译路径模板
    pub fn compile(&self, template: &str) -> Result<ActionConfigSet> {
        let body = template
            .strip_prefix('/')
            .ok_or_else(|| ConfigurationError::malformed(template, "path must start with '/'"))?;

        let chunks = split_chunks(template, body)?;
        let last = chunks.len() - 1;
        let mut seen = HashSet::new();
        let mut macros: Vec<Option<Arc<dyn PathMacros>>> = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            if !chunk.contains(MACRO_START) {
                macros.push(None);
                continue;
            }

            let parts = parse_chunk(template, chunk)?;
            for part in &parts {
                if let ChunkPart::Param { name, .. } = part {
                    if !seen.insert(name.clone()) {
                        return Err(ConfigurationError::DuplicateParameter {
                            template: template.to_string(),
                            name: name.clone(),
                        });
                    }
                }
            }

            let excludes_dot = index == last && has_extension_suffix(&parts);
            macros.push(Some(self.build(template, ChunkLayout::new(parts, excludes_dot))?));
        }

        Ok(ActionConfigSet::new(
            template.to_string(),
            chunks.into_iter().map(String::from).collect(),
            macros,
        ))
    }

    fn build(&self, template: &str, layout: ChunkLayout) -> Result<Arc<dyn PathMacros>> {
        Ok(match self.kind {
            PathMacroKind::Wildcard => Arc::new(WildcardPathMacros::new(template, layout)?),
            PathMacroKind::Regex => Arc::new(RegexPathMacros::new(template, layout)?),
        })
    }
}

/// 按 `/` 切分；请求路径块中不会出现 `/`，宏内部的 `/` 视为格式错误
fn split_chunks<'a>(template: &str, body: &'a str) -> Result<Vec<&'a str>> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in body.char_indices() {
        match c {
            '{' if depth > 0 || prev == '$' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '/' if depth > 0 => {
                return Err(ConfigurationError::malformed(
                    template,
                    "'/' is not allowed inside a macro",
                ));
            }
            '/' => {
                chunks.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }

    if depth > 0 {
        return Err(ConfigurationError::malformed(template, "unterminated '${' macro"));
    }
    chunks.push(&body[start..]);
    Ok(chunks)
}

/// 把一个块拆成字面量和参数
fn parse_chunk(template: &str, chunk: &str) -> Result<Vec<ChunkPart>> {
    let mut parts = Vec::new();
    let mut rest = chunk;

    while let Some(start) = rest.find(MACRO_START) {
        if start > 0 {
            parts.push(ChunkPart::Literal(rest[..start].to_string()));
        } else if matches!(parts.last(), Some(ChunkPart::Param { .. })) {
            return Err(ConfigurationError::malformed(
                template,
                "adjacent macros must be separated by literal text",
            ));
        }

        let inner_start = start + MACRO_START.len();
        let inner_len = closing_brace(&rest[inner_start..])
            .ok_or_else(|| ConfigurationError::malformed(template, "unterminated '${' macro"))?;
        let inner = &rest[inner_start..inner_start + inner_len];

        let (name, pattern) = match inner.split_once(':') {
            Some((name, pattern)) => (name, (!pattern.is_empty()).then(|| pattern.to_string())),
            None => (inner, None),
        };
        validate_name(template, name)?;

        parts.push(ChunkPart::Param {
            name: name.to_string(),
            pattern,
        });
        rest = &rest[inner_start + inner_len + 1..];
    }

    if !rest.is_empty() {
        parts.push(ChunkPart::Literal(rest.to_string()));
    }
    Ok(parts)
}

/// 返回与宏开头配对的 `}` 的位置，模式中的花括号需成对出现
fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn validate_name(template: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigurationError::malformed(template, "macro without a name"));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigurationError::malformed(
            template,
            format!("invalid macro name '{}'", name),
        ));
    }
    Ok(())
}

/// 块是否以带 `.` 的字面量结尾（即带扩展名）
fn has_extension_suffix(parts: &[ChunkPart]) -> bool {
    matches!(parts.last(), Some(ChunkPart::Literal(literal)) if literal.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &ActionConfigSet, index: usize) -> Vec<String> {
        set.action_path_macros[index]
            .as_ref()
            .map(|m| m.names().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_compile_single_macro() {
        let set = MacroCompiler::default()
            .compile("/re/user/${id}/macro.html")
            .unwrap();

        assert_eq!(set.action_path_macros.len(), 4);
        assert!(set.action_path_macros[0].is_none());
        assert!(set.action_path_macros[1].is_none());
        assert!(set.action_path_macros[2].is_some());
        assert!(set.action_path_macros[3].is_none());
        assert_eq!(names(&set, 2), vec!["id"]);
    }

    #[test]
    fn test_compile_multiple_macros() {
        let set = MacroCompiler::default()
            .compile("/re/user/image/${id}/${fmt}/macro2.html")
            .unwrap();

        assert_eq!(set.deep(), 6);
        assert_eq!(names(&set, 3), vec!["id"]);
        assert_eq!(names(&set, 4), vec!["fmt"]);
    }

    #[test]
    fn test_compile_inline_macro() {
        let set = MacroCompiler::default()
            .compile("/re/wild${id}cat.html")
            .unwrap();

        assert_eq!(set.deep(), 2);
        assert_eq!(names(&set, 1), vec!["id"]);
        assert_eq!(set.match_chunks(&["re", "wild123cat.html"]).unwrap()[0].1, "123");
        assert!(set.match_chunks(&["re", "wild123cat"]).is_none());
    }

    #[test]
    fn test_braces_inside_pattern() {
        let set = MacroCompiler::new(PathMacroKind::Regex)
            .compile("/files/${code:[a-z]{2}[0-9]+}")
            .unwrap();

        assert_eq!(set.deep(), 2);
        assert_eq!(
            set.action_path_macros[1].as_ref().unwrap().patterns(),
            &[Some("[a-z]{2}[0-9]+".to_string())]
        );
        assert!(set.match_chunks(&["files", "ab12"]).is_some());
        assert!(set.match_chunks(&["files", "abc12"]).is_none());
    }

    #[test]
    fn test_slash_inside_macro_rejected() {
        for kind in [PathMacroKind::Wildcard, PathMacroKind::Regex] {
            let err = MacroCompiler::new(kind)
                .compile("/files/${path:[a-z]{2}/[0-9]+}")
                .unwrap_err();
            assert!(
                matches!(err, ConfigurationError::MalformedTemplate { ref reason, .. } if reason.contains("'/'")),
                "{:?}",
                err
            );
        }
        assert!(MacroCompiler::default().compile("/files/${a/b}").is_err());
    }

    #[test]
    fn test_literal_template_has_no_macros() {
        let set = MacroCompiler::default().compile("/boo.foo.html").unwrap();
        assert!(!set.has_macros());
        assert_eq!(set.deep(), 1);
    }

    #[test]
    fn test_default_macro_excludes_extension_in_last_chunk() {
        let set = MacroCompiler::default().compile("/user/${id}.html").unwrap();
        assert!(set.match_chunks(&["user", "12.html"]).is_some());
        assert!(set.match_chunks(&["user", "1.2.html"]).is_none());

        // 非最后一块不受影响
        let set = MacroCompiler::default().compile("/files/${name}/view.html").unwrap();
        assert!(set.match_chunks(&["files", "a.txt", "view.html"]).is_some());
    }

    #[test]
    fn test_malformed_templates() {
        let compiler = MacroCompiler::default();
        for template in [
            "/user/${id",
            "/user/${}",
            "/user/${:[0-9]+}",
            "/user/${a b}",
            "/user/${a}${b}",
            "user/${id}",
        ] {
            let err = compiler.compile(template).unwrap_err();
            assert!(
                matches!(err, ConfigurationError::MalformedTemplate { .. }),
                "{} should be malformed, got {:?}",
                template,
                err
            );
        }
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = MacroCompiler::default()
            .compile("/user/${id}/photo/${id}")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateParameter { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_invalid_regex_fails_at_compile_time() {
        let err = MacroCompiler::new(PathMacroKind::Regex)
            .compile("/user/${id:(}")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { .. }));
    }
}
