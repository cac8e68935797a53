//! 路由注册表
//!
//! 注册在启动阶段进行，由一把 `Mutex` 串行化；每次注册都基于当前快照
//! 构造新的 `RouteTable`，再通过 `ArcSwap` 原子发布。请求解析只读取
//! 快照，不加锁。

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::action::{ActionConfig, MethodDescriptor, RouteInfo, TypeDescriptor};
use crate::alias::PathAliases;
use crate::compiler::MacroCompiler;
use crate::config::RouterConfig;
use crate::config_set::ActionConfigSet;
use crate::error::{ConfigurationError, Result};
use crate::parser::ActionMethodParser;
use crate::registration::get_all_action_registrations;

/// 路由表的一个不可变快照
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    /// 不含宏的模板，按完整路径索引
    exact: HashMap<String, Arc<ActionConfigSet>>,

    /// 含宏的模板，按优先级从高到低排列
    macros: Vec<Arc<ActionConfigSet>>,

    /// `类型#方法` -> 动作
    actions: HashMap<String, Arc<ActionConfig>>,
}

impl RouteTable {
    pub fn exact(&self, path: &str) -> Option<&Arc<ActionConfigSet>> {
        self.exact.get(path)
    }

    pub fn macro_sets(&self) -> &[Arc<ActionConfigSet>] {
        &self.macros
    }

    pub fn action(&self, signature: &str) -> Option<&Arc<ActionConfig>> {
        self.actions.get(signature)
    }

    pub fn actions_count(&self) -> usize {
        self.actions.len()
    }

    /// 查找与模板完全相同的已编译集合
    fn config_set(&self, action_path: &str) -> Option<&Arc<ActionConfigSet>> {
        self.exact.get(action_path).or_else(|| {
            self.macros
                .iter()
                .find(|set| set.action_path == action_path)
        })
    }

    fn insert(&mut self, set: ActionConfigSet, config: Arc<ActionConfig>) {
        self.actions.insert(config.signature(), config);

        let set = Arc::new(set);
        if !set.has_macros() {
            self.exact.insert(set.action_path.clone(), set);
            return;
        }

        match self
            .macros
            .iter_mut()
            .find(|existing| existing.action_path == set.action_path)
        {
            Some(existing) => *existing = set,
            None => {
                self.macros.push(set);
                // 稳定排序：优先级相同时保持注册顺序
                self.macros
                    .sort_by(|a, b| b.specificity().cmp(&a.specificity()));
            }
        }
    }
}

/// 动作注册管理器
pub struct ActionsManager {
    parser: ActionMethodParser,
    compiler: MacroCompiler,
    aliases: Arc<PathAliases>,
    table: ArcSwap<RouteTable>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for ActionsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.load();
        f.debug_struct("ActionsManager")
            .field("compiler", &self.compiler)
            .field("actions", &table.actions_count())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

impl ActionsManager {
    /// 创建管理器，并发布配置中声明的路径别名
    pub fn new(config: RouterConfig) -> Result<Self> {
        let aliases = Arc::new(PathAliases::new());
        for (alias, path) in &config.path_aliases {
            aliases.register(alias, path)?;
        }

        let compiler = MacroCompiler::new(config.path_macro);
        Ok(Self {
            parser: ActionMethodParser::new(Arc::new(config), aliases.clone()),
            compiler,
            aliases,
            table: ArcSwap::from_pointee(RouteTable::default()),
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &RouterConfig {
        self.parser.config()
    }

    pub fn aliases(&self) -> &Arc<PathAliases> {
        &self.aliases
    }

    /// 当前路由表快照
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// 注册一个动作方法
    ///
    /// 对同一 (类型, 方法) 重复注册相同定义是幂等的，返回已有的配置。
    /// 失败时路由表保持不变。
    pub fn register(&self, action_type: &TypeDescriptor, method: &MethodDescriptor) -> Result<Arc<ActionConfig>> {
        let _guard = self.write_lock.lock();

        let config = self.parser.parse(action_type, method)?;
        let current = self.table.load_full();

        if let Some(existing) = current.action(&config.signature()) {
            if **existing == config {
                tracing::debug!("Action {} already registered", config.signature());
                return Ok(existing.clone());
            }
            return Err(ConfigurationError::invalid_action(
                config.signature(),
                format!(
                    "already registered as '{}' with a different definition",
                    existing.action_path
                ),
            ));
        }

        let config = Arc::new(config);
        let set = match current.config_set(&config.action_path) {
            Some(set) => set.with_config(config.clone())?,
            None => self
                .compiler
                .compile(&config.action_path)?
                .with_config(config.clone())?,
        };

        if let Some(alias) = &config.alias {
            self.aliases.register(alias, &config.action_path)?;
        }

        let mut table = RouteTable::clone(&current);
        table.insert(set, config.clone());
        self.table.store(Arc::new(table));

        tracing::debug!(
            "Registered action {} -> {} [{}]",
            config.signature(),
            config.action_path,
            RouteInfo::from(config.as_ref()).method
        );
        Ok(config)
    }

    /// 注册一个类型的多个动作方法
    pub fn register_type(
        &self,
        action_type: &TypeDescriptor,
        methods: &[MethodDescriptor],
    ) -> Result<Vec<Arc<ActionConfig>>> {
        methods
            .iter()
            .map(|method| self.register(action_type, method))
            .collect()
    }

    /// 注册所有通过 inventory 提交的动作，返回注册的动作数
    ///
    /// inventory 的遍历顺序不确定，因此先注册不引用别名的方法，
    /// 再注册以 `#alias` 引用别名的方法。
    pub fn register_from_inventory(&self) -> Result<usize> {
        tracing::info!("Discovering actions from inventory...");

        let count = self.register_descriptors(get_all_action_registrations().map(|registration| {
            tracing::debug!("Discovered actions of {}", registration.type_name);
            ((registration.describe)(), (registration.methods)())
        }))?;

        tracing::info!(
            "Action discovery completed: {} method(s) registered, {} action(s) total",
            count,
            self.actions_count()
        );
        Ok(count)
    }

    /// 批量注册，顺序无关
    ///
    /// 路径为 `#别名` 的方法推迟注册，并反复重试直到不再有进展，
    /// 因此别名链（A 引用 B 发布的别名，B 又引用 C 的）无论提交顺序如何都能解析。
    pub(crate) fn register_descriptors<I>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (TypeDescriptor, Vec<MethodDescriptor>)>,
    {
        let mut deferred = Vec::new();
        let mut count = 0;
        for (action_type, methods) in entries {
            for method in methods {
                if method.path.as_deref().is_some_and(|path| path.starts_with('#')) {
                    deferred.push((action_type.clone(), method));
                    continue;
                }
                self.register(&action_type, &method)?;
                count += 1;
            }
        }

        while !deferred.is_empty() {
            let before = deferred.len();
            let mut pending = Vec::new();
            let mut unresolved = None;
            for (action_type, method) in deferred {
                match self.register(&action_type, &method) {
                    Ok(_) => count += 1,
                    Err(err @ ConfigurationError::UnknownAlias { .. }) => {
                        unresolved = Some(err);
                        pending.push((action_type, method));
                    }
                    Err(err) => return Err(err),
                }
            }

            if let Some(err) = unresolved {
                if pending.len() == before {
                    return Err(err);
                }
            }
            deferred = pending;
        }

        Ok(count)
    }

    /// 已注册的不同动作数
    pub fn actions_count(&self) -> usize {
        self.table.load().actions_count()
    }

    /// 路由清单，按路径和方法排序
    pub fn routes(&self) -> Vec<RouteInfo> {
        let table = self.table.load();
        let mut routes: Vec<RouteInfo> = table
            .actions
            .values()
            .map(|config| RouteInfo::from(config.as_ref()))
            .collect();
        routes.sort_by(|a, b| (&a.path, &a.method).cmp(&(&b.path, &b.method)));
        routes
    }
}
