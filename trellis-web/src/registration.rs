//! 动作编译时注册机制
//!
//! 使用 inventory 在编译期收集动作描述，取代运行时的组件扫描：
//!
//! ```ignore
//! trellis_web::inventory::submit! {
//!     ActionRegistration::new("app::BooAction", boo_type, boo_methods)
//! }
//! ```
//!
//! `ActionsManager::register_from_inventory` 注册所有收集到的动作。

use crate::action::{MethodDescriptor, TypeDescriptor};

/// 动作注册信息
pub struct ActionRegistration {
    /// 类型名称，仅用于日志
    pub type_name: &'static str,

    /// 返回类型描述
    pub describe: fn() -> TypeDescriptor,

    /// 返回该类型的动作方法描述
    pub methods: fn() -> Vec<MethodDescriptor>,
}

impl ActionRegistration {
    pub const fn new(
        type_name: &'static str,
        describe: fn() -> TypeDescriptor,
        methods: fn() -> Vec<MethodDescriptor>,
    ) -> Self {
        Self {
            type_name,
            describe,
            methods,
        }
    }
}

inventory::collect!(ActionRegistration);

/// 获取所有注册的动作
pub fn get_all_action_registrations() -> impl Iterator<Item = &'static ActionRegistration> {
    inventory::iter::<ActionRegistration>.into_iter()
}
