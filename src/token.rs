//! 可注入类型的标识符

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 可注入类型的唯一标识
///
/// 相等性与哈希只依赖 `TypeId`，`name` 仅用于错误信息和日志。
#[derive(Clone, Copy)]
pub struct Token {
    id: TypeId,
    name: &'static str,
}

impl Token {
    /// 获取类型 `T` 的标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名（含模块路径）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 去掉模块路径后的短类型名
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
