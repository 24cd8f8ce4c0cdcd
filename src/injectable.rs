//! 可注入类型的声明
//!
//! 类型通过实现 [`Injectable`]（通常借助 [`injectable!`](crate::injectable) 宏）
//! 给出有序的构造参数令牌列表以及构造函数。

use crate::error::{ConstructError, InjectorError};
use crate::metadata::Signature;
use crate::token::Token;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 可由注入器构造的类型
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 构造参数的令牌，按声明顺序排列
    fn dependencies() -> Signature {
        Signature::empty()
    }

    /// 使用已解析的依赖构造实例
    ///
    /// 依赖按 [`dependencies`](Injectable::dependencies) 的顺序通过
    /// [`Arguments::next`] 逐个取出。
    fn construct(args: &mut Arguments<'_>) -> Result<Self, ConstructError>;
}

/// 传递给构造函数的位置参数
pub struct Arguments<'a> {
    owner: Token,
    values: &'a [(Token, Instance)],
    position: usize,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(owner: Token, values: &'a [(Token, Instance)]) -> Self {
        Self {
            owner,
            values,
            position: 0,
        }
    }

    /// 被构造的类型
    pub fn owner(&self) -> Token {
        self.owner
    }

    /// 剩余未取出的参数数量
    pub fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    /// 已取出的参数数量
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// 尚未取出的参数令牌
    pub(crate) fn unused(&self) -> Vec<Token> {
        self.values[self.position..].iter().map(|(token, _)| *token).collect()
    }

    /// 取出下一个参数
    ///
    /// 请求的类型必须与签名中该位置的令牌一致。
    pub fn next<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, InjectorError> {
        let requested = Token::of::<T>();
        let position = self.position;

        let Some((token, instance)) = self.values.get(position) else {
            return Err(InjectorError::SignatureMismatch {
                owner: self.owner,
                position,
                requested,
                provided: None,
            });
        };

        if *token != requested {
            return Err(InjectorError::SignatureMismatch {
                owner: self.owner,
                position,
                requested,
                provided: Some(*token),
            });
        }

        self.position += 1;
        instance
            .clone()
            .downcast::<T>()
            .map_err(|_| InjectorError::TypeMismatch {
                expected: requested,
                actual: *token,
            })
    }
}

/// 声明可注入类型
///
/// ```
/// use injector::injectable;
///
/// struct Engine;
/// struct Car {
///     engine: std::sync::Arc<Engine>,
/// }
///
/// injectable!(Engine, || Engine);
/// injectable!(Car, |engine: Engine| Car { engine });
/// ```
///
/// 每个参数在构造体中绑定为 `Arc<依赖类型>`。需要可失败构造的类型请直接实现
/// [`Injectable`]。
#[macro_export]
macro_rules! injectable {
    ($ty:ty, || $body:expr) => {
        impl $crate::Injectable for $ty {
            fn construct(
                _args: &mut $crate::Arguments<'_>,
            ) -> ::std::result::Result<Self, $crate::ConstructError> {
                Ok($body)
            }
        }
    };
    ($ty:ty, |$($arg:ident : $dep:ty),*| $body:expr) => {
        impl $crate::Injectable for $ty {
            fn dependencies() -> $crate::Signature {
                $crate::Signature::from(vec![$($crate::Token::of::<$dep>()),*])
            }

            #[allow(unused_variables)]
            fn construct(
                args: &mut $crate::Arguments<'_>,
            ) -> ::std::result::Result<Self, $crate::ConstructError> {
                $(let $arg: ::std::sync::Arc<$dep> = args.next::<$dep>()?;)*
                Ok($body)
            }
        }
    };
}
