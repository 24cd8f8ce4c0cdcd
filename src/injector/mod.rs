//! 依赖注入器
//!
//! 持有令牌到（构造函数，生命周期）的注册表与单例缓存，并按依赖签名递归
//! 构造对象图：
//! - `Singleton`：每个注入器只构造一次，之后始终返回同一实例
//! - `Scoped`：每次解析（包括作为嵌套依赖的解析）都构造新实例，不缓存
//!
//! 注册采用“后写覆盖”策略：对同一令牌再次注册会替换旧绑定，输出警告日志，
//! 并丢弃该令牌已缓存的单例。

mod resolve;
mod stats;

pub use stats::InjectorStats;

use crate::config::InjectorConfig;
use crate::error::{ConstructError, InjectorError};
use crate::injectable::{Arguments, Injectable, Instance};
use crate::metadata::{self, Signature};
use crate::token::Token;
use dashmap::DashMap;
use log::{debug, warn};
use parking_lot::ReentrantMutex;
use stats::InnerStats;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// 每个注入器一个实例，首次解析时创建并永久缓存
    Singleton,
    /// 每次解析都创建新实例
    Scoped,
}

/// 类型擦除的构造函数
pub(crate) type Constructor = fn(&mut Arguments<'_>) -> Result<Instance, ConstructError>;

fn construct_erased<T: Injectable>(args: &mut Arguments<'_>) -> Result<Instance, ConstructError> {
    let instance: Instance = Arc::new(T::construct(args)?);
    Ok(instance)
}

/// 注册信息
#[derive(Clone, Copy)]
pub(crate) struct Registration {
    pub(crate) token: Token,
    pub(crate) constructor: Constructor,
    /// 类型自身声明的签名，解析前与记录器中的签名比对
    pub(crate) dependencies: fn() -> Signature,
    pub(crate) lifetime: Lifetime,
}

/// 依赖注入器
pub struct Injector {
    id: Uuid,
    config: InjectorConfig,
    /// 注册表，仅能通过 `&mut self` 修改
    registrations: HashMap<Token, Registration>,
    /// 单例实例缓存
    singletons: DashMap<Token, Instance>,
    /// 单例构造锁（可重入，嵌套单例在同一线程内构造）
    construction_lock: ReentrantMutex<()>,
    stats: InnerStats,
}

impl Injector {
    /// 创建空注入器
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    /// 创建空注入器，作为链式注册的起点
    pub fn create() -> Self {
        Self::new()
    }

    pub fn with_config(config: InjectorConfig) -> Self {
        let id = Uuid::new_v4();
        debug!("Injector {} created (max_depth = {})", id, config.max_depth);
        Self {
            id,
            config,
            registrations: HashMap::new(),
            singletons: DashMap::new(),
            construction_lock: ReentrantMutex::new(()),
            stats: InnerStats::default(),
        }
    }

    /// 注册单例
    pub fn add_singleton<T: Injectable>(mut self) -> Self {
        self.register::<T>(Lifetime::Singleton);
        self
    }

    /// 注册作用域服务
    pub fn add_scoped<T: Injectable>(mut self) -> Self {
        self.register::<T>(Lifetime::Scoped);
        self
    }

    /// 注册类型 `T`，返回被覆盖的旧生命周期
    ///
    /// 同时在进程级记录器中声明 `T` 的依赖签名。
    pub fn register<T: Injectable>(&mut self, lifetime: Lifetime) -> Option<Lifetime> {
        let token = Token::of::<T>();

        // 签名冲突已由记录器输出警告；解析时报告 SignatureConflict
        let _ = metadata::declare::<T>();

        let registration = Registration {
            token,
            constructor: construct_erased::<T>,
            dependencies: T::dependencies,
            lifetime,
        };

        let previous = self.registrations.insert(token, registration).map(|r| r.lifetime);
        if let Some(previous) = previous {
            warn!(
                "Injector {}: {} re-registered, {:?} binding replaced by {:?}",
                self.id, token, previous, lifetime
            );
            if self.singletons.remove(&token).is_some() {
                debug!("Injector {}: evicted cached singleton {}", self.id, token);
            }
        } else {
            debug!("Injector {}: registered {} as {:?}", self.id, token, lifetime);
        }
        previous
    }

    /// 解析类型 `T` 的实例
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectorError> {
        let token = Token::of::<T>();
        let instance = self.get_token(token)?;
        // 注册表中 T 的令牌只绑定 T 的构造函数，转型不会失败
        instance.downcast::<T>().map_err(|_| InjectorError::TypeMismatch {
            expected: token,
            actual: token,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.contains(Token::of::<T>())
    }

    pub fn contains(&self, token: Token) -> bool {
        self.registrations.contains_key(&token)
    }

    pub fn lifetime_of(&self, token: Token) -> Option<Lifetime> {
        self.registrations.get(&token).map(|r| r.lifetime)
    }

    /// 已注册的令牌（按类型名排序）
    pub fn registered_tokens(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self.registrations.keys().copied().collect();
        tokens.sort_by_key(|t| t.name());
        tokens
    }

    /// 单例是否已被构造并缓存
    pub fn is_cached(&self, token: Token) -> bool {
        self.singletons.contains_key(&token)
    }

    pub fn stats(&self) -> InjectorStats {
        self.stats
            .snapshot(self.registrations.len(), self.singletons.len())
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("id", &self.id)
            .field("registered", &self.registered_tokens())
            .field("cached_singletons", &self.singletons.len())
            .finish()
    }
}
