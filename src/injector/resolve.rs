//! 解析引擎
//!
//! 深度优先、按签名从左到右解析依赖。每次顶层 `get` 调用创建一条
//! [`ResolutionPath`]，记录正在构造中的令牌；同一路径上再次遇到正在构造的
//! 令牌即为循环依赖。路径随调用结束而销毁，失败或 panic 都不会残留标记。

use super::{Injector, Lifetime, Registration};
use crate::error::InjectorError;
use crate::injectable::{Arguments, Instance};
use crate::logging::OperationTimer;
use crate::metadata;
use crate::token::Token;
use log::{debug, trace};

/// 单次解析调用中正在构造的令牌栈
pub(crate) struct ResolutionPath {
    stack: Vec<Token>,
    limit: usize,
}

impl ResolutionPath {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            stack: Vec::new(),
            limit,
        }
    }

    /// 标记令牌为构造中
    fn enter(&mut self, token: Token) -> Result<(), InjectorError> {
        if self.stack.contains(&token) {
            let mut chain = self.stack.clone();
            chain.push(token);
            return Err(InjectorError::CircularDependency { chain });
        }
        if self.stack.len() >= self.limit {
            let mut chain = self.stack.clone();
            chain.push(token);
            return Err(InjectorError::DepthExceeded {
                limit: self.limit,
                chain,
            });
        }
        self.stack.push(token);
        Ok(())
    }

    fn leave(&mut self, token: Token) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(token));
    }

    /// 当前正在构造的最内层令牌
    fn current(&self) -> Option<Token> {
        self.stack.last().copied()
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Injector {
    /// 按令牌解析实例（类型擦除）
    pub fn get_token(&self, token: Token) -> Result<Instance, InjectorError> {
        self.stats.resolution();

        let timer = self
            .config
            .trace_resolutions
            .then(|| OperationTimer::new(format!("Injector {}: resolve {}", self.id, token)));

        let mut path = ResolutionPath::new(self.config.max_depth);
        let result = self.resolve(token, &mut path);
        debug_assert_eq!(path.depth(), 0);

        if let Err(err) = &result {
            self.stats.failure();
            debug!("Injector {}: resolving {} failed: {}", self.id, token, err);
        }
        if let Some(timer) = timer {
            timer.finish(result.is_ok());
        }
        result
    }

    fn resolve(&self, token: Token, path: &mut ResolutionPath) -> Result<Instance, InjectorError> {
        let registration = self
            .registrations
            .get(&token)
            .copied()
            .ok_or_else(|| InjectorError::UnregisteredToken {
                token,
                required_by: path.current(),
                registered: self.registered_tokens(),
            })?;

        match registration.lifetime {
            Lifetime::Singleton => self.resolve_singleton(registration, path),
            Lifetime::Scoped => {
                let instance = self.construct(registration, path)?;
                self.stats.scoped_creation();
                Ok(instance)
            }
        }
    }

    fn cached(&self, token: Token) -> Option<Instance> {
        self.singletons.get(&token).map(|entry| entry.value().clone())
    }

    /// 构造加锁、双重检查缓存
    fn resolve_singleton(
        &self,
        registration: Registration,
        path: &mut ResolutionPath,
    ) -> Result<Instance, InjectorError> {
        let token = registration.token;

        if let Some(instance) = self.cached(token) {
            self.stats.cache_hit();
            trace!("Injector {}: singleton cache hit for {}", self.id, token);
            return Ok(instance);
        }

        let _guard = self.construction_lock.lock();

        // 等待锁期间可能已有其他线程完成构造
        if let Some(instance) = self.cached(token) {
            self.stats.cache_hit();
            return Ok(instance);
        }

        self.stats.cache_miss();
        let instance = self.construct(registration, path)?;
        self.singletons.insert(token, instance.clone());
        Ok(instance)
    }

    fn construct(
        &self,
        registration: Registration,
        path: &mut ResolutionPath,
    ) -> Result<Instance, InjectorError> {
        let token = registration.token;
        path.enter(token)?;
        let result = self.construct_in_progress(registration, path);
        path.leave(token);
        result
    }

    fn construct_in_progress(
        &self,
        registration: Registration,
        path: &mut ResolutionPath,
    ) -> Result<Instance, InjectorError> {
        let token = registration.token;
        let signature = metadata::signature_of(token);

        // 在构造任何依赖之前拒绝不一致的签名
        let declared = (registration.dependencies)();
        if signature != declared {
            return Err(InjectorError::SignatureConflict {
                token,
                recorded: signature.tokens().to_vec(),
                declared: declared.tokens().to_vec(),
            });
        }

        let mut values = Vec::with_capacity(signature.len());
        for dependency in signature.iter() {
            let instance = self.resolve(*dependency, path)?;
            values.push((*dependency, instance));
        }

        let mut args = Arguments::new(token, &values);
        let instance = (registration.constructor)(&mut args).map_err(|err| {
            match err.downcast::<InjectorError>() {
                Ok(inner) => *inner,
                Err(source) => InjectorError::ConstructionFailed { token, source },
            }
        })?;

        if args.remaining() > 0 {
            return Err(InjectorError::UnusedArguments {
                owner: token,
                consumed: args.consumed(),
                unused: args.unused(),
            });
        }

        debug!(
            "Injector {}: constructed {} ({:?}, {} dependencies)",
            self.id,
            token,
            registration.lifetime,
            values.len()
        );
        Ok(instance)
    }
}
