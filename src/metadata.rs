//! 依赖签名记录器
//!
//! 进程级的元数据存储：为每个可注入类型记录一次有序的构造参数令牌列表，
//! 之后只读。未记录的令牌视为无参构造（空签名）。
//!
//! 重复记录策略：
//! - 与已记录签名相同：幂等，返回 `Ok(())`
//! - 与已记录签名不同：返回 [`MetadataError::ConflictingSignature`]，保留首次记录

use crate::error::MetadataError;
use crate::injectable::Injectable;
use crate::token::Token;
use lazy_static::lazy_static;
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 有序的依赖令牌序列
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Arc<[Token]>);

impl Signature {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::<Token>::new()))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Token>> for Signature {
    fn from(tokens: Vec<Token>) -> Self {
        Self(Arc::from(tokens))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// 依赖签名记录器
#[derive(Default)]
pub struct MetadataRecorder {
    signatures: RwLock<HashMap<Token, Signature>>,
}

impl MetadataRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录令牌的依赖签名
    pub fn record(&self, token: Token, signature: Signature) -> Result<(), MetadataError> {
        let mut signatures = self.signatures.write();

        if let Some(recorded) = signatures.get(&token) {
            if *recorded == signature {
                return Ok(());
            }
            warn!(
                "Rejected conflicting signature for {}: recorded {:?}, attempted {:?}",
                token, recorded, signature
            );
            return Err(MetadataError::ConflictingSignature {
                token,
                recorded: recorded.tokens().to_vec(),
                attempted: signature.tokens().to_vec(),
            });
        }

        debug!("Recorded signature for {}: {:?}", token, signature);
        signatures.insert(token, signature);
        Ok(())
    }

    /// 声明可注入类型，记录其 `dependencies()`
    pub fn declare<T: Injectable>(&self) -> Result<(), MetadataError> {
        self.record(Token::of::<T>(), T::dependencies())
    }

    /// 查询依赖签名，未记录时返回空签名
    pub fn signature_of(&self, token: Token) -> Signature {
        self.signatures
            .read()
            .get(&token)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_declared(&self, token: Token) -> bool {
        self.signatures.read().contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.signatures.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.read().is_empty()
    }
}

lazy_static! {
    static ref GLOBAL_RECORDER: MetadataRecorder = MetadataRecorder::new();
}

/// 进程级记录器
pub fn global() -> &'static MetadataRecorder {
    &GLOBAL_RECORDER
}

/// 在进程级记录器中记录签名
pub fn record(token: Token, signature: Signature) -> Result<(), MetadataError> {
    global().record(token, signature)
}

/// 在进程级记录器中声明可注入类型
pub fn declare<T: Injectable>() -> Result<(), MetadataError> {
    global().declare::<T>()
}

/// 从进程级记录器查询签名
pub fn signature_of(token: Token) -> Signature {
    global().signature_of(token)
}
