//! Error types for the injector

use crate::token::Token;
use thiserror::Error;

/// 构造函数返回的错误类型
pub type ConstructError = Box<dyn std::error::Error + Send + Sync>;

/// 依赖解析错误
#[derive(Debug, Error)]
pub enum InjectorError {
    /// 令牌未在当前注入器注册
    #[error("Token {token} is not registered{}. Registered: [{}]", required_by_suffix(.required_by), join_tokens(.registered))]
    UnregisteredToken {
        token: Token,
        /// 需要该令牌的上层类型（顶层调用时为 None）
        required_by: Option<Token>,
        registered: Vec<Token>,
    },

    /// 解析路径中出现了正在解析的令牌
    #[error("Circular dependency detected: {}", join_chain(.chain))]
    CircularDependency {
        /// 从最外层到重复出现的令牌为止的完整路径
        chain: Vec<Token>,
    },

    /// 构造函数本身失败
    #[error("Failed to construct {token}: {source}")]
    ConstructionFailed {
        token: Token,
        #[source]
        source: ConstructError,
    },

    /// 构造函数请求的参数与记录的依赖签名不一致
    #[error("Constructor of {owner} requested {requested} at position {position}, but its signature provides {}", provided_text(.provided))]
    SignatureMismatch {
        owner: Token,
        position: usize,
        requested: Token,
        provided: Option<Token>,
    },

    /// 记录器中的签名与类型自身声明的签名不一致，未解析任何依赖
    #[error("Recorded signature of {token} is [{}], but the type declares [{}]", join_tokens(.recorded), join_tokens(.declared))]
    SignatureConflict {
        token: Token,
        recorded: Vec<Token>,
        declared: Vec<Token>,
    },

    /// 构造函数未取完签名提供的参数
    #[error("Constructor of {owner} consumed {consumed} argument(s) and left [{}] unused", join_tokens(.unused))]
    UnusedArguments {
        owner: Token,
        consumed: usize,
        unused: Vec<Token>,
    },

    /// 实例无法向下转型为请求的类型
    #[error("Type mismatch: expected {expected}, instance was registered under {actual}")]
    TypeMismatch { expected: Token, actual: Token },

    /// 解析深度超出配置上限
    #[error("Resolution depth limit {limit} exceeded: {}", join_chain(.chain))]
    DepthExceeded { limit: usize, chain: Vec<Token> },
}

impl InjectorError {
    pub fn is_unregistered(&self) -> bool {
        matches!(self, InjectorError::UnregisteredToken { .. })
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, InjectorError::CircularDependency { .. })
    }

    /// 签名与构造函数不一致导致的错误
    pub fn is_signature_error(&self) -> bool {
        matches!(
            self,
            InjectorError::SignatureMismatch { .. }
                | InjectorError::SignatureConflict { .. }
                | InjectorError::UnusedArguments { .. }
        )
    }

    pub fn is_construction_failure(&self) -> bool {
        matches!(self, InjectorError::ConstructionFailed { .. })
    }

    /// 出错的令牌
    pub fn token(&self) -> Option<Token> {
        match self {
            InjectorError::UnregisteredToken { token, .. }
            | InjectorError::ConstructionFailed { token, .. } => Some(*token),
            InjectorError::CircularDependency { chain } => chain.last().copied(),
            InjectorError::SignatureMismatch { owner, .. }
            | InjectorError::UnusedArguments { owner, .. } => Some(*owner),
            InjectorError::SignatureConflict { token, .. } => Some(*token),
            InjectorError::TypeMismatch { expected, .. } => Some(*expected),
            InjectorError::DepthExceeded { chain, .. } => chain.last().copied(),
        }
    }
}

/// 元数据记录错误
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Conflicting signature for {token}: recorded [{}], attempted [{}]", join_tokens(.recorded), join_tokens(.attempted))]
    ConflictingSignature {
        token: Token,
        recorded: Vec<Token>,
        attempted: Vec<Token>,
    },
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_chain(chain: &[Token]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn required_by_suffix(required_by: &Option<Token>) -> String {
    match required_by {
        Some(owner) => format!(" (required by {})", owner),
        None => String::new(),
    }
}

fn provided_text(provided: &Option<Token>) -> String {
    match provided {
        Some(token) => token.to_string(),
        None => "no further arguments".to_string(),
    }
}
