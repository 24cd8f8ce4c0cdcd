//! 注入器配置
//!
//! 支持 TOML 文件与环境变量覆盖：
//! - `INJECTOR_MAX_DEPTH`：最大解析深度
//! - `INJECTOR_TRACE`：是否记录每次顶层解析的耗时（`true`/`false`/`1`/`0`）

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_DEPTH: usize = 256;

const ENV_MAX_DEPTH: &str = "INJECTOR_MAX_DEPTH";
const ENV_TRACE: &str = "INJECTOR_TRACE";

/// 注入器配置
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InjectorConfig {
    /// 单次解析允许的最大依赖深度
    ///
    /// 解析沿依赖链递归，此上限保护线程栈。超过上限的无环图同样会以
    /// `DepthExceeded` 被拒绝，依赖链更深的应用需要调大此值。
    pub max_depth: usize,
    /// 记录顶层解析耗时
    pub trace_resolutions: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_resolutions: false,
        }
    }
}

impl InjectorConfig {
    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: InjectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MAX_DEPTH.to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_TRACE) {
            self.trace_resolutions = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_TRACE.to_string(),
                        value,
                    })
                }
            };
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
