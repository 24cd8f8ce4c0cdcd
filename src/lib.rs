//! 类型化依赖注入容器
//!
//! ```
//! use injector::{injectable, Injector};
//! use std::sync::Arc;
//!
//! struct Settings;
//! struct Service {
//!     settings: Arc<Settings>,
//! }
//!
//! injectable!(Settings, || Settings);
//! injectable!(Service, |settings: Settings| Service { settings });
//!
//! let injector = Injector::create()
//!     .add_singleton::<Settings>()
//!     .add_scoped::<Service>();
//!
//! let first = injector.get::<Service>().unwrap();
//! let second = injector.get::<Service>().unwrap();
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.settings, &second.settings));
//! ```

pub mod config;
pub mod error;
pub mod injectable;
pub mod injector;
pub mod logging;
pub mod metadata;
pub mod token;

// Re-export commonly used items for convenience
pub use config::InjectorConfig;
pub use error::{ConfigError, ConstructError, InjectorError, MetadataError};
pub use injectable::{Arguments, Injectable, Instance};
pub use injector::{Injector, InjectorStats, Lifetime};
pub use metadata::{MetadataRecorder, Signature};
pub use token::Token;
