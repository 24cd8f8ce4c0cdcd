//! 解析统计信息

use std::sync::atomic::{AtomicU64, Ordering};

/// 内部统计（原子计数器）
#[derive(Default)]
pub(crate) struct InnerStats {
    total_resolutions: AtomicU64,
    singleton_cache_hits: AtomicU64,
    singleton_cache_misses: AtomicU64,
    scoped_creations: AtomicU64,
    failed_resolutions: AtomicU64,
}

impl InnerStats {
    pub(crate) fn resolution(&self) {
        self.total_resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cache_hit(&self) {
        self.singleton_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cache_miss(&self) {
        self.singleton_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn scoped_creation(&self) {
        self.scoped_creations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failure(&self) {
        self.failed_resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        self.total_resolutions.store(0, Ordering::Relaxed);
        self.singleton_cache_hits.store(0, Ordering::Relaxed);
        self.singleton_cache_misses.store(0, Ordering::Relaxed);
        self.scoped_creations.store(0, Ordering::Relaxed);
        self.failed_resolutions.store(0, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, registered_tokens: usize, active_singletons: usize) -> InjectorStats {
        InjectorStats {
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            singleton_cache_hits: self.singleton_cache_hits.load(Ordering::Relaxed),
            singleton_cache_misses: self.singleton_cache_misses.load(Ordering::Relaxed),
            scoped_creations: self.scoped_creations.load(Ordering::Relaxed),
            failed_resolutions: self.failed_resolutions.load(Ordering::Relaxed),
            registered_tokens,
            active_singletons,
        }
    }
}

/// 注入器统计快照
///
/// `total_resolutions` 只统计顶层 `get` 调用；缓存命中/未命中与作用域构造
/// 次数包含嵌套依赖的解析。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorStats {
    pub total_resolutions: u64,
    pub singleton_cache_hits: u64,
    pub singleton_cache_misses: u64,
    pub scoped_creations: u64,
    pub failed_resolutions: u64,
    pub registered_tokens: usize,
    pub active_singletons: usize,
}

impl InjectorStats {
    /// 单例缓存命中率（0.0 ~ 1.0）
    pub fn hit_rate(&self) -> f64 {
        let total = self.singleton_cache_hits + self.singleton_cache_misses;
        if total == 0 {
            0.0
        } else {
            self.singleton_cache_hits as f64 / total as f64
        }
    }

    pub fn performance_summary(&self) -> String {
        format!(
            "Injector: {} resolutions ({} failed), {:.1}% singleton hit rate, {} scoped creations, {} registered, {} active singletons",
            self.total_resolutions,
            self.failed_resolutions,
            self.hit_rate() * 100.0,
            self.scoped_creations,
            self.registered_tokens,
            self.active_singletons
        )
    }
}
