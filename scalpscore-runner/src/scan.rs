//! Watchlist scanning: evaluate many symbols in parallel and rank them.
//!
//! All I/O happens before `Scanner::scan`; workers only read their own
//! bundle and the shared engine, so the result is independent of thread
//! count and scheduling.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use scalpscore_core::domain::{Bar, OscillatorSet, SignalResult};
use scalpscore_core::SignalEngine;

use crate::config::{ConfigError, ScanConfig};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build scan thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Pre-fetched input for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolBundle {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub oscillators: OscillatorSet,
}

/// Ranked results of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Score descending, then symbol ascending.
    pub results: Vec<SignalResult>,
    pub config_hash: String,
    pub alert_threshold: u8,
}

impl ScanReport {
    /// Highest-ranked result, if any symbol was scanned.
    pub fn top(&self) -> Option<&SignalResult> {
        self.results.first()
    }

    /// LONG/SHORT results scoring at least `threshold`, in rank order.
    pub fn actionable(&self, threshold: u8) -> impl Iterator<Item = &SignalResult> {
        self.results
            .iter()
            .filter(move |r| r.is_actionable(threshold))
    }

    /// Actionable results at the configured alert threshold.
    pub fn alerts(&self) -> impl Iterator<Item = &SignalResult> {
        self.actionable(self.alert_threshold)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Order results by score descending, ties broken by symbol ascending.
pub fn rank(results: &mut [SignalResult]) {
    results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
}

/// Evaluates symbol bundles on a private, bounded rayon pool.
pub struct Scanner {
    engine: SignalEngine,
    pool: rayon::ThreadPool,
    config_hash: String,
    alert_threshold: u8,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let engine = config.build_engine()?;
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.max_threads {
            builder = builder.num_threads(threads);
        }
        Ok(Self {
            engine,
            pool: builder.build()?,
            config_hash: config.config_hash()?,
            alert_threshold: config.alert_threshold,
        })
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn scan(&self, bundles: &[SymbolBundle]) -> ScanReport {
        let started = Instant::now();
        let mut results: Vec<SignalResult> = self.pool.install(|| {
            bundles
                .par_iter()
                .map(|b| self.engine.evaluate(&b.symbol, &b.bars, &b.oscillators))
                .collect()
        });
        rank(&mut results);

        let report = ScanReport {
            results,
            config_hash: self.config_hash.clone(),
            alert_threshold: self.alert_threshold,
        };
        info!(
            symbols = report.len(),
            alerts = report.alerts().count(),
            threads = self.threads(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );
        report
    }
}
