//! Cross-episode statistics.
//!
//! [`EpisodeStats`] folds in the [`EpisodeMetrics`] of every finished
//! episode: episode and success counts, step totals and per-episode
//! history of length, reward and SPL.

use serde::Serialize;

use crate::metrics::EpisodeMetrics;

// ---------------------------------------------------------------------------
// EpisodeStats
// ---------------------------------------------------------------------------

/// Running totals across finished episodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EpisodeStats {
    /// Total number of recorded episodes.
    pub episodes_completed: u32,
    /// Episodes that ended with a successful end action.
    pub successes: u32,
    /// Total steps across all episodes.
    pub total_steps: u64,
    /// Steps per recorded episode.
    pub step_history: Vec<u32>,
    /// Total reward per recorded episode.
    pub reward_history: Vec<f64>,
    /// SPL per recorded episode.
    pub spl_history: Vec<f64>,
}

impl EpisodeStats {
    /// Create empty stats.
    pub const fn new() -> Self {
        Self {
            episodes_completed: 0,
            successes: 0,
            total_steps: 0,
            step_history: Vec::new(),
            reward_history: Vec::new(),
            spl_history: Vec::new(),
        }
    }

    /// Fold in one finished episode.
    pub fn record(&mut self, metrics: &EpisodeMetrics) {
        self.episodes_completed += 1;
        if metrics.success {
            self.successes += 1;
        }
        self.total_steps += u64::from(metrics.ep_length);
        self.step_history.push(metrics.ep_length);
        self.reward_history.push(metrics.total_reward);
        self.spl_history.push(metrics.spl);
    }

    /// Fraction of recorded episodes that succeeded.
    pub fn success_rate(&self) -> Option<f64> {
        if self.episodes_completed == 0 {
            return None;
        }
        Some(f64::from(self.successes) / f64::from(self.episodes_completed))
    }

    /// Average episode length (steps) across all recorded episodes.
    pub fn mean_episode_length(&self) -> Option<f64> {
        if self.step_history.is_empty() {
            return None;
        }
        let sum: f64 = self.step_history.iter().copied().map(f64::from).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.step_history.len() as f64)
    }

    pub fn mean_reward(&self) -> Option<f64> {
        mean(&self.reward_history)
    }

    pub fn mean_spl(&self) -> Option<f64> {
        mean(&self.spl_history)
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
