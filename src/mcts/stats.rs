//! Per-column search statistics reported to the caller for display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Search statistics for one root move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Rollouts that went through this move
    pub visits: u32,

    /// Share of those rollouts won by the piece that made the move, in [0, 1]
    pub win_rate: f64,

    /// visits / max visits over all root moves, in [0, 1]. The most visited
    /// move has exactly 1.0.
    pub visit_ratio: f64,
}

/// Statistics for every column the root expanded, keyed by column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchStatistics(BTreeMap<usize, ColumnStats>);

impl SearchStatistics {
    /// Build statistics from `(column, visits, wins)` triples.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (usize, u32, u32)>,
    {
        let counts: Vec<(usize, u32, u32)> = counts.into_iter().collect();
        let max_visits = counts.iter().map(|&(_, visits, _)| visits).max().unwrap_or(0);

        let map = counts
            .into_iter()
            .map(|(column, visits, wins)| {
                let win_rate = if visits > 0 {
                    wins as f64 / visits as f64
                } else {
                    0.0
                };
                let visit_ratio = if max_visits > 0 {
                    visits as f64 / max_visits as f64
                } else {
                    0.0
                };
                (
                    column,
                    ColumnStats {
                        visits,
                        win_rate,
                        visit_ratio,
                    },
                )
            })
            .collect();

        SearchStatistics(map)
    }

    pub fn get(&self, column: usize) -> Option<&ColumnStats> {
        self.0.get(&column)
    }

    /// Entries in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ColumnStats)> {
        self.0.iter().map(|(&column, stats)| (column, stats))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of visits over all root moves.
    pub fn total_visits(&self) -> u64 {
        self.0.values().map(|stats| stats.visits as u64).sum()
    }
}
