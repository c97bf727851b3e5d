use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::error::JournalError;
use crate::models::{GradeReason, LetterGrade};
use crate::trading::grading::{GradingEngine, TradeGrade};
use crate::trading::trade::Trade;

/// Immutable audit row written on every recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeHistoryEntry {
    pub trade_id: u64,
    pub grade: LetterGrade,
    pub score: f64,
    pub reason: GradeReason,
    pub recorded_at: DateTime<Utc>,
}

/// One current grade per trade plus an append-only history.
pub struct GradeBook {
    pub engine: GradingEngine,
    grades: HashMap<u64, TradeGrade>,
    history: Vec<GradeHistoryEntry>,
}

impl GradeBook {
    pub fn new(engine: GradingEngine) -> Self {
        Self {
            engine,
            grades: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Grades `trade`, replacing its current grade and appending one history row.
    pub fn recalculate(
        &mut self,
        trade: &Trade,
        reason: GradeReason,
        at: DateTime<Utc>,
    ) -> &TradeGrade {
        let grade = self.engine.grade(trade);

        self.history.push(GradeHistoryEntry {
            trade_id: trade.id,
            grade: grade.overall,
            score: grade.score,
            reason,
            recorded_at: at,
        });

        let previous = self.grades.insert(trade.id, grade);
        let current = &self.grades[&trade.id];
        match previous {
            Some(prev) if prev.overall != current.overall => info!(
                "Trade {} regraded {} -> {} ({:.2}) [{}]",
                trade.id, prev.overall, current.overall, current.score, reason
            ),
            _ => info!(
                "Trade {} graded {} ({:.2}) [{}]",
                trade.id, current.overall, current.score, reason
            ),
        }
        current
    }

    pub fn current(&self, trade_id: u64) -> Result<&TradeGrade, JournalError> {
        self.grades
            .get(&trade_id)
            .ok_or(JournalError::TradeNotFound { trade_id })
    }

    pub fn history_for(&self, trade_id: u64) -> Result<Vec<&GradeHistoryEntry>, JournalError> {
        let rows: Vec<&GradeHistoryEntry> = self
            .history
            .iter()
            .filter(|h| h.trade_id == trade_id)
            .collect();
        if rows.is_empty() {
            return Err(JournalError::TradeNotFound { trade_id });
        }
        Ok(rows)
    }

    pub fn history(&self) -> &[GradeHistoryEntry] {
        &self.history
    }

    /// Current grades ordered by their most recent recalculation, oldest first.
    pub fn grades_by_recency(&self) -> Vec<&TradeGrade> {
        let mut last_seen: HashMap<u64, usize> = HashMap::new();
        for (i, h) in self.history.iter().enumerate() {
            last_seen.insert(h.trade_id, i);
        }
        let mut ordered: Vec<(usize, &TradeGrade)> = self
            .grades
            .values()
            .map(|g| (last_seen.get(&g.trade_id).copied().unwrap_or(0), g))
            .collect();
        ordered.sort_by_key(|(i, _)| *i);
        ordered.into_iter().map(|(_, g)| g).collect()
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

impl Default for GradeBook {
    fn default() -> Self {
        Self::new(GradingEngine::default())
    }
}
