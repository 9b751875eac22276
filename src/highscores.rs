//! High score leaderboard
//!
//! Local top 10 of finished runs. Storage is the host's job; the table
//! round-trips through JSON for that.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 20;

/// Rejected when found anywhere in the letters-and-digits form of a name
const BANNED_TERMS: &[&str] = &["fuck", "shit", "bitch", "cunt", "asshole", "bastard", "porn"];

/// Why a display name was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("please enter your name")]
    Empty,
    #[error("name too short (min {} characters)", MIN_NAME_LENGTH)]
    TooShort,
    #[error("name too long (max {} characters)", MAX_NAME_LENGTH)]
    TooLong,
    #[error("invalid characters; use letters, numbers, spaces, hyphens, apostrophes")]
    InvalidCharacters,
    #[error("display name rejected, please choose a different name")]
    Rejected,
}

/// Trim and collapse inner whitespace
pub fn sanitize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitize and check a display name
pub fn validate_name(raw: &str) -> Result<String, NameError> {
    let name = sanitize_name(raw);
    let len = name.chars().count();
    if len == 0 {
        return Err(NameError::Empty);
    }
    if len < MIN_NAME_LENGTH {
        return Err(NameError::TooShort);
    }
    if len > MAX_NAME_LENGTH {
        return Err(NameError::TooLong);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '\'')
    {
        return Err(NameError::InvalidCharacters);
    }

    let folded: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if BANNED_TERMS.iter().any(|t| folded.contains(t)) {
        return Err(NameError::Rejected);
    }
    Ok(name)
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// World distance covered (pixels)
    pub distance_px: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run under a validated name.
    /// Returns the rank achieved, or None if the score didn't qualify.
    pub fn add_score(
        &mut self,
        name: &str,
        score: u64,
        distance_px: f64,
        timestamp: f64,
    ) -> Result<Option<usize>, NameError> {
        let name = validate_name(name)?;
        if !self.qualifies(score) {
            return Ok(None);
        }

        let entry = HighScoreEntry {
            name,
            score,
            distance_px,
            timestamp,
        };

        // Ties go below existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("High score #{} ({})", rank, score);
        Ok(Some(rank))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore a table the host stored; entries are re-sorted and trimmed
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: Self = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
