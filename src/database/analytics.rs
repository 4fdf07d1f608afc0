//! Read-only analytical queries over the store.
//!
//! Quantiles are computed in Rust with linear interpolation between order
//! statistics, so results do not depend on the storage engine's own
//! aggregate functions.

use super::{Database, Percentiles, PhraseFrequency};
use crate::error::{Error, Result};
use crate::parser::SpeakerType;
use rusqlite::params;

/// Continuous quantile of an ascending-sorted population, `q` in [0, 1].
/// Empty population yields None.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

impl Database {
    fn word_counts(&self, speaker: Option<SpeakerType>) -> Result<Vec<f64>> {
        let conn = self.conn();
        let mut counts: Vec<f64> = match speaker {
            Some(speaker) => {
                let mut stmt =
                    conn.prepare("SELECT word_count FROM messages WHERE speaker_type = ?")?;
                let rows = stmt.query_map(params![speaker.as_str()], |row| {
                    row.get::<_, i64>(0).map(|n| n as f64)
                })?;
                rows.collect::<std::result::Result<_, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT word_count FROM messages")?;
                let rows = stmt.query_map([], |row| row.get::<_, i64>(0).map(|n| n as f64))?;
                rows.collect::<std::result::Result<_, _>>()?
            }
        };
        counts.sort_by(|a, b| a.total_cmp(b));
        Ok(counts)
    }

    /// Key percentiles (5th through 95th) of message word counts,
    /// optionally restricted to one speaker. An empty population yields
    /// all-None, never an error.
    pub fn percentiles(&self, speaker: Option<SpeakerType>) -> Result<Percentiles> {
        let counts = self.word_counts(speaker)?;
        if counts.is_empty() {
            return Ok(Percentiles::empty());
        }
        Ok(Percentiles {
            p5: quantile(&counts, 0.05),
            p10: quantile(&counts, 0.10),
            p25: quantile(&counts, 0.25),
            p50: quantile(&counts, 0.50),
            p75: quantile(&counts, 0.75),
            p90: quantile(&counts, 0.90),
            p95: quantile(&counts, 0.95),
        })
    }

    /// Text of every message whose word_count strictly exceeds the given
    /// percentile of the matching population.
    ///
    /// Raw-history dumps are excluded from both the population and the
    /// result. Ordered by word_count descending, then transcript id and
    /// position ascending, so repeated runs return identical lists.
    pub fn messages_above_percentile(
        &self,
        speaker: Option<SpeakerType>,
        percentile: f64,
    ) -> Result<Vec<String>> {
        if !(percentile > 0.0 && percentile < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "percentile must be in (0, 1), got {}",
                percentile
            )));
        }

        let rows: Vec<(f64, String)> = {
            let conn = self.conn();
            let base = "SELECT word_count, text FROM messages WHERE tag != ?";
            let order = "ORDER BY word_count DESC, transcript_id ASC, position ASC";
            match speaker {
                Some(speaker) => {
                    let sql = format!("{} AND speaker_type = ? {}", base, order);
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(
                        params![self.raw_history_tag(), speaker.as_str()],
                        |row| Ok((row.get::<_, i64>(0)? as f64, row.get(1)?)),
                    )?;
                    rows.collect::<std::result::Result<_, _>>()?
                }
                None => {
                    let sql = format!("{} {}", base, order);
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(params![self.raw_history_tag()], |row| {
                        Ok((row.get::<_, i64>(0)? as f64, row.get(1)?))
                    })?;
                    rows.collect::<std::result::Result<_, _>>()?
                }
            }
        };

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut population: Vec<f64> = rows.iter().map(|(wc, _)| *wc).collect();
        population.sort_by(|a, b| a.total_cmp(b));
        // Population is nonempty, so the quantile exists.
        let threshold = quantile(&population, percentile).unwrap_or(f64::MAX);

        Ok(rows
            .into_iter()
            .filter(|(wc, _)| *wc > threshold)
            .map(|(_, text)| text)
            .collect())
    }

    /// Top `limit` phrases by occurrence count among one speaker's
    /// messages, for unigrams (`num_words = 1`) or bigrams (`num_words = 2`).
    /// Equal counts are broken lexicographically on phrase text.
    pub fn top_phrases(
        &self,
        speaker: SpeakerType,
        num_words: u32,
        limit: u32,
    ) -> Result<Vec<PhraseFrequency>> {
        if !(1..=2).contains(&num_words) {
            return Err(Error::InvalidArgument(format!(
                "num_words must be 1 or 2, got {}",
                num_words
            )));
        }
        if limit == 0 {
            return Err(Error::InvalidArgument("limit must be at least 1".into()));
        }

        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT p.text, COUNT(*) AS frequency
             FROM messages m
             JOIN phrases p ON m.id = p.message_id
             WHERE m.speaker_type = ? AND p.num_words = ?
             GROUP BY p.text
             ORDER BY frequency DESC, p.text ASC
             LIMIT ?",
        )?;
        let frequencies = stmt
            .query_map(
                params![speaker.as_str(), num_words as i64, limit as i64],
                |row| {
                    Ok(PhraseFrequency {
                        text: row.get(0)?,
                        count: row.get(1)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(frequencies)
    }
}
