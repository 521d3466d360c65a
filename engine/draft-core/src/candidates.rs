//! Candidate index.
//!
//! Candidates are sorted once, descending by projected score, and regrouped
//! into contiguous per-slot segments. A candidate's id is its position in
//! that layout, so id lookup is a plain index and the first untaken entry of
//! a segment is always the best available candidate for the slot.
//!
//! Ties on score are broken by name (ascending), then by ingestion order,
//! which keeps the layout identical across runs over the same input.

use std::io::Read;
use std::ops::Range;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::slots::{SlotIndex, SlotModel};

/// Stable candidate identifier: the candidate's position in the index.
pub type CandidateId = usize;

/// Errors that can occur while ingesting candidates.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read candidate source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed candidate record on line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// A draftable candidate. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub score: f64,
    pub slot: SlotIndex,
}

/// One `(name, position, score)` row of a candidate source.
#[derive(Debug, Deserialize)]
struct CandidateRecord {
    name: String,
    position: String,
    score: f64,
}

fn ingest_error(e: csv::Error) -> IngestError {
    let line = e.position().map_or(0, |p| p.line());
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => IngestError::Io(io),
        _ => IngestError::Malformed { line, reason },
    }
}

/// Incrementally maintained "already drafted" membership set.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TakenSet {
    taken: Vec<bool>,
    count: usize,
}

impl TakenSet {
    pub fn new(num_candidates: usize) -> Self {
        Self {
            taken: vec![false; num_candidates],
            count: 0,
        }
    }

    #[inline]
    pub fn contains(&self, id: CandidateId) -> bool {
        self.taken[id]
    }

    /// Mark a candidate taken. Returns false if it already was.
    pub fn insert(&mut self, id: CandidateId) -> bool {
        if self.taken[id] {
            return false;
        }
        self.taken[id] = true;
        self.count += 1;
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Clone for TakenSet {
    fn clone(&self) -> Self {
        Self {
            taken: self.taken.clone(),
            count: self.count,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.taken.clone_from(&source.taken);
        self.count = source.count;
    }
}

/// All draftable candidates, segmented by slot.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
    /// Per-slot range into `candidates`.
    segments: Vec<Range<usize>>,
    /// Constituent slots for each flex slot (empty for plain slots).
    flex: Vec<Vec<SlotIndex>>,
}

impl CandidatePool {
    /// Build the index from `(name, slot, score)` entries.
    pub fn new<I>(model: &SlotModel, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, SlotIndex, f64)>,
    {
        let mut candidates: Vec<Candidate> = entries
            .into_iter()
            .map(|(name, slot, score)| Candidate {
                id: 0,
                name,
                score,
                slot,
            })
            .collect();

        // Stable sorts: score/name ordering survives the regroup by slot.
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.name.cmp(&b.name))
        });
        candidates.sort_by_key(|c| c.slot);

        let num_slots = model.num_slots();
        let mut segments = vec![0..0; num_slots];
        let mut start = 0;
        for (slot, segment) in segments.iter_mut().enumerate() {
            let len = candidates[start..]
                .iter()
                .take_while(|c| c.slot == slot)
                .count();
            *segment = start..start + len;
            start += len;
        }

        for (id, candidate) in candidates.iter_mut().enumerate() {
            candidate.id = id;
        }

        let flex = model.slots().iter().map(|s| s.flex.clone()).collect();

        Self {
            candidates,
            segments,
            flex,
        }
    }

    /// Ingest delimited `name,position,score` records (no header row).
    ///
    /// Position labels that match no slot are skipped with a warning;
    /// a malformed row aborts ingestion.
    pub fn from_reader<R: Read>(model: &SlotModel, reader: R) -> Result<Self, IngestError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut entries = Vec::new();
        let mut skipped = 0usize;
        let mut raw = csv::StringRecord::new();
        while csv.read_record(&mut raw).map_err(ingest_error)? {
            let line = raw.position().map_or(0, |p| p.line());
            let record: CandidateRecord = raw.deserialize(None).map_err(|e| {
                IngestError::Malformed {
                    line,
                    reason: e.to_string(),
                }
            })?;
            if !record.score.is_finite() {
                return Err(IngestError::Malformed {
                    line,
                    reason: format!("score for '{}' is not a finite number", record.name),
                });
            }

            match model.slot_for_label(&record.position) {
                Some(slot) => entries.push((record.name, slot, record.score)),
                None => {
                    warn!(
                        name = %record.name,
                        position = %record.position,
                        "Position could not be mapped to a slot, skipping candidate"
                    );
                    skipped += 1;
                }
            }
        }

        debug!(loaded = entries.len(), skipped, "Candidates ingested");
        Ok(Self::new(model, entries))
    }

    /// Ingest candidates from a file on disk.
    pub fn from_path(model: &SlotModel, path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(model, std::io::BufReader::new(file))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidates assigned directly to `slot`, best first.
    #[inline]
    pub fn segment(&self, slot: SlotIndex) -> &[Candidate] {
        &self.candidates[self.segments[slot].clone()]
    }

    /// Best untaken candidate that can fill `slot`.
    ///
    /// For a flex slot the best of its own segment and of every constituent
    /// slot is returned, compared by score. `None` means the slot is
    /// currently unfillable.
    pub fn highest_available(&self, slot: SlotIndex, taken: &TakenSet) -> Option<&Candidate> {
        let mut best = self.segment(slot).iter().find(|c| !taken.contains(c.id));
        for &constituent in &self.flex[slot] {
            if let Some(candidate) = self.highest_available(constituent, taken) {
                if best.map_or(true, |b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Up to `limit` untaken candidates that can fill `slot`, best first.
    pub fn available(&self, slot: SlotIndex, taken: &TakenSet, limit: usize) -> Vec<&Candidate> {
        let mut found: Vec<&Candidate> = Vec::new();
        self.collect_available(slot, taken, &mut found);
        found.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        found.dedup_by_key(|c| c.id);
        found.truncate(limit);
        found
    }

    fn collect_available<'a>(
        &'a self,
        slot: SlotIndex,
        taken: &TakenSet,
        out: &mut Vec<&'a Candidate>,
    ) {
        out.extend(self.segment(slot).iter().filter(|c| !taken.contains(c.id)));
        for &constituent in &self.flex[slot] {
            self.collect_available(constituent, taken, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotSpec;

    fn model() -> SlotModel {
        SlotModel::new(
            2,
            &[
                SlotSpec::new("QB", 1),
                SlotSpec::new("RB", 1),
                SlotSpec::new("WR", 1),
                SlotSpec::flex("FLEX", 1, &["RB", "WR"]),
            ],
        )
        .unwrap()
    }

    fn entry(name: &str, slot: SlotIndex, score: f64) -> (String, SlotIndex, f64) {
        (name.to_string(), slot, score)
    }

    #[test]
    fn test_segments_sorted_descending() {
        let model = model();
        let pool = CandidatePool::new(
            &model,
            vec![
                entry("R2", 1, 10.0),
                entry("Q1", 0, 25.0),
                entry("R1", 1, 15.0),
                entry("W1", 2, 20.0),
                entry("Q2", 0, 30.0),
            ],
        );

        let qbs: Vec<&str> = pool.segment(0).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(qbs, vec!["Q2", "Q1"]);
        let rbs: Vec<&str> = pool.segment(1).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(rbs, vec!["R1", "R2"]);
        assert!(pool.segment(3).is_empty());

        for (i, c) in pool.iter().enumerate() {
            assert_eq!(c.id, i);
            assert_eq!(pool.get(i), Some(c));
        }
    }

    #[test]
    fn test_ties_break_by_name() {
        let model = model();
        let pool = CandidatePool::new(
            &model,
            vec![entry("Zed", 0, 20.0), entry("Abe", 0, 20.0)],
        );
        assert_eq!(pool.segment(0)[0].name, "Abe");
    }

    #[test]
    fn test_highest_available_skips_taken() {
        let model = model();
        let pool = CandidatePool::new(&model, vec![entry("A", 0, 30.0), entry("B", 0, 20.0)]);
        let mut taken = TakenSet::new(pool.len());
        assert_eq!(pool.highest_available(0, &taken).unwrap().name, "A");

        let a = pool.by_name("A").unwrap().id;
        taken.insert(a);
        assert_eq!(pool.highest_available(0, &taken).unwrap().name, "B");

        taken.insert(pool.by_name("B").unwrap().id);
        assert!(pool.highest_available(0, &taken).is_none());
    }

    #[test]
    fn test_flex_query_picks_best_by_score() {
        let model = model();
        let pool = CandidatePool::new(&model, vec![entry("R1", 1, 15.0), entry("W1", 2, 20.0)]);
        let taken = TakenSet::new(pool.len());
        assert_eq!(pool.highest_available(3, &taken).unwrap().name, "W1");
    }

    #[test]
    fn test_available_lists_flex_candidates() {
        let model = model();
        let pool = CandidatePool::new(
            &model,
            vec![
                entry("R1", 1, 15.0),
                entry("W1", 2, 20.0),
                entry("W2", 2, 5.0),
                entry("Q1", 0, 40.0),
            ],
        );
        let mut taken = TakenSet::new(pool.len());
        taken.insert(pool.by_name("W1").unwrap().id);

        let names: Vec<&str> = pool
            .available(3, &taken, 10)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["R1", "W2"]);
        assert_eq!(pool.available(3, &taken, 1).len(), 1);
    }

    #[test]
    fn test_taken_set_counts_unique_inserts() {
        let mut taken = TakenSet::new(3);
        assert!(taken.is_empty());
        assert!(taken.insert(1));
        assert!(!taken.insert(1));
        assert_eq!(taken.len(), 1);
        assert!(taken.contains(1));
        assert!(!taken.contains(2));
    }

    #[test]
    fn test_from_reader_skips_unmapped_positions() {
        let model = model();
        let data = "\
# name,position,score
Josh Allen,QB,25.1
Justin Tucker,K,9.0
Ja'Marr Chase,WR1,20.5
";
        let pool = CandidatePool::from_reader(&model, data.as_bytes()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.by_name("Ja'Marr Chase").unwrap().slot, 2);
        assert!(pool.by_name("Justin Tucker").is_none());
    }

    #[test]
    fn test_from_reader_rejects_malformed_rows() {
        let model = model();
        let data = "Josh Allen,QB,25.1\nBroken Row,RB,not-a-number\n";
        let err = CandidatePool::from_reader(&model, data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Malformed { .. }));
        assert!(err.to_string().contains("malformed"));

        let short = "Josh Allen,QB\n";
        assert!(CandidatePool::from_reader(&model, short.as_bytes()).is_err());
    }

    #[test]
    fn test_from_reader_rejects_non_finite_scores() {
        let model = model();
        for score in ["NaN", "inf", "-inf"] {
            let data = format!("A,QB,{score}\nB,QB,20\nC,QB,10\n");
            let err = CandidatePool::from_reader(&model, data.as_bytes()).unwrap_err();
            assert!(
                matches!(err, IngestError::Malformed { line: 1, .. }),
                "{score}: {err}"
            );
        }
    }

    #[test]
    fn test_from_path_missing_file() {
        let model = model();
        let err = CandidatePool::from_path(&model, "/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
