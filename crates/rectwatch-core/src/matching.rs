//! Match aggregation: runs a reference rectangle against its candidates.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, format_timestamp};
use crate::rect::{Rectangle, overlaps, to_corners};

/// A reference rectangle and the candidates to test against it.
///
/// Wire form: `{"Main": {...}, "Input": [...]}`. `Input` may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "Main", alias = "main")]
    pub reference: Rectangle,
    #[serde(rename = "Input", alias = "input", default)]
    pub candidates: Vec<Rectangle>,
}

impl Query {
    pub fn new(reference: Rectangle, candidates: Vec<Rectangle>) -> Self {
        Self {
            reference,
            candidates,
        }
    }

    /// Every rectangle in the query, reference first.
    pub fn rectangles(&self) -> impl Iterator<Item = &Rectangle> {
        std::iter::once(&self.reference).chain(&self.candidates)
    }
}

/// Candidates accepted as overlapping, in input order, each timestamped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet(Vec<Rectangle>);

impl MatchSet {
    pub fn into_inner(self) -> Vec<Rectangle> {
        self.0
    }
}

impl Deref for MatchSet {
    type Target = [Rectangle];

    fn deref(&self) -> &[Rectangle] {
        &self.0
    }
}

impl IntoIterator for MatchSet {
    type Item = Rectangle;
    type IntoIter = std::vec::IntoIter<Rectangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Finds the candidates overlapping the query's reference rectangle.
///
/// Accepted candidates are cloned and stamped with `clock.now()`; the
/// query itself is left untouched. The clock is read once per accepted
/// candidate.
pub fn find_overlaps(query: &Query, clock: &impl Clock) -> MatchSet {
    let reference = to_corners(&query.reference);
    let matches = query
        .candidates
        .iter()
        .filter(|candidate| overlaps(&reference, &to_corners(candidate)))
        .map(|candidate| candidate.observed(format_timestamp(clock.now())))
        .collect();
    MatchSet(matches)
}
