//! The binding ledger.
//!
//! Bound values are kept per clause family ([`Segment`]) in the order the
//! clauses were added, and flattened by walking the segments in the fixed
//! order the SELECT grammar emits them. Placeholder positions and bound values
//! therefore always line up, independent of hashing or insertion order across
//! segments.

use crate::value::Value;
use std::fmt;

/// Clause family a binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Select,
    Join,
    Where,
    Having,
    Order,
    Union,
}

impl Segment {
    /// Flattening order, matching the SELECT compile order.
    pub const ALL: [Segment; 6] = [
        Segment::Select,
        Segment::Join,
        Segment::Where,
        Segment::Having,
        Segment::Order,
        Segment::Union,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Select => "select",
            Segment::Join => "join",
            Segment::Where => "where",
            Segment::Having => "having",
            Segment::Order => "order",
            Segment::Union => "union",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered-by-segment store of bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    segments: [Vec<Value>; 6],
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a segment.
    ///
    /// A [`Value::List`] is expanded element by element, so `IN (?, ?)` and
    /// `BETWEEN ? AND ?` find one binding per placeholder.
    pub fn add(&mut self, segment: Segment, value: Value) {
        let bucket = &mut self.segments[segment.index()];
        match value {
            Value::List(items) => bucket.extend(items),
            other => bucket.push(other),
        }
    }

    /// Append several values to a segment, expanding lists.
    pub fn extend(&mut self, segment: Segment, values: impl IntoIterator<Item = Value>) {
        for value in values {
            self.add(segment, value);
        }
    }

    /// Values of one segment, in insertion order.
    pub fn get(&self, segment: Segment) -> &[Value] {
        &self.segments[segment.index()]
    }

    /// Drop every value of a segment.
    pub fn clear(&mut self, segment: Segment) {
        self.segments[segment.index()].clear();
    }

    /// A copy of this ledger with the given segments emptied.
    pub fn without(&self, segments: &[Segment]) -> Self {
        let mut copy = self.clone();
        for segment in segments {
            copy.clear(*segment);
        }
        copy
    }

    /// Total number of bound values.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Vec::is_empty)
    }

    /// All values in execution order.
    pub fn flatten(&self) -> Vec<Value> {
        self.flatten_except(&[])
    }

    /// All values in execution order, skipping the given segments.
    pub fn flatten_except(&self, skip: &[Segment]) -> Vec<Value> {
        Segment::ALL
            .iter()
            .filter(|segment| !skip.contains(segment))
            .flat_map(|segment| self.get(*segment).iter().cloned())
            .collect()
    }
}
