//! Read-only selections over a [`Repository`](crate::repository::Repository).

use serde::Serialize;

use crate::record::Record;

/// An ordered subset of the repository's records.
///
/// A view only borrows records; it never owns or mutates them. Order follows
/// the repository (date, then channel).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> RecordView<'a> {
    /// Build a view from record references.
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    /// A view with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// A new view holding only the records that satisfy `pred`.
    pub fn refine(&self, mut pred: impl FnMut(&Record) -> bool) -> RecordView<'a> {
        RecordView::new(self.iter().filter(|r| pred(r)).collect())
    }
}

impl<'a> IntoIterator for RecordView<'a> {
    type Item = &'a Record;
    type IntoIter = std::vec::IntoIter<&'a Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, 'v> IntoIterator for &'v RecordView<'a> {
    type Item = &'a Record;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}
