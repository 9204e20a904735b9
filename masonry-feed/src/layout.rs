use alloc::vec::Vec;

use crate::FeedItem;

/// A partition of item indexes into ordered columns.
///
/// Derived from the item list and a column count; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnAssignment {
    columns: Vec<Vec<usize>>,
    len: usize,
}

impl ColumnAssignment {
    fn empty(columns: usize) -> Self {
        Self {
            columns: (0..columns.max(1)).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    pub fn columns(&self) -> &[Vec<usize>] {
        &self.columns
    }

    pub fn column(&self, column: usize) -> Option<&[usize]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of items across all columns.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The column the item at `index` lands in.
    pub fn column_of(&self, index: usize) -> Option<usize> {
        (index < self.len).then(|| index % self.columns.len())
    }

    /// Reads the columns back in round-robin order, which reproduces the original item order.
    pub fn interleave(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let depth = self.columns.first().map_or(0, Vec::len);
        for row in 0..depth {
            for col in &self.columns {
                if let Some(&i) = col.get(row) {
                    out.push(i);
                }
            }
        }
        out
    }

    /// Maps the assignment onto `items`. Indexes past the end of `items` are skipped.
    pub fn resolve<'a, P>(&self, items: &'a [FeedItem<P>]) -> Vec<Vec<&'a FeedItem<P>>> {
        self.columns
            .iter()
            .map(|col| col.iter().filter_map(|&i| items.get(i)).collect())
            .collect()
    }

    fn extend_to(&mut self, count: usize) {
        let k = self.columns.len();
        for i in self.len..count {
            self.columns[i % k].push(i);
        }
        self.len = self.len.max(count);
    }
}

/// Round-robin assignment: the item at position `i` goes to column `i mod columns`.
///
/// A column count of zero is treated as one.
pub fn assign<P>(items: &[FeedItem<P>], columns: usize) -> ColumnAssignment {
    assign_count(items.len(), columns)
}

/// Same as [`assign`], for callers that only know the item count.
pub fn assign_count(count: usize, columns: usize) -> ColumnAssignment {
    let mut out = ColumnAssignment::empty(columns);
    out.extend_to(count);
    out
}

/// Keeps a [`ColumnAssignment`] in sync with an item count and a column count.
///
/// Growing the item count only appends; changing the column count recomputes from scratch.
#[derive(Clone, Debug)]
pub struct LayoutAssigner {
    assignment: ColumnAssignment,
    revision: u64,
}

impl LayoutAssigner {
    pub fn new(count: usize, columns: usize) -> Self {
        Self {
            assignment: assign_count(count, columns),
            revision: 0,
        }
    }

    pub fn assignment(&self) -> &ColumnAssignment {
        &self.assignment
    }

    pub fn column_count(&self) -> usize {
        self.assignment.column_count()
    }

    /// Bumped every time the assignment changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Brings the assignment up to date. Returns `true` when anything changed.
    pub fn sync(&mut self, count: usize, columns: usize) -> bool {
        let columns = columns.max(1);
        if columns == self.assignment.column_count() && count == self.assignment.len() {
            return false;
        }

        if columns == self.assignment.column_count() && count > self.assignment.len() {
            ftrace!(
                from = self.assignment.len(),
                to = count,
                "LayoutAssigner: append"
            );
            self.assignment.extend_to(count);
        } else {
            fdebug!(count, columns, "LayoutAssigner: full recompute");
            self.assignment = assign_count(count, columns);
        }
        self.revision = self.revision.wrapping_add(1);
        true
    }
}
