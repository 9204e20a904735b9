use alloc::vec::Vec;

use crate::FeedItem;
use crate::key::IdSet;

/// Returns `existing` followed by the items of `incoming` whose ids are not already present,
/// in `incoming`'s order.
///
/// A repeated id inside `incoming` is kept only at its first occurrence, so the result never
/// holds the same id twice as long as `existing` doesn't.
pub fn merge<P: Clone>(existing: &[FeedItem<P>], incoming: &[FeedItem<P>]) -> Vec<FeedItem<P>> {
    let mut out = Vec::with_capacity(existing.len() + incoming.len());
    out.extend_from_slice(existing);
    append_unique(&mut out, incoming.iter().cloned());
    out
}

/// Appends the items of `incoming` whose ids are not in `items` yet and returns how many were
/// appended.
pub fn append_unique<P>(
    items: &mut Vec<FeedItem<P>>,
    incoming: impl IntoIterator<Item = FeedItem<P>>,
) -> usize {
    let incoming: Vec<FeedItem<P>> = incoming.into_iter().collect();
    let keep: Vec<bool> = {
        let mut seen: IdSet<'_> = items.iter().map(|it| it.id.as_str()).collect();
        incoming
            .iter()
            .map(|it| seen.insert(it.id.as_str()))
            .collect()
    };

    let before = items.len();
    items.extend(
        incoming
            .into_iter()
            .zip(keep)
            .filter_map(|(item, keep)| keep.then_some(item)),
    );
    items.len() - before
}
