// Path: crates/state/src/overlay/resolved.rs

//! Ordered iteration over the resolved view: base plus every frame.

use crate::overlay::{Frame, StagedValue};
use sbx_api::error::StateError;
use sbx_api::state::{StateKVPair, StateScanIter, StoreId};
use std::collections::btree_map;
use std::iter::{Fuse, Peekable};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

type Layer<'a> = Peekable<btree_map::Range<'a, Vec<u8>, StagedValue>>;

/// Merges the base scan with one range per frame.
///
/// At each step the smallest head key wins; among sources holding that key the
/// highest frame decides, and tombstones are skipped.
pub struct ResolvedIter<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    /// Lowest precedence first.
    layers: Vec<Layer<'a>>,
}

impl<'a> ResolvedIter<'a> {
    /// Builds the merge over `frames` for keys in `start..end`; `end == None` is unbounded.
    ///
    /// `base` must yield only keys in the same range.
    pub fn new<I>(
        base: StateScanIter<'a>,
        frames: I,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let layers = match end {
            Some(end) if end <= start => Vec::new(),
            _ => frames
                .into_iter()
                .filter_map(|frame| frame.store(store))
                .map(|writes| {
                    let upper = end.map_or(Unbounded, Excluded);
                    writes.range::<[u8], _>((Included(start), upper)).peekable()
                })
                .collect(),
        };
        Self {
            base: base.fuse().peekable(),
            layers,
        }
    }

    fn smallest_head(&mut self) -> Option<Vec<u8>> {
        let mut min: Option<&[u8]> = None;
        for layer in self.layers.iter_mut() {
            if let Some(&(key, _)) = layer.peek() {
                let key: &'a [u8] = key.as_slice();
                min = Some(match min {
                    Some(m) if m <= key => m,
                    _ => key,
                });
            }
        }
        let base_key = match self.base.peek() {
            Some(Ok((k, _))) => Some(k.clone()),
            _ => None,
        };
        match (min, base_key) {
            (Some(m), Some(b)) if &*b < m => Some(b.to_vec()),
            (Some(m), _) => Some(m.to_vec()),
            (None, Some(b)) => Some(b.to_vec()),
            (None, None) => None,
        }
    }
}

impl<'a> Iterator for ResolvedIter<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(Err(_)) = self.base.peek() {
                return self.base.next();
            }
            let key = self.smallest_head()?;

            let mut winner: Option<&'a StagedValue> = None;
            for layer in self.layers.iter_mut().rev() {
                let holds = matches!(layer.peek(), Some(&(k, _)) if k.as_slice() == key.as_slice());
                if holds {
                    if let Some((_, staged)) = layer.next() {
                        winner.get_or_insert(staged);
                    }
                }
            }

            let base_holds = matches!(self.base.peek(), Some(Ok((k, _))) if &**k == key.as_slice());
            let base_item = if base_holds { self.base.next() } else { None };

            match winner {
                Some(StagedValue::Set(value)) => {
                    return Some(Ok((Arc::from(key), Arc::from(value.as_slice()))));
                }
                Some(StagedValue::Tombstone) => continue,
                None => {
                    if base_item.is_some() {
                        return base_item;
                    }
                }
            }
        }
    }
}
