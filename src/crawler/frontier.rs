//! Frontier management for the breadth-first crawl
//!
//! This module handles:
//! - The visited set, which only ever grows
//! - The horizon of URLs pending at the current depth
//! - Links collected for the next depth
//! - Splitting the horizon into capacity-bounded batches

use crate::storage::Checkpoint;
use chrono::Utc;
use std::collections::BTreeSet;

/// Takes the next batch from a horizon
///
/// Drops URLs already in `visited`, deduplicates and sorts the rest
/// lexicographically, then splits them at `capacity`.
///
/// # Returns
///
/// `(remaining, batch)`: the first `capacity` URLs as the batch and the
/// remainder as the new horizon. An empty batch means the level has no
/// more work.
///
/// # Example
///
/// ```
/// use product_crawler::crawler::take_batch;
/// use std::collections::BTreeSet;
///
/// let visited: BTreeSet<String> = ["/a".to_string()].into_iter().collect();
/// let horizon = vec!["/c".to_string(), "/a".to_string(), "/b".to_string(), "/c".to_string()];
///
/// let (remaining, batch) = take_batch(horizon, &visited, 1);
/// assert_eq!(batch, vec!["/b".to_string()]);
/// assert_eq!(remaining, vec!["/c".to_string()]);
/// ```
pub fn take_batch<I>(
    horizon: I,
    visited: &BTreeSet<String>,
    capacity: usize,
) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    let mut batch: Vec<String> = horizon
        .into_iter()
        .filter(|url| !visited.contains(url))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let remaining = batch.split_off(capacity.min(batch.len()));
    (remaining, batch)
}

/// Visited set and horizons owned by the crawl coordinator
///
/// All mutation happens on the coordinator between batches; workers never
/// see the frontier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    visited: BTreeSet<String>,
    horizon: Vec<String>,
    next_horizon: BTreeSet<String>,
    depth: u32,
}

impl Frontier {
    /// Starts a fresh crawl at depth 0 from the seed
    pub fn seeded(seed: impl Into<String>) -> Self {
        Self {
            horizon: vec![seed.into()],
            ..Self::default()
        }
    }

    /// Restores the frontier saved in a checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        let visited: BTreeSet<String> = checkpoint.visited.into_iter().collect();

        let horizon: Vec<String> = checkpoint
            .horizon
            .into_iter()
            .filter(|url| !visited.contains(url))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let next_horizon = checkpoint
            .next_horizon
            .into_iter()
            .filter(|url| !visited.contains(url))
            .collect();

        Self {
            visited,
            horizon,
            next_horizon,
            depth: checkpoint.depth,
        }
    }

    /// Snapshots the frontier for persistence
    pub fn to_checkpoint(&self) -> Checkpoint {
        Checkpoint {
            visited: self.visited.iter().cloned().collect(),
            horizon: self.horizon.clone(),
            depth: self.depth,
            next_horizon: self.next_horizon.iter().cloned().collect(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Removes up to `capacity` unvisited URLs from the current horizon
    ///
    /// The returned URLs are not marked visited; call [`Frontier::mark_visited`]
    /// once they have been dispatched.
    pub fn next_batch(&mut self, capacity: usize) -> Vec<String> {
        let horizon = std::mem::take(&mut self.horizon);
        let (remaining, batch) = take_batch(horizon, &self.visited, capacity);
        self.horizon = remaining;
        batch
    }

    /// Records dispatched URLs as visited
    pub fn mark_visited<'a, I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.visited.extend(urls.into_iter().cloned());
    }

    /// Adds links discovered at this level to the next level
    ///
    /// Links already visited are ignored; duplicates collapse.
    pub fn extend_next<I>(&mut self, links: I)
    where
        I: IntoIterator<Item = String>,
    {
        for link in links {
            if !self.visited.contains(&link) {
                self.next_horizon.insert(link);
            }
        }
    }

    /// Returns true if the current level still has unvisited URLs
    pub fn has_pending(&self) -> bool {
        self.horizon.iter().any(|url| !self.visited.contains(url))
    }

    /// Moves to the next depth level
    ///
    /// The links collected for the next level, minus anything visited since
    /// they were found, become the active horizon.
    pub fn advance_level(&mut self) {
        let next = std::mem::take(&mut self.next_horizon);
        self.horizon = next
            .into_iter()
            .filter(|url| !self.visited.contains(url))
            .collect();
        self.depth += 1;
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// URLs still pending at the current level
    pub fn horizon(&self) -> &[String] {
        &self.horizon
    }

    /// Links collected so far for the next level
    pub fn next_horizon(&self) -> impl Iterator<Item = &String> {
        self.next_horizon.iter()
    }
}
