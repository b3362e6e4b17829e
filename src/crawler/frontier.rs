//! Crawl frontier: the traversal state of the crawl
//!
//! The frontier tracks three disjoint sets over normalized URLs: `pending`
//! (discovered, not yet fetched), `in-flight` (claimed by a worker, fetch in
//! progress), and `visited` (terminal — a URL once visited never leaves).
//! A URL discovered any number of times is fetched at most once.
//!
//! Pending URLs are handed out in FIFO order, giving a breadth-first
//! traversal. This is a deliberate policy choice: it makes the visit order
//! (and therefore the archive order) deterministic for a given link graph.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Outcome of asking the frontier for work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A URL to fetch; it has been moved to the in-flight set
    Url(Url),

    /// Nothing pending right now, but fetches are in flight that may still
    /// offer new URLs — check back shortly
    Wait,

    /// Pending and in-flight are both empty; the crawl is complete
    Exhausted,
}

/// The crawl's traversal state
///
/// All methods take `&mut self`; under concurrency the engine wraps the
/// frontier in a mutex so that `claim` and `mark_visited` are atomic with
/// respect to other workers.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<Url>,
    pending_set: HashSet<Url>,
    in_flight: HashSet<Url>,
    visited: HashSet<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the starting URL into the pending queue
    pub fn seed(&mut self, url: Url) {
        if !self.contains(&url) {
            self.pending_set.insert(url.clone());
            self.pending.push_back(url);
        }
    }

    /// Claims the next URL to fetch, moving it to the in-flight set
    ///
    /// Claiming and in-flight insertion happen together so no other worker
    /// can claim the same URL.
    pub fn claim(&mut self) -> Claim {
        match self.pending.pop_front() {
            Some(url) => {
                self.pending_set.remove(&url);
                self.in_flight.insert(url.clone());
                Claim::Url(url)
            }
            None if !self.in_flight.is_empty() => Claim::Wait,
            None => Claim::Exhausted,
        }
    }

    /// Marks a claimed URL as visited, fetch success or failure
    ///
    /// Visited is terminal: the URL will never be offered or claimed again.
    pub fn mark_visited(&mut self, url: Url) {
        self.in_flight.remove(&url);
        self.visited.insert(url);
    }

    /// Offers discovered URLs to the frontier
    ///
    /// Each URL not already visited, in flight, or pending is appended to
    /// the pending queue. Returns the number actually added.
    pub fn offer<I: IntoIterator<Item = Url>>(&mut self, urls: I) -> usize {
        let mut added = 0;
        for url in urls {
            if !self.contains(&url) {
                self.pending_set.insert(url.clone());
                self.pending.push_back(url);
                added += 1;
            }
        }
        added
    }

    /// True iff nothing is pending and nothing is in flight
    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// True if the URL has been seen in any of the three sets
    fn contains(&self, url: &Url) -> bool {
        self.visited.contains(url) || self.in_flight.contains(url) || self.pending_set.contains(url)
    }
}
