//! Crawl frontier and visited set
//!
//! The frontier is a FIFO of [`CrawlTarget`]s. Duplicates are allowed in the
//! queue; a URL is marked visited only at the moment it is handed out for
//! dispatch, and any later occurrence of the same URL is discarded at that
//! point.

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched, with its distance from the seeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    pub depth: u32,
}

impl CrawlTarget {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Frontier queue plus the set of URLs already dispatched
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
    visited: HashSet<String>,
    discarded: usize,
}

impl Frontier {
    /// Creates a frontier holding every seed at depth 0
    pub fn seeded<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier = Self::default();
        for seed in seeds {
            frontier.push(CrawlTarget::new(seed, 0));
        }
        frontier
    }

    /// Appends a target to the back of the queue
    pub fn push(&mut self, target: CrawlTarget) {
        self.queue.push_back(target);
    }

    /// Pops the next target whose URL has not been dispatched yet
    ///
    /// The returned target's URL is recorded as visited before it is returned.
    /// Already-visited targets encountered on the way are dropped.
    pub fn next_unvisited(&mut self) -> Option<CrawlTarget> {
        while let Some(target) = self.queue.pop_front() {
            if self.visited.insert(target.url.clone()) {
                return Some(target);
            }
            tracing::debug!("Discarding already dispatched target {}", target.url);
            self.discarded += 1;
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of targets waiting in the queue, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct URLs dispatched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of duplicate targets dropped at dispatch time
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}
