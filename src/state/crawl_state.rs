use std::collections::{HashSet, VecDeque};
use url::Url;

/// Traversal state for one seed
///
/// The frontier is a FIFO queue with set semantics: a URL is queued at most
/// once and never after it has been visited. `depth` counts fetch attempts,
/// so `max_depth = 2` means at most two pages per seed regardless of how the
/// pages link to each other.
#[derive(Debug, Clone)]
pub struct CrawlState {
    visited: HashSet<Url>,
    frontier: VecDeque<Url>,
    queued: HashSet<Url>,
    depth: u32,
    max_depth: u32,
}

impl CrawlState {
    /// Starts a traversal with only the seed in the frontier
    pub fn new(seed: Url, max_depth: u32) -> Self {
        let mut state = Self {
            visited: HashSet::new(),
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            depth: 0,
            max_depth,
        };
        state.enqueue(seed);
        state
    }

    /// Returns true once the frontier is drained or the budget is spent
    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty() || self.depth >= self.max_depth
    }

    /// Takes the next unvisited URL and marks it visited
    ///
    /// Already-visited entries are discarded without spending budget.
    pub fn next_url(&mut self) -> Option<Url> {
        while !self.is_finished() {
            let url = self.frontier.pop_front()?;
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Adds a URL to the frontier unless it was seen before
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.frontier.push_back(url);
        true
    }

    /// Adds every URL in `urls`, returning how many were new
    pub fn enqueue_all(&mut self, urls: impl IntoIterator<Item = Url>) -> usize {
        urls.into_iter().filter(|url| self.enqueue(url.clone())).count()
    }

    /// Records that one fetch attempt has been spent
    pub fn record_attempt(&mut self) {
        self.depth += 1;
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://a.test").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_new_state_holds_seed() {
        let state = CrawlState::new(url("/"), 2);
        assert_eq!(state.frontier_len(), 1);
        assert_eq!(state.depth(), 0);
        assert!(state.visited().is_empty());
        assert!(!state.is_finished());
    }

    #[test]
    fn test_fifo_order() {
        let mut state = CrawlState::new(url("/"), 10);
        state.enqueue(url("/b"));
        state.enqueue(url("/a"));

        assert_eq!(state.next_url(), Some(url("/")));
        assert_eq!(state.next_url(), Some(url("/b")));
        assert_eq!(state.next_url(), Some(url("/a")));
        assert_eq!(state.next_url(), None);
    }

    #[test]
    fn test_duplicates_not_queued() {
        let mut state = CrawlState::new(url("/"), 10);
        assert!(!state.enqueue(url("/")));
        assert!(state.enqueue(url("/about")));
        assert!(!state.enqueue(url("/about")));
        assert_eq!(state.frontier_len(), 2);
    }

    #[test]
    fn test_visited_never_requeued() {
        let mut state = CrawlState::new(url("/"), 10);
        let first = state.next_url().unwrap();
        state.record_attempt();
        assert!(!state.enqueue(first));
        assert!(state.is_finished());
    }

    #[test]
    fn test_budget_stops_traversal() {
        let mut state = CrawlState::new(url("/"), 2);
        state.enqueue_all(vec![url("/a"), url("/b"), url("/c")]);

        let mut fetched = 0;
        while state.next_url().is_some() {
            state.record_attempt();
            fetched += 1;
        }

        assert_eq!(fetched, 2);
        assert_eq!(state.visited().len(), 2);
        assert!(state.is_finished());
    }

    #[test]
    fn test_enqueue_all_counts_new() {
        let mut state = CrawlState::new(url("/"), 2);
        let added = state.enqueue_all(vec![url("/"), url("/a"), url("/a"), url("/b")]);
        assert_eq!(added, 2);
    }
}
