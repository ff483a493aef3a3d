//! Merging of near-duplicate topic candidates.
//!
//! Candidates live in an arena indexed by position; similarity links are
//! recorded in a disjoint-set forest so merging is transitive: if A~B and
//! B~C, all three end up in one cluster regardless of scan order.

use pulse_core::Topic;
use std::collections::BTreeSet;

/// Scored keyword before merging.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCandidate {
    pub name: String,
    pub post_count: usize,
    pub total_score: i64,
    pub total_comments: i64,
    pub avg_velocity: f64,
    pub topic_score: f64,
    pub subreddits: BTreeSet<String>,
}

/// Returns true when two topic names refer to the same thing.
///
/// Names match when one contains the other (case-insensitive) or when both
/// have at least two words and the first two words agree.
#[must_use]
pub fn are_topics_similar(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    let a_words: Vec<&str> = a.split_whitespace().collect();
    let b_words: Vec<&str> = b.split_whitespace().collect();

    a_words.len() >= 2 && b_words.len() >= 2 && a_words[..2] == b_words[..2]
}

/// Disjoint-set forest over candidate indices. The root of every set is its
/// lowest index.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

/// Folds a group of similar candidates into one topic.
fn merge_group(group: &[&TopicCandidate]) -> Topic {
    // Longest name wins; ties go to the earliest candidate
    let mut name = group[0].name.as_str();
    for candidate in &group[1..] {
        if candidate.name.chars().count() > name.chars().count() {
            name = candidate.name.as_str();
        }
    }

    let variants = (group.len() > 1).then(|| group.iter().map(|c| c.name.clone()).collect());

    Topic {
        name: name.to_string(),
        variants,
        post_count: group.iter().map(|c| c.post_count).sum(),
        total_score: group.iter().map(|c| c.total_score).sum(),
        total_comments: group.iter().map(|c| c.total_comments).sum(),
        avg_velocity: group.iter().map(|c| c.avg_velocity).sum::<f64>() / group.len() as f64,
        topic_score: group.iter().map(|c| c.topic_score).sum(),
        trending_strength: 0.0,
        subreddits: group
            .iter()
            .flat_map(|c| c.subreddits.iter().cloned())
            .collect(),
        rank: 0,
    }
}

/// Merges similar candidates into topics.
///
/// Output clusters are ordered by their earliest member; members keep input
/// order. Every candidate lands in exactly one topic.
#[must_use]
pub fn merge_similar(candidates: &[TopicCandidate]) -> Vec<Topic> {
    let mut sets = DisjointSet::new(candidates.len());

    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            if are_topics_similar(&candidates[i].name, &candidates[j].name) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<Vec<&TopicCandidate>> = Vec::new();
    let mut group_of_root: Vec<Option<usize>> = vec![None; candidates.len()];

    for (idx, candidate) in candidates.iter().enumerate() {
        let root = sets.find(idx);
        match group_of_root[root] {
            Some(g) => groups[g].push(candidate),
            None => {
                group_of_root[root] = Some(groups.len());
                groups.push(vec![candidate]);
            }
        }
    }

    groups.iter().map(|g| merge_group(g)).collect()
}
