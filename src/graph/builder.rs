//! Topic co-occurrence graph
//!
//! [`AdjacencyGraph`] is a directed, unweighted graph over topics.
//! [`CooccurrenceGraphBuilder`] fills it by scanning every ordered pair of
//! curriculum topics against the notes.

use crate::errors::{Result, StudyRankError};
use crate::nlp::matcher::{compile_all, WholeWordMatcher};
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{ContextScope, NotesCorpus, StudyRankConfig, Topic, TopicSet};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Below this many topics, per-topic matching runs sequentially.
const PARALLEL_THRESHOLD: usize = 64;

/// A node in the adjacency graph
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// The topic for this node
    pub topic: Topic,
    /// Successor node IDs in insertion order
    pub successors: Vec<u32>,
}

impl GraphNode {
    /// Create a new node
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            successors: Vec::new(),
        }
    }
}

/// A directed topic graph with presence-only edges.
///
/// Node IDs are assigned in first-seen order, which is the enumeration order
/// the ranking engine uses to break exact score ties.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    /// Maps topic -> node ID
    topic_to_id: FxHashMap<Topic, u32>,
    /// Node storage
    nodes: Vec<GraphNode>,
    /// Edge presence
    edge_set: FxHashSet<(u32, u32)>,
}

impl AdjacencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated node capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            topic_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
            edge_set: FxHashSet::default(),
        }
    }

    /// Get or create a node for the given topic, returning its ID
    pub fn get_or_create_node(&mut self, topic: &Topic) -> u32 {
        if let Some(&id) = self.topic_to_id.get(topic) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.topic_to_id.insert(topic.clone(), id);
        self.nodes.push(GraphNode::new(topic.clone()));
        id
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns `false` for self-loops, unknown IDs and edges already present.
    pub fn add_edge(&mut self, from: u32, to: u32) -> bool {
        if from == to {
            return false; // No self-loops
        }
        if (to as usize) >= self.nodes.len() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(from as usize) else {
            return false;
        };
        if !self.edge_set.insert((from, to)) {
            return false;
        }
        node.successors.push(to);
        true
    }

    /// Add the edge `from -> to` by topic, creating nodes as needed.
    ///
    /// Nodes are created source first, so the source is enumerated before
    /// a target it introduces.
    pub fn add_topic_edge(&mut self, from: &Topic, to: &Topic) -> bool {
        if from == to {
            return false;
        }
        let from_id = self.get_or_create_node(from);
        let to_id = self.get_or_create_node(to);
        self.add_edge(from_id, to_id)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of directed edges
    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&GraphNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by topic text
    pub fn get_node_id(&self, topic: &str) -> Option<u32> {
        self.topic_to_id.get(topic).copied()
    }

    /// Get the topic for a node ID
    pub fn get_topic(&self, id: u32) -> Option<&Topic> {
        self.nodes.get(id as usize).map(|n| &n.topic)
    }

    /// Number of successors of a node
    pub fn out_degree(&self, id: u32) -> usize {
        self.nodes.get(id as usize).map_or(0, |n| n.successors.len())
    }

    /// Successor topics of `topic`, or `None` if it is not a node
    pub fn successors(&self, topic: &str) -> Option<Vec<&Topic>> {
        let id = self.get_node_id(topic)?;
        let node = &self.nodes[id as usize];
        Some(
            node.successors
                .iter()
                .map(|&succ| &self.nodes[succ as usize].topic)
                .collect(),
        )
    }

    /// Check for the edge `from -> to` by topic text
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.get_node_id(from), self.get_node_id(to)) {
            (Some(a), Some(b)) => self.edge_set.contains(&(a, b)),
            _ => false,
        }
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &GraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Iterate over all edges as `(source, target)` topics
    pub fn edges(&self) -> impl Iterator<Item = (&Topic, &Topic)> {
        self.nodes.iter().flat_map(move |node| {
            node.successors
                .iter()
                .map(move |&succ| (&node.topic, &self.nodes[succ as usize].topic))
        })
    }

    /// The adjacency list in node enumeration order
    pub fn adjacency_list(&self) -> Vec<(&Topic, Vec<&Topic>)> {
        self.nodes
            .iter()
            .map(|node| {
                let targets = node
                    .successors
                    .iter()
                    .map(|&succ| &self.nodes[succ as usize].topic)
                    .collect();
                (&node.topic, targets)
            })
            .collect()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ============================================================================
// CooccurrenceGraphBuilder
// ============================================================================

/// Builds an [`AdjacencyGraph`] from curriculum topics and notes.
///
/// The builder is a pure function of its inputs: the same topics (in the same
/// discovery order) and notes always give the same nodes, node order and
/// edge set. Cost is quadratic in the number of topics, so callers should
/// keep topic sets to a few hundred entries or set `max_topics`.
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceGraphBuilder {
    context: ContextScope,
    max_topics: Option<usize>,
}

impl CooccurrenceGraphBuilder {
    /// Create a builder using whole-corpus context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a run configuration
    pub fn from_config(config: &StudyRankConfig) -> Self {
        Self {
            context: config.context,
            max_topics: config.max_topics,
        }
    }

    /// Builder method: set the co-occurrence context
    pub fn with_context(mut self, context: ContextScope) -> Self {
        self.context = context;
        self
    }

    /// Builder method: reject topic sets larger than `max`
    pub fn with_max_topics(mut self, max: usize) -> Self {
        self.max_topics = Some(max);
        self
    }

    /// Build the graph.
    ///
    /// Only topics with at least one incident edge become nodes. An empty
    /// topic set gives an empty graph.
    pub fn build(&self, topics: &TopicSet, notes: &NotesCorpus) -> Result<AdjacencyGraph> {
        if let Some(limit) = self.max_topics {
            if topics.len() > limit {
                return Err(StudyRankError::too_many_topics(topics.len(), limit));
            }
        }
        if topics.is_empty() {
            return Ok(AdjacencyGraph::new());
        }

        let matchers = compile_all(topics.as_slice())?;
        let graph = match self.context {
            ContextScope::Corpus => build_corpus_scope(topics.as_slice(), &matchers, notes.as_str()),
            ContextScope::Sentence => {
                build_sentence_scope(topics.as_slice(), &matchers, notes.as_str())
            }
        };

        tracing::debug!(
            topics = topics.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            context = ?self.context,
            "built co-occurrence graph"
        );
        Ok(graph)
    }
}

/// Map each matcher to a value, in parallel for larger topic sets.
fn per_topic<T, F>(matchers: &[WholeWordMatcher], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&WholeWordMatcher) -> T + Sync + Send,
{
    if matchers.len() < PARALLEL_THRESHOLD {
        matchers.iter().map(f).collect()
    } else {
        matchers.par_iter().map(f).collect()
    }
}

/// A→B iff A ≠ B and B occurs anywhere in the notes.
///
/// Whether B occurs does not depend on A, so presence is computed once per
/// topic and the pair scan only consults it.
fn build_corpus_scope(topics: &[Topic], matchers: &[WholeWordMatcher], text: &str) -> AdjacencyGraph {
    let present: Vec<bool> = per_topic(matchers, |m| m.is_match(text));

    let mut graph = AdjacencyGraph::with_capacity(topics.len());
    for (a_idx, source) in topics.iter().enumerate() {
        for (b_idx, target) in topics.iter().enumerate() {
            if a_idx != b_idx && present[b_idx] {
                graph.add_topic_edge(source, target);
            }
        }
    }
    graph
}

/// Occurrence of one topic inside one sentence
#[derive(Debug, Clone, Copy)]
struct SentenceHit {
    sentence: usize,
    first: usize,
    last: usize,
}

/// A→B iff some sentence mentions A and has a B occurrence starting after
/// A's first occurrence in that sentence.
fn build_sentence_scope(topics: &[Topic], matchers: &[WholeWordMatcher], text: &str) -> AdjacencyGraph {
    let sentences = Tokenizer::new().sentences(text);

    // Per topic, the sentences it occurs in, sorted by sentence index.
    let hits: Vec<Vec<SentenceHit>> = per_topic(matchers, |m| {
        sentences
            .iter()
            .enumerate()
            .filter_map(|(sentence, s)| {
                let starts = m.find_starts(s);
                match (starts.first(), starts.last()) {
                    (Some(&first), Some(&last)) => Some(SentenceHit {
                        sentence,
                        first,
                        last,
                    }),
                    _ => None,
                }
            })
            .collect()
    });

    let mut graph = AdjacencyGraph::with_capacity(topics.len());
    for (a_idx, source) in topics.iter().enumerate() {
        if hits[a_idx].is_empty() {
            continue;
        }
        for (b_idx, target) in topics.iter().enumerate() {
            if a_idx != b_idx && precedes_in_some_sentence(&hits[a_idx], &hits[b_idx]) {
                graph.add_topic_edge(source, target);
            }
        }
    }
    graph
}

/// Merge-walk two sentence-sorted hit lists.
fn precedes_in_some_sentence(a: &[SentenceHit], b: &[SentenceHit]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].sentence.cmp(&b[j].sentence) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                if b[j].last > a[i].first {
                    return true;
                }
                i += 1;
                j += 1;
            }
        }
    }
    false
}
