use crate::vertex::{Vertex, VertexId};
use indexmap::{IndexMap, IndexSet};
use reviewgraph_core::error::{ErrorCode, ReviewGraphError};
use reviewgraph_core::model::{Review, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Ratings strictly above this count as a positive signal for similarity.
pub const POSITIVE_RATING_THRESHOLD: f64 = 3.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("cannot add edge: vertex {0} does not exist")]
    MissingVertex(String),
    #[error("unknown vertex: {0}")]
    UnknownVertex(String),
    #[error("cannot connect vertex {0} to itself")]
    SelfLoop(String),
    #[error("cannot connect {first} to {second}: both are {role} vertices")]
    RoleMismatch {
        first: String,
        second: String,
        role: Role,
    },
    #[error("corrupt graph document: {0}")]
    Corrupt(String),
}

impl ReviewGraphError for GraphError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GraphError::MissingVertex(_) => ErrorCode::FailedPrecondition,
            GraphError::UnknownVertex(_) => ErrorCode::NotFound,
            GraphError::SelfLoop(_) => ErrorCode::InvalidArgument,
            GraphError::RoleMismatch { .. } => ErrorCode::InvalidArgument,
            GraphError::Corrupt(_) => ErrorCode::DataLoss,
        }
    }
}

/// Bipartite product/reviewer graph.
///
/// Vertices live in an arena addressed by [`VertexId`]; `index` maps each key
/// to its current handle. Edges are stored twice, once in each endpoint's
/// neighbour map, and always carry exactly one review.
///
/// Mutation needs `&mut self`, so the graph is built by a single owner and can
/// then be shared by reference for concurrent reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct ReviewGraph {
    vertices: Vec<Vertex>,
    index: HashMap<String, VertexId>,
}

/// Unchecked wire form of [`ReviewGraph`].
#[derive(Deserialize)]
struct RawGraph {
    vertices: Vec<Vertex>,
    index: HashMap<String, VertexId>,
}

impl TryFrom<RawGraph> for ReviewGraph {
    type Error = GraphError;

    /// Every handle must point into the arena and every key must name the
    /// vertex it maps to, so queries can index the arena without checks.
    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        let len = raw.vertices.len();
        for (key, id) in &raw.index {
            let vertex = raw.vertices.get(id.index()).ok_or_else(|| {
                GraphError::Corrupt(format!("key {} points at missing vertex {}", key, id.index()))
            })?;
            if vertex.key() != key {
                return Err(GraphError::Corrupt(format!(
                    "key {} points at vertex {} keyed {}",
                    key,
                    id.index(),
                    vertex.key()
                )));
            }
        }
        for vertex in &raw.vertices {
            if let Some((id, _)) = vertex.neighbours().find(|(id, _)| id.index() >= len) {
                return Err(GraphError::Corrupt(format!(
                    "vertex {} has neighbour {} outside an arena of {}",
                    vertex.key(),
                    id.index(),
                    len
                )));
            }
        }
        Ok(Self {
            vertices: raw.vertices,
            index: raw.index,
        })
    }
}

impl ReviewGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh, edge-less vertex at `key`.
    ///
    /// Re-adding an existing key re-points the key at a new vertex. The old
    /// vertex is left in place and neighbours connected to it keep pointing
    /// at it, so callers must not re-add keys once edges exist.
    pub fn add_vertex(&mut self, key: impl Into<String>, role: Role) -> VertexId {
        let key = key.into();
        let id = VertexId(self.vertices.len());

        if let Some(old) = self.index.get(&key) {
            let old = &self.vertices[old.index()];
            if old.degree() > 0 {
                warn!(
                    "Replacing vertex {} which still has {} edge(s); neighbours keep the stale vertex",
                    key,
                    old.degree()
                );
            }
        }

        self.vertices.push(Vertex::new(key.clone(), role));
        self.index.insert(key, id);
        id
    }

    /// Connect a product and a reviewer, storing `review` on the edge.
    ///
    /// A second call for the same pair overwrites the stored review. Nothing
    /// is written unless every check passes.
    pub fn add_edge(&mut self, key1: &str, key2: &str, review: Review) -> Result<(), GraphError> {
        if key1 == key2 {
            return Err(GraphError::SelfLoop(key1.to_string()));
        }
        let id1 = self.lookup(key1).ok_or_else(|| GraphError::MissingVertex(key1.to_string()))?;
        let id2 = self.lookup(key2).ok_or_else(|| GraphError::MissingVertex(key2.to_string()))?;

        let role = self.vertices[id1.index()].role();
        if role == self.vertices[id2.index()].role() {
            return Err(GraphError::RoleMismatch {
                first: key1.to_string(),
                second: key2.to_string(),
                role,
            });
        }

        let previous = self.vertices[id1.index()].connect(id2, review.clone());
        self.vertices[id2.index()].connect(id1, review);

        if previous.is_some() {
            debug!("Overwrote review on edge {} - {}", key1, key2);
        }
        Ok(())
    }

    /// Whether `key1` has a neighbour whose key is `key2`. Unknown keys are
    /// simply not adjacent.
    pub fn adjacent(&self, key1: &str, key2: &str) -> bool {
        match (self.vertex(key1), self.contains(key2)) {
            (Some(v1), true) => v1
                .neighbours()
                .any(|(id, _)| self.vertices[id.index()].key() == key2),
            _ => false,
        }
    }

    /// Distinct reviews on every edge touching `key`.
    ///
    /// Structurally identical reviews on different edges collapse into one
    /// entry; use [`ReviewGraph::incident_reviews`] to keep every edge.
    pub fn neighbouring_reviews(&self, key: &str) -> Result<IndexSet<Review>, GraphError> {
        let vertex = self.require(key)?;
        Ok(vertex.neighbours().map(|(_, review)| review.clone()).collect())
    }

    /// Every edge touching `key` as `(neighbour key, review)`, one item per edge.
    pub fn incident_reviews(
        &self,
        key: &str,
    ) -> Result<impl Iterator<Item = (&str, &Review)> + '_, GraphError> {
        let vertex = self.require(key)?;
        Ok(vertex
            .neighbours()
            .map(move |(id, review)| (self.vertices[id.index()].key(), review)))
    }

    /// Other products reviewed positively by the reviewers of `asin`.
    ///
    /// Walks `asin -> reviewer -> product`, keeps reviews rated strictly above
    /// [`POSITIVE_RATING_THRESHOLD`], and groups them by product key in the
    /// order they are discovered. `asin` itself never appears in the result.
    pub fn similar_product_reviews(
        &self,
        asin: &str,
    ) -> Result<IndexMap<String, Vec<Review>>, GraphError> {
        let product = self.require(asin)?;
        let mut similar: IndexMap<String, Vec<Review>> = IndexMap::new();

        let reviewers = product
            .neighbours()
            .map(|(id, _)| &self.vertices[id.index()])
            .filter(|v| v.role() == Role::Reviewer);

        for reviewer in reviewers {
            for (other_id, review) in reviewer.neighbours() {
                let other = &self.vertices[other_id.index()];
                if other.role() != Role::Product || other.key() == asin {
                    continue;
                }
                if review.rating() > POSITIVE_RATING_THRESHOLD {
                    similar
                        .entry(other.key().to_string())
                        .or_default()
                        .push(review.clone());
                }
            }
        }

        debug!(
            "Found {} similar product(s) for {}",
            similar.len(),
            asin
        );
        Ok(similar)
    }

    pub fn vertex(&self, key: &str) -> Option<&Vertex> {
        self.lookup(key).map(|id| &self.vertices[id.index()])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn role_of(&self, key: &str) -> Option<Role> {
        self.vertex(key).map(Vertex::role)
    }

    /// Number of keys currently in the graph.
    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    /// Undirected edges stored in the graph, each counted once. Edges of
    /// replaced vertices are still counted.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(Vertex::degree).sum::<usize>() / 2
    }

    /// Live keys with the given role, in no particular order.
    pub fn keys_with_role(&self, role: Role) -> impl Iterator<Item = &str> + '_ {
        self.index
            .values()
            .map(|id| &self.vertices[id.index()])
            .filter(move |v| v.role() == role)
            .map(Vertex::key)
    }

    fn lookup(&self, key: &str) -> Option<VertexId> {
        self.index.get(key).copied()
    }

    fn require(&self, key: &str) -> Result<&Vertex, GraphError> {
        self.vertex(key)
            .ok_or_else(|| GraphError::UnknownVertex(key.to_string()))
    }
}
