use indexmap::IndexMap;
use reviewgraph_core::model::{Review, Role};
use serde::{Deserialize, Serialize};

/// Arena handle of a vertex inside its owning [`crate::ReviewGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A product or reviewer. Neighbours are held by handle; the graph owns
/// every vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    key: String,
    role: Role,
    neighbours: IndexMap<VertexId, Review>,
}

impl Vertex {
    pub(crate) fn new(key: String, role: Role) -> Self {
        Self {
            key,
            role,
            neighbours: IndexMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Review on the edge to `other`, if any.
    pub fn review_with(&self, other: VertexId) -> Option<&Review> {
        self.neighbours.get(&other)
    }

    pub fn neighbours(&self) -> impl Iterator<Item = (VertexId, &Review)> + '_ {
        self.neighbours.iter().map(|(id, review)| (*id, review))
    }

    /// Returns the review previously stored on the edge, if it was overwritten.
    pub(crate) fn connect(&mut self, other: VertexId, review: Review) -> Option<Review> {
        self.neighbours.insert(other, review)
    }
}
