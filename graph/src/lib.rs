pub mod store;
pub mod vertex;

pub use store::{GraphError, ReviewGraph, POSITIVE_RATING_THRESHOLD};
pub use vertex::{Vertex, VertexId};
