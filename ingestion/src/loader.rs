use crate::record::ReviewRecord;
use graph::{GraphError, ReviewGraph};
use indexmap::IndexSet;
use reviewgraph_core::config::IngestionConfig;
use reviewgraph_core::error::{ErrorCode, ReviewGraphError};
use reviewgraph_core::model::Role;
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Graph error on line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },
}

impl ReviewGraphError for IngestionError {
    fn error_code(&self) -> ErrorCode {
        match self {
            IngestionError::Io(_) => ErrorCode::Internal,
            IngestionError::MalformedRecord { .. } => ErrorCode::DataLoss,
            IngestionError::Graph { source, .. } => source.error_code(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub records: usize,
    pub skipped_lines: usize,
    /// Records that replaced the review already stored for their pair.
    pub overwritten_edges: usize,
}

/// Graph built from an export, with product keys in first-seen order.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: ReviewGraph,
    pub products: IndexSet<String>,
    pub stats: LoadStats,
}

pub struct GraphLoader {
    config: IngestionConfig,
}

impl GraphLoader {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    pub fn load_str(&self, input: &str) -> Result<LoadedGraph, IngestionError> {
        self.load_reader(input.as_bytes())
    }

    pub fn load_reader(&self, reader: impl BufRead) -> Result<LoadedGraph, IngestionError> {
        let mut builder = GraphBuilder::new(self.config.skip_malformed);
        for (idx, line) in reader.lines().enumerate() {
            builder.ingest_line(idx + 1, &line?)?;
        }
        Ok(builder.finish())
    }

    /// Stream a line-delimited JSON export from disk.
    pub async fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedGraph, IngestionError> {
        let path = path.as_ref();
        info!("Loading reviews from {}", path.display());

        let file = tokio::fs::File::open(path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut builder = GraphBuilder::new(self.config.skip_malformed);
        let mut line_no = 0;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            builder.ingest_line(line_no, &line)?;
        }
        Ok(builder.finish())
    }

    /// Load the file named by `ingestion.data_path`.
    pub async fn load_configured(&self) -> Result<LoadedGraph, IngestionError> {
        let path = self.config.data_path.clone();
        self.load_path(path).await
    }
}

struct GraphBuilder {
    graph: ReviewGraph,
    products: IndexSet<String>,
    stats: LoadStats,
    skip_malformed: bool,
}

impl GraphBuilder {
    fn new(skip_malformed: bool) -> Self {
        Self {
            graph: ReviewGraph::new(),
            products: IndexSet::new(),
            stats: LoadStats::default(),
            skip_malformed,
        }
    }

    fn ingest_line(&mut self, line: usize, raw: &str) -> Result<(), IngestionError> {
        if raw.trim().is_empty() {
            return Ok(());
        }

        let record = match ReviewRecord::parse_json(raw) {
            Ok(record) => record,
            Err(source) if self.skip_malformed => {
                warn!("Skipping malformed record on line {}: {}", line, source);
                self.stats.skipped_lines += 1;
                return Ok(());
            }
            Err(source) => return Err(IngestionError::MalformedRecord { line, source }),
        };

        self.ingest_record(&record)
            .map_err(|source| IngestionError::Graph { line, source })
    }

    fn ingest_record(&mut self, record: &ReviewRecord) -> Result<(), GraphError> {
        let asin = record.asin.as_str();
        let reviewer = record.reviewer_id.as_str();

        // Existing keys are never re-added: that would orphan their edges.
        if !self.graph.contains(asin) {
            self.graph.add_vertex(asin, Role::Product);
        }
        if !self.graph.contains(reviewer) {
            self.graph.add_vertex(reviewer, Role::Reviewer);
        }
        self.products.insert(record.asin.clone());

        if self.graph.adjacent(asin, reviewer) {
            debug!("Reviewer {} reviewed {} again; keeping the latest review", reviewer, asin);
            self.stats.overwritten_edges += 1;
        }
        self.graph.add_edge(asin, reviewer, record.to_review())?;
        debug_assert!(self.graph.adjacent(asin, reviewer));

        self.stats.records += 1;
        Ok(())
    }

    fn finish(self) -> LoadedGraph {
        info!(
            "Loaded {} record(s): {} vertices, {} edges, {} product(s), {} skipped",
            self.stats.records,
            self.graph.vertex_count(),
            self.graph.edge_count(),
            self.products.len(),
            self.stats.skipped_lines
        );
        LoadedGraph {
            graph: self.graph,
            products: self.products,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(skip_malformed: bool) -> GraphLoader {
        GraphLoader::new(IngestionConfig {
            data_path: String::new(),
            skip_malformed,
        })
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let input = "\n{\"asin\":\"P1\",\"reviewerID\":\"R1\",\"overall\":4.0,\"reviewTime\":\"01 01, 2012\"}\n   \n";
        let loaded = loader(false).load_str(input).unwrap();
        assert_eq!(loaded.stats.records, 1);
        assert_eq!(loaded.stats.skipped_lines, 0);
        assert!(loaded.graph.adjacent("P1", "R1"));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "{\"asin\":\"P1\",\"reviewerID\":\"R1\",\"overall\":4.0,\"reviewTime\":\"x\"}\nnot json\n";
        let err = loader(false).load_str(input).unwrap_err();
        assert!(matches!(err, IngestionError::MalformedRecord { line: 2, .. }));
        assert_eq!(err.error_code(), ErrorCode::DataLoss);
    }

    #[test]
    fn test_malformed_line_skipped_when_configured() {
        let input = "{\"asin\":\"P1\"}\n{\"asin\":\"P1\",\"reviewerID\":\"R1\",\"overall\":4.0,\"reviewTime\":\"x\"}\n";
        let loaded = loader(true).load_str(input).unwrap();
        assert_eq!(loaded.stats.records, 1);
        assert_eq!(loaded.stats.skipped_lines, 1);
    }

    #[test]
    fn test_key_used_as_product_and_reviewer_is_rejected() {
        let input = concat!(
            "{\"asin\":\"X\",\"reviewerID\":\"R1\",\"overall\":4.0,\"reviewTime\":\"x\"}\n",
            "{\"asin\":\"P2\",\"reviewerID\":\"X\",\"overall\":4.0,\"reviewTime\":\"x\"}\n",
        );
        let err = loader(false).load_str(input).unwrap_err();
        match err {
            IngestionError::Graph { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(source, GraphError::RoleMismatch { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
