use serde::{Deserialize, Serialize};

use crate::models::document::{Document, DocumentId};

/// A document paired with its term-containment score for one query.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub document: Document,
    pub score: usize,
}

/// A search result returned to the client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: DocumentId,
    pub title: String,
    pub path: String,
    pub snippet: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}
