use std::sync::{Arc, RwLock};

use crate::models::document::Document;
use crate::models::search::{ScoredMatch, SearchHit};
use crate::search::source::DocumentSource;

/// Maximum number of matches returned by a single query.
pub const MAX_RESULTS: usize = 8;

/// Number of body characters kept in a result snippet.
pub const SNIPPET_CHARS: usize = 140;

/// Appended to a snippet when the body was cut short.
pub const TRUNCATION_MARKER: &str = "…";

/// In-memory document collection answering term-containment queries.
///
/// The collection lives behind a single `Arc` snapshot. Queries clone the
/// `Arc` and work on it without holding the lock; `load`/`replace` build a
/// fresh snapshot and swap the reference, so a reader sees either the old or
/// the new collection, never a mix.
pub struct DocumentIndex {
    snapshot: RwLock<Arc<Vec<Document>>>,
}

impl Default for DocumentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create an index pre-populated with `documents`.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(documents)),
        }
    }

    /// (Re)load the collection from `source`.
    ///
    /// Never fails: a missing or corrupt source leaves the index empty.
    /// Returns the number of documents now held.
    pub async fn load(&self, source: &dyn DocumentSource) -> usize {
        match source.fetch().await {
            Ok(documents) => {
                let count = documents.len();
                self.replace(documents);
                tracing::info!("Loaded {} documents from {}", count, source.describe());
                count
            }
            Err(e) => {
                tracing::warn!("Search index unavailable, serving empty results: {e}");
                self.replace(Vec::new());
                0
            }
        }
    }

    /// Swap in a new collection.
    pub fn replace(&self, documents: Vec<Document>) {
        let fresh = Arc::new(documents);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = fresh,
            // Only a panic mid-assignment poisons the lock; the Arc it guards is intact.
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    /// Current point-in-time view of the collection.
    pub fn snapshot(&self) -> Arc<Vec<Document>> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Score every document against `text` and return the best matches.
    pub fn query(&self, text: &str) -> Vec<ScoredMatch> {
        let terms = tokenize(text);
        if terms.is_empty() {
            return Vec::new();
        }

        let snapshot = self.snapshot();
        rank(&snapshot, &terms)
    }

    /// Run `query` and convert the matches into wire-level hits.
    pub fn search(&self, text: &str) -> Vec<SearchHit> {
        self.query(text).into_iter().map(into_hit).collect()
    }
}

/// Lowercased, whitespace-separated, de-duplicated query terms in input order.
fn tokenize(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let term = token.to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn rank(documents: &[Document], terms: &[String]) -> Vec<ScoredMatch> {
    let mut matches: Vec<ScoredMatch> = documents
        .iter()
        .filter_map(|doc| {
            let haystack = format!("{}\n{}", doc.title, doc.body).to_lowercase();
            let score = terms
                .iter()
                .filter(|term| haystack.contains(term.as_str()))
                .count();
            (score > 0).then(|| ScoredMatch {
                document: doc.clone(),
                score,
            })
        })
        .collect();

    // `sort_by` is stable: equal scores keep collection order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(MAX_RESULTS);
    matches
}

/// First `SNIPPET_CHARS` characters of `body`, marked when truncated.
pub fn snippet(body: &str) -> String {
    match body.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{}", &body[..cut], TRUNCATION_MARKER),
        None => body.to_string(),
    }
}

fn into_hit(scored: ScoredMatch) -> SearchHit {
    let doc = scored.document;
    SearchHit {
        snippet: snippet(&doc.body),
        id: doc.id,
        title: doc.title,
        path: doc.path,
    }
}
