//! Tantivy-based search index module.
//!
//! Full-text search across deck titles, descriptions, and slide text with
//! field boosting.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Presentation, Slide};

/// Field boost values matching frontend search weights.
const BOOST_TITLE: f32 = 10.0;
const BOOST_DESCRIPTION: f32 = 7.0;
const BOOST_SLIDE_TEXT: f32 = 4.0;

/// Search result with presentation id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub presentation_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    presentation_id: Field,
    title: Field,
    description: Field,
    slide_text: Field,
}

/// Tantivy search index for presentations.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        // Define schema
        let mut schema_builder = Schema::builder();
        let presentation_id = schema_builder.add_text_field("presentation_id", STORED);
        let title = schema_builder.add_text_field("title", TEXT | STORED);
        let description = schema_builder.add_text_field("description", TEXT);
        let slide_text = schema_builder.add_text_field("slide_text", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            presentation_id,
            title,
            description,
            slide_text,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from presentations.
    pub async fn rebuild(&self, presentations: &[Presentation]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        for presentation in presentations {
            let doc = self.create_document(presentation);
            writer.add_document(doc)?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!(
            "Search index rebuilt with {} presentations",
            presentations.len()
        );
        Ok(())
    }

    /// Index a single presentation, replacing any previous document.
    pub async fn index_presentation(&self, presentation: &Presentation) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term =
            tantivy::Term::from_field_text(self.fields.presentation_id, &presentation.id);
        writer.delete_term(term);

        let doc = self.create_document(presentation);
        writer.add_document(doc)?;
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Remove a presentation from the index.
    pub async fn remove_presentation(&self, presentation_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.presentation_id, presentation_id);
        writer.delete_term(term);
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Search for presentations matching the query. Returns the requested
    /// page of hits plus the total hit count across all pages.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<SearchResult>, usize), AppError> {
        // TopDocs::with_limit panics on 0, so an empty page is short-circuited
        if query_str.trim().is_empty() || limit == 0 {
            return Ok((Vec::new(), 0));
        }

        let searcher = self.reader.searcher();

        let query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.title,
                self.fields.description,
                self.fields.slide_text,
            ],
        );

        let base_query = query_parser
            .parse_query(query_str)
            .map_err(|e| AppError::Search(format!("Invalid search query: {}", e)))?;

        // Field-specific boosted queries combined with OR semantics
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();

        let field_queries = [
            (self.fields.title, BOOST_TITLE),
            (self.fields.description, BOOST_DESCRIPTION),
            (self.fields.slide_text, BOOST_SLIDE_TEXT),
        ];

        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            if let Ok(field_query) = field_parser.parse_query(query_str) {
                let boosted = BoostQuery::new(field_query, boost);
                subqueries.push((Occur::Should, Box::new(boosted)));
            }
        }

        let combined_query = if subqueries.is_empty() {
            base_query
        } else {
            Box::new(BooleanQuery::new(subqueries))
        };

        // Execute search with pagination
        let collector = (TopDocs::with_limit(limit.saturating_add(offset)), Count);
        let (top_docs, total) = searcher
            .search(&combined_query, &collector)
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let presentation_id = doc
                    .get_first(self.fields.presentation_id)?
                    .as_str()?
                    .to_string();
                Some(SearchResult {
                    presentation_id,
                    score,
                })
            })
            .collect();

        Ok((results, total))
    }

    /// Create a Tantivy document from a presentation.
    fn create_document(&self, presentation: &Presentation) -> TantivyDocument {
        let mut slide_text = String::new();
        for slide in &presentation.slides {
            collect_slide_text(slide, &mut slide_text);
        }

        doc!(
            self.fields.presentation_id => presentation.id.clone(),
            self.fields.title => presentation.title.clone(),
            self.fields.description => presentation.description.clone().unwrap_or_default(),
            self.fields.slide_text => slide_text
        )
    }
}

/// Gather the searchable text of a slide, its fragments, and any vertical
/// stack beneath it.
fn collect_slide_text(slide: &Slide, out: &mut String) {
    out.push_str(&slide.content.text_for_index());
    out.push(' ');
    for fragment in &slide.fragments {
        out.push_str(&fragment.content);
        out.push(' ');
    }
    for vertical in &slide.vertical_slides {
        collect_slide_text(vertical, out);
    }
}
