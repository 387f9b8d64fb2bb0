use topicpool_core::error::Result;
use topicpool_core::normalize::normalize;
use topicpool_core::traits::{CompileOptions, QueryCompiler};
use topicpool_core::types::{LabeledQuery, Topic};

/// Options the review tool compiles reviewer queries with.
pub const REVIEWER_COMPILE_OPTIONS: CompileOptions = CompileOptions { conjunctive: true, lenient: false };

/// Assembles the labelled query batch pooled for a topic.
pub struct TopicQueryPlanner {
    content_field: String,
}

impl TopicQueryPlanner {
    pub fn new(content_field: impl Into<String>) -> Self {
        Self { content_field: content_field.into() }
    }

    /// Order: topic text, then per extract its citing sentence, citing
    /// paragraph and precompiled queries, then the reviewer's saved queries.
    /// Blank texts are left out rather than sent as empty match queries.
    pub fn plan(&self, topic: &Topic, user_queries: &[String], compiler: &dyn QueryCompiler) -> Result<Vec<LabeledQuery>> {
        let mut planned = Vec::new();
        self.push_prose(&mut planned, &topic.text);

        for extract in &topic.extracts {
            self.push_prose(&mut planned, &extract.citing_sentence);
            self.push_prose(&mut planned, &extract.citing_paragraph);
            for (i, query) in extract.compiled_queries.iter().enumerate() {
                let label = extract.queries.get(i).cloned().unwrap_or_else(|| query.to_json());
                planned.push(LabeledQuery::new(label, query.clone()));
            }
        }

        for text in user_queries.iter().filter(|t| !t.trim().is_empty()) {
            let query = compiler.compile(text, &self.content_field, &[], REVIEWER_COMPILE_OPTIONS)?;
            planned.push(LabeledQuery::new(text.clone(), query));
        }
        Ok(planned)
    }

    fn push_prose(&self, planned: &mut Vec<LabeledQuery>, text: &str) {
        if text.trim().is_empty() { return; }
        planned.push(LabeledQuery::new(text, normalize(text, &self.content_field)));
    }
}
