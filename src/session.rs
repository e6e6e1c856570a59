//! Per-user session state around an [`Analyzer`].
//!
//! Both operations take `&mut self`, so a session has at most one request in
//! flight. Share a session between tasks by wrapping it in a
//! `tokio::sync::Mutex`.

use crate::app::Analyzer;
use crate::models::{AnalysisResult, ContentInput, ImageAttachment};
use crate::{Error, Result};
use uuid::Uuid;

pub struct StudySession {
    id: Uuid,
    analyzer: Analyzer,
    input: ContentInput,
    result: Option<AnalysisResult>,
}

impl StudySession {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            id: Uuid::new_v4(),
            analyzer,
            input: ContentInput::default(),
            result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> &ContentInput {
        &self.input
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.text = text.into();
    }

    pub fn add_image(&mut self, image: ImageAttachment) {
        self.input.images.push(image);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<ImageAttachment> {
        (index < self.input.images.len()).then(|| self.input.images.remove(index))
    }

    /// Run a fresh analysis, replacing any previous result.
    ///
    /// The previous result is cleared before the request is sent, so a
    /// failed analysis leaves the session without a result.
    pub async fn analyze(&mut self) -> Result<&AnalysisResult> {
        if self.input.is_empty() {
            return Err(Error::EmptyInput);
        }

        self.result = None;
        tracing::info!(session = %self.id, "Starting analysis");

        let result = self.analyzer.analyze(&self.input).await?;
        Ok(self.result.insert(result))
    }

    /// Append a new batch of questions to the current result.
    ///
    /// Returns how many questions were appended. On failure nothing is
    /// appended.
    pub async fn generate_more(&mut self) -> Result<usize> {
        let existing = match &self.result {
            Some(result) => &result.questions,
            None => return Err(Error::NoActiveAnalysis),
        };

        tracing::info!(
            session = %self.id,
            "Generating more questions ({} existing)",
            existing.len()
        );

        let new_questions = self.analyzer.generate_more(&self.input, existing).await?;
        let added = new_questions.len();

        if let Some(result) = self.result.as_mut() {
            result.questions.extend(new_questions);
        }
        Ok(added)
    }
}
