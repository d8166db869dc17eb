use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when building or mutating question definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question key cannot be empty")]
    EmptyKey,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("no question with key: {0}")]
    UnknownKey(String),
}

//
// ─── QUESTION KEY ─────────────────────────────────────────────────────────────
//

/// Validated question key (trimmed, non-empty).
///
/// A key identifies its question across edits and becomes a column name in
/// the results file, so it should stay stable once responses exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionKey(String);

impl QuestionKey {
    /// Create a validated question key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyKey` if the key is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, QuestionError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single yes/no survey question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    key: QuestionKey,
    text: String,
}

impl Question {
    /// Create a question with validated prompt text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is empty after trimming.
    pub fn new(key: QuestionKey, text: impl Into<String>) -> Result<Self, QuestionError> {
        let raw = text.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        Ok(Self {
            key,
            text: trimmed.to_string(),
        })
    }

    #[must_use]
    pub fn key(&self) -> &QuestionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── QUESTION SET ─────────────────────────────────────────────────────────────
//

/// Ordered collection of questions with unique keys.
///
/// Iteration order is insertion order; it fixes both the prompt order in a
/// survey session and the column order in the results file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
        }
    }

    /// Insert a question. When the key already exists, the stored text is
    /// replaced in place and the question keeps its position.
    pub fn upsert(&mut self, question: Question) {
        match self.position(question.key()) {
            Some(index) => self.questions[index] = question,
            None => self.questions.push(question),
        }
    }

    /// Replace the text of an existing question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownKey` if no question has the key, or
    /// `QuestionError::EmptyText` if the replacement text is empty.
    pub fn edit(&mut self, key: &QuestionKey, text: impl Into<String>) -> Result<(), QuestionError> {
        let index = self
            .position(key)
            .ok_or_else(|| QuestionError::UnknownKey(key.to_string()))?;
        self.questions[index] = Question::new(key.clone(), text)?;
        Ok(())
    }

    /// Remove a question by key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownKey` if no question has the key.
    pub fn remove(&mut self, key: &QuestionKey) -> Result<Question, QuestionError> {
        let index = self
            .position(key)
            .ok_or_else(|| QuestionError::UnknownKey(key.to_string()))?;
        Ok(self.questions.remove(index))
    }

    #[must_use]
    pub fn get(&self, key: &QuestionKey) -> Option<&Question> {
        self.position(key).and_then(|index| self.questions.get(index))
    }

    /// The question at a zero-based position, in insertion order.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    fn position(&self, key: &QuestionKey) -> Option<usize> {
        self.questions.iter().position(|q| q.key() == key)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(key: &str, text: &str) -> Question {
        Question::new(QuestionKey::new(key).unwrap(), text).unwrap()
    }

    #[test]
    fn key_is_trimmed_and_non_empty() {
        let key = QuestionKey::new("  gender  ").unwrap();
        assert_eq!(key.as_str(), "gender");

        let err = QuestionKey::new("   ").unwrap_err();
        assert!(matches!(err, QuestionError::EmptyKey));
    }

    #[test]
    fn question_text_cannot_be_blank() {
        let key = QuestionKey::new("gender").unwrap();
        let err = Question::new(key, "  ").unwrap_err();
        assert!(matches!(err, QuestionError::EmptyText));
    }

    #[test]
    fn upsert_appends_new_keys_in_order() {
        let mut set = QuestionSet::new();
        set.upsert(question("gender", "性別は?"));
        set.upsert(question("likes_sports", "スポーツは好き?"));

        let keys: Vec<&str> = set.iter().map(|q| q.key().as_str()).collect();
        assert_eq!(keys, ["gender", "likes_sports"]);
    }

    #[test]
    fn upsert_replaces_text_in_place() {
        let mut set = QuestionSet::new();
        set.upsert(question("gender", "old text"));
        set.upsert(question("likes_sports", "スポーツは好き?"));
        set.upsert(question("gender", "性別は?"));

        assert_eq!(set.len(), 2);
        let keys: Vec<&str> = set.iter().map(|q| q.key().as_str()).collect();
        assert_eq!(keys, ["gender", "likes_sports"]);

        let key = QuestionKey::new("gender").unwrap();
        assert_eq!(set.get(&key).unwrap().text(), "性別は?");
    }

    #[test]
    fn edit_rewrites_only_the_text() {
        let mut set = QuestionSet::new();
        set.upsert(question("gender", "old text"));

        let key = QuestionKey::new("gender").unwrap();
        set.edit(&key, "性別は?").unwrap();
        assert_eq!(set.get(&key).unwrap().text(), "性別は?");

        let missing = QuestionKey::new("missing").unwrap();
        let err = set.edit(&missing, "text").unwrap_err();
        assert!(matches!(err, QuestionError::UnknownKey(_)));
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let mut set = QuestionSet::new();
        set.upsert(question("a", "question a"));
        set.upsert(question("b", "question b"));
        set.upsert(question("c", "question c"));

        let removed = set.remove(&QuestionKey::new("b").unwrap()).unwrap();
        assert_eq!(removed.key().as_str(), "b");

        let keys: Vec<&str> = set.iter().map(|q| q.key().as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn lookup_by_position_follows_insertion_order() {
        let mut set = QuestionSet::new();
        set.upsert(question("a", "question a"));
        set.upsert(question("b", "question b"));

        assert_eq!(set.at(1).unwrap().key().as_str(), "b");
        assert!(set.at(2).is_none());
    }
}
