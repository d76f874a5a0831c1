use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Comment(pub String);

impl Comment {
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Append-only list of comments for the current session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CommentLog {
    entries: Vec<Comment>,
}

impl CommentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitespace-only text is rejected. Accepted text is kept as typed.
    pub fn submit(&mut self, text: &str) -> Option<&Comment> {
        if text.trim().is_empty() {
            return None;
        }
        self.entries.push(Comment(text.to_string()));
        self.entries.last()
    }

    pub fn entries(&self) -> &[Comment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
