use std::fmt;

/// Face embedding vector produced by an [`EmbeddingSource`](crate::EmbeddingSource).
///
/// Typically 128-dimensional. Never persisted by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

/// All embeddings extracted from one image, in detection order.
pub type FaceSet = Vec<Embedding>;

/// Which of the two compared images a value or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Reference,
    Captured,
}

impl ImageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::Reference => "reference",
            ImageRole::Captured => "captured",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(ImageRole::Reference.to_string(), "reference");
        assert_eq!(ImageRole::Captured.to_string(), "captured");
    }

    #[test]
    fn test_embedding_dim() {
        let e = Embedding::from(vec![0.1, 0.2, 0.3]);
        assert_eq!(e.dim(), 3);
    }
}
