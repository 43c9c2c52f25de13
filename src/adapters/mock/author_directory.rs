use crate::domain::value_objects::AuthorId;
use crate::ports::author_directory::{AuthorDirectory as AuthorDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory AuthorDirectory keyed by author name.
#[derive(Debug)]
pub struct AuthorDirectory {
    authors: Mutex<HashMap<String, AuthorId>>,
}

impl AuthorDirectory {
    pub fn new() -> Self {
        Self {
            authors: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.authors.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AuthorDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorDirectoryTrait for AuthorDirectory {
    async fn find_or_create_by_name(&self, name: &str) -> Result<AuthorId> {
        let mut authors = self.authors.lock().unwrap();
        Ok(*authors.entry(name.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let directory = AuthorDirectory::new();

        let first = directory.find_or_create_by_name("Ursula K. Le Guin").await.unwrap();
        let second = directory.find_or_create_by_name("Ursula K. Le Guin").await.unwrap();
        let other = directory.find_or_create_by_name("Octavia E. Butler").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(directory.len(), 2);
    }
}
