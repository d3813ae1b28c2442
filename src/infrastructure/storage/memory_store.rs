use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{
    application::services::ArticleStore,
    domain::{Article, DomainError},
};

/// Process-local article store. Nothing is persisted across restarts.
#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<BTreeMap<String, Article>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArticleStore for InMemoryArticleStore {
    fn list(&self) -> Result<Vec<Article>, DomainError> {
        Ok(self.articles.read().values().cloned().collect())
    }

    fn insert(&self, article: &Article) -> Result<(), DomainError> {
        let mut guard = self.articles.write();
        if guard.contains_key(&article.id) {
            return Err(DomainError::conflict(format!(
                "article `{}` already exists",
                article.id
            )));
        }

        guard.insert(article.id.clone(), article.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Article, DomainError> {
        self.articles
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("article `{id}`")))
    }

    fn update(&self, article: &Article) -> Result<(), DomainError> {
        match self.articles.write().get_mut(&article.id) {
            Some(existing) => {
                *existing = article.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("article `{}`", article.id))),
        }
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.articles
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("article `{id}`")))
    }

    fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
