use serde::{Deserialize, Serialize};

/// Параметры поиска для простых справочников
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Непустая строка поиска
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
