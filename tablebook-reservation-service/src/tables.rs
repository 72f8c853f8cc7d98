use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use thiserror::Error;
use tracing::{info, instrument};

use crate::models::Table;
use crate::store::{StoreError, TableCatalog};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("table with the same id or number already exists")]
    Duplicate,
    #[error("table {0} not found")]
    NotFound(String),
    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for TableError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => TableError::Duplicate,
            err => TableError::Storage(err),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> TableError {
    TableError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

/// Administrative access to the table collection.
#[derive(Clone)]
pub struct TableRegistry {
    catalog: Arc<dyn TableCatalog>,
}

impl TableRegistry {
    pub fn new(catalog: Arc<dyn TableCatalog>) -> Self {
        Self { catalog }
    }

    #[instrument(skip_all, fields(id = %table.id, number = table.number))]
    pub async fn create_table(&self, table: Table) -> Result<String, TableError> {
        if table.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty"));
        }
        if table.number <= 0 {
            return Err(invalid("number", "must be a positive integer"));
        }
        if table.places <= 0 {
            return Err(invalid("places", "must be a positive integer"));
        }
        if table.min_order.as_ref().is_some_and(|m| *m < BigDecimal::zero()) {
            return Err(invalid("minOrder", "must not be negative"));
        }

        if self.catalog.find_by_id(&table.id).await?.is_some()
            || self.catalog.find_by_number(table.number).await?.is_some()
        {
            return Err(TableError::Duplicate);
        }
        self.catalog.insert_table(&table).await?;

        info!("table created");
        Ok(table.id)
    }

    pub async fn list_tables(&self) -> Result<Vec<Table>, TableError> {
        Ok(self.catalog.list_tables().await?)
    }

    pub async fn get_table(&self, id: &str) -> Result<Table, TableError> {
        self.catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::store::MemoryStore;

    fn table(id: &str, number: i32) -> Table {
        Table {
            id: id.to_string(),
            number,
            places: 4,
            is_vip: true,
            min_order: Some(BigDecimal::from_str("250.50").unwrap()),
        }
    }

    fn registry() -> TableRegistry {
        TableRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get_table() {
        let registry = registry();

        let id = registry.create_table(table("14406", 1)).await.unwrap();
        assert_eq!(id, "14406");

        let stored = registry.get_table("14406").await.unwrap();
        assert_eq!(stored, table("14406", 1));
    }

    #[tokio::test]
    async fn test_get_table_is_by_id() {
        let registry = registry();
        registry.create_table(table("14406", 1)).await.unwrap();

        let err = registry.get_table("1").await.unwrap_err();
        assert!(matches!(err, TableError::NotFound(id) if id == "1"));
    }

    #[tokio::test]
    async fn test_rejects_duplicate_number_and_id() {
        let registry = registry();
        registry.create_table(table("1", 1)).await.unwrap();

        assert!(matches!(
            registry.create_table(table("2", 1)).await,
            Err(TableError::Duplicate)
        ));
        assert!(matches!(
            registry.create_table(table("1", 2)).await,
            Err(TableError::Duplicate)
        ));
        assert_eq!(registry.list_tables().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_fields() {
        let registry = registry();

        let mut t = table("1", 0);
        assert!(matches!(
            registry.create_table(t.clone()).await,
            Err(TableError::InvalidField { field: "number", .. })
        ));

        t.number = 1;
        t.places = 0;
        assert!(matches!(
            registry.create_table(t.clone()).await,
            Err(TableError::InvalidField { field: "places", .. })
        ));

        t.places = 2;
        t.min_order = Some(BigDecimal::from(-1));
        assert!(matches!(
            registry.create_table(t).await,
            Err(TableError::InvalidField { field: "minOrder", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_tables_sorted_by_number() {
        let registry = registry();
        registry.create_table(table("a", 3)).await.unwrap();
        registry.create_table(table("b", 1)).await.unwrap();
        registry.create_table(table("c", 2)).await.unwrap();

        let numbers = registry
            .list_tables()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
