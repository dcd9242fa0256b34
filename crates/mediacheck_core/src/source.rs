//! Where scanned records come from.

use async_trait::async_trait;
use mediacheck_db::{MediaDb, ReferenceRow, queries};

use crate::config::ModelConfig;
use crate::error::{AuditError, Result};

/// Something that can list the stored file references of a model.
///
/// The SQLite database is the production source; tests substitute fakes.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fail if the model's table or any of its columns is unknown.
    async fn check_model(&self, model: &ModelConfig) -> Result<()>;

    /// Every record of the model, ordered by primary key, with one value per
    /// entry of `model.file_fields`.
    async fn scan_model(&self, model: &ModelConfig) -> Result<Vec<ReferenceRow>>;
}

#[async_trait]
impl ReferenceSource for MediaDb {
    async fn check_model(&self, model: &ModelConfig) -> Result<()> {
        if !queries::table_exists(self.pool(), &model.table).await? {
            return Err(AuditError::UnknownTable {
                model: model.label.clone(),
                table: model.table.clone(),
            });
        }

        let available = queries::table_columns(self.pool(), &model.table).await?;
        let wanted = std::iter::once(&model.primary_key).chain(model.file_fields.iter());
        for column in wanted {
            if !available.contains(column) {
                return Err(AuditError::UnknownColumn {
                    model: model.label.clone(),
                    table: model.table.clone(),
                    column: column.clone(),
                    available,
                });
            }
        }

        Ok(())
    }

    async fn scan_model(&self, model: &ModelConfig) -> Result<Vec<ReferenceRow>> {
        let rows = queries::scan_references(
            self.pool(),
            &model.table,
            &model.primary_key,
            &model.file_fields,
        )
        .await?;
        Ok(rows)
    }
}
