//! # Partner Repository
//!
//! Database operations for trading partners.
//!
//! The business code (`CUS000042` / `SUP000042`) is derived from the row id,
//! so insert runs as a two-step transaction: INSERT, then UPDATE with the
//! generated code. Readers never observe the intermediate NULL code.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{PageRequest, Partner, PartnerType};

const PARTNER_COLUMNS: &str =
    "id, name, code, type, phone, email, created_at, updated_at";

/// Search filter for partner listings.
#[derive(Debug, Clone, Default)]
pub struct PartnerSearch {
    /// Name prefix.
    pub name: Option<String>,
    pub partner_type: Option<PartnerType>,
}

/// Repository for partner database operations.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    pool: SqlitePool,
}

impl PartnerRepository {
    /// Creates a new PartnerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartnerRepository { pool }
    }

    /// Inserts a new partner, assigns its business code, and returns the
    /// saved row.
    pub async fn insert(&self, partner: &Partner) -> DbResult<Partner> {
        debug!(name = %partner.name, "Inserting partner");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO partners (name, code, type, phone, email, created_at, updated_at)
            VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&partner.name)
        .bind(partner.partner_type)
        .bind(&partner.phone)
        .bind(&partner.email)
        .bind(partner.created_at)
        .bind(partner.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut saved = partner.clone();
        saved.id = result.last_insert_rowid();
        saved
            .generate_code()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query("UPDATE partners SET code = ?2 WHERE id = ?1")
            .bind(saved.id)
            .bind(&saved.code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Gets a partner by database id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(partner)
    }

    /// Searches partners by name prefix and type, newest first.
    pub async fn search(
        &self,
        filter: &PartnerSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<Partner>, i64)> {
        let rows = sqlx::query_as::<_, Partner>(&format!(
            r#"
            SELECT {PARTNER_COLUMNS}
            FROM partners
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR type = ?2)
            ORDER BY id DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(&filter.name)
        .bind(filter.partner_type)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM partners
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR type = ?2)
            "#,
        )
        .bind(&filter.name)
        .bind(filter.partner_type)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Persists contact-detail changes (phone, email).
    pub async fn update_contact(&self, partner: &Partner) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE partners SET phone = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(partner.id)
        .bind(&partner.phone)
        .bind(&partner.email)
        .bind(partner.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("partner", partner.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_code_from_id() {
        let db = test_db().await;
        let repo = db.partners();

        let customer = repo
            .insert(&Partner::create("Acme Foods", PartnerType::Customer, None, None).unwrap())
            .await
            .unwrap();
        let supplier = repo
            .insert(&Partner::create("Steel Works", PartnerType::Supplier, None, None).unwrap())
            .await
            .unwrap();

        assert_eq!(customer.code.as_deref(), Some("CUS000001"));
        assert_eq!(supplier.code.as_deref(), Some("SUP000002"));

        let reloaded = repo.get_by_id(supplier.id).await.unwrap().unwrap();
        assert_eq!(reloaded.code, supplier.code);
    }

    #[tokio::test]
    async fn test_search_by_type() {
        let db = test_db().await;
        let repo = db.partners();

        repo.insert(&Partner::create("Acme Foods", PartnerType::Customer, None, None).unwrap())
            .await
            .unwrap();
        repo.insert(&Partner::create("Acme Metals", PartnerType::Supplier, None, None).unwrap())
            .await
            .unwrap();

        let (rows, total) = repo
            .search(
                &PartnerSearch {
                    name: Some("Acme".into()),
                    partner_type: Some(PartnerType::Supplier),
                },
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Acme Metals");
    }

    #[tokio::test]
    async fn test_update_contact() {
        let db = test_db().await;
        let repo = db.partners();

        let mut partner = repo
            .insert(&Partner::create("Acme", PartnerType::Customer, None, None).unwrap())
            .await
            .unwrap();

        partner.change_phone(Some("010-1234-5678".into()));
        partner.change_email(Some("orders@acme.example".into()));
        repo.update_contact(&partner).await.unwrap();

        let reloaded = repo.get_by_id(partner.id).await.unwrap().unwrap();
        assert_eq!(reloaded.phone.as_deref(), Some("010-1234-5678"));
        assert_eq!(reloaded.email.as_deref(), Some("orders@acme.example"));
    }
}
