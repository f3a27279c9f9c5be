//! Partner service: registration with derived codes, contact updates,
//! and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use minierp_core::{PageRequest, PageResponse, Partner, PartnerType};
use minierp_db::repository::partner::PartnerSearch;
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPartnerRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerContactRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Partner> for PartnerResponse {
    fn from(p: Partner) -> Self {
        PartnerResponse {
            id: p.id,
            name: p.name,
            code: p.code,
            partner_type: p.partner_type,
            phone: p.phone,
            email: p.email,
            created_at: p.created_at,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct PartnerService {
    db: Database,
}

impl PartnerService {
    pub fn new(db: Database) -> Self {
        PartnerService { db }
    }

    /// Registers a new partner; the `CUS`/`SUP` code is derived from the
    /// assigned id inside the insert transaction.
    pub async fn add_partner(&self, request: AddPartnerRequest) -> ApiResult<PartnerResponse> {
        let partner = Partner::create(
            request.name,
            request.partner_type,
            request.phone,
            request.email,
        )?;

        let saved = self.db.partners().insert(&partner).await?;
        Ok(saved.into())
    }

    /// Updates phone/email.
    pub async fn update_contact(
        &self,
        partner_id: i64,
        request: UpdatePartnerContactRequest,
    ) -> ApiResult<()> {
        let mut partner = self
            .db
            .partners()
            .get_by_id(partner_id)
            .await?
            .ok_or_else(|| ApiError::not_found("partner"))?;

        partner.change_phone(request.phone);
        partner.change_email(request.email);
        self.db.partners().update_contact(&partner).await?;
        Ok(())
    }

    /// Paginated search by name prefix and type.
    pub async fn search(
        &self,
        filter: PartnerSearch,
        page: PageRequest,
    ) -> ApiResult<PageResponse<PartnerResponse>> {
        let (rows, total) = self.db.partners().search(&filter, page).await?;
        let content = rows.into_iter().map(PartnerResponse::from).collect();
        Ok(PageResponse::new(content, page, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minierp_db::DbConfig;

    async fn service() -> PartnerService {
        PartnerService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_add_partner_assigns_code() {
        let svc = service().await;

        let created = svc
            .add_partner(AddPartnerRequest {
                name: "Acme Foods".into(),
                partner_type: PartnerType::Customer,
                phone: None,
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(created.code.as_deref(), Some("CUS000001"));
    }

    #[tokio::test]
    async fn test_update_contact_missing_partner() {
        let svc = service().await;

        let err = svc
            .update_contact(
                42,
                UpdatePartnerContactRequest {
                    phone: Some("010-1234-5678".into()),
                    email: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
