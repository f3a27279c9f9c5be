//! Partner (customer / supplier) master data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_name;

// =============================================================================
// Partner Type
// =============================================================================

/// Which side of the trade a partner sits on.
///
/// Suppliers appear on purchase orders, customers on sales orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerType {
    Customer,
    Supplier,
}

// =============================================================================
// Partner
// =============================================================================

/// A trading partner.
///
/// The business code is derived from the assigned id after insert
/// (`CUS000042` / `SUP000042`), so `code` is `None` on a fresh partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Partner {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    /// Creates a new, unsaved partner. Phone and email are optional.
    pub fn create(
        name: impl Into<String>,
        partner_type: PartnerType,
        phone: Option<String>,
        email: Option<String>,
    ) -> CoreResult<Partner> {
        let name = name.into();
        validate_name("name", &name, 100)?;

        let now = Utc::now();
        Ok(Partner {
            id: 0,
            name,
            code: None,
            partner_type,
            phone,
            email,
            created_at: now,
            updated_at: now,
        })
    }

    /// Derives the business code from the assigned id.
    ///
    /// Must run after the insert returned an id; the repository calls this
    /// inside the same transaction as the insert.
    pub fn generate_code(&mut self) -> CoreResult<()> {
        if self.id == 0 {
            return Err(CoreError::CodeBeforeId);
        }

        let prefix = match self.partner_type {
            PartnerType::Customer => "CUS",
            PartnerType::Supplier => "SUP",
        };
        self.code = Some(format!("{}{:06}", prefix, self.id));
        Ok(())
    }

    pub fn change_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
        self.updated_at = Utc::now();
    }

    pub fn change_email(&mut self, email: Option<String>) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Fails unless the partner is a supplier.
    pub fn validate_supplier(&self) -> CoreResult<()> {
        if self.partner_type != PartnerType::Supplier {
            return Err(CoreError::WrongPartnerType {
                partner_id: self.id,
                expected: "supplier",
            });
        }
        Ok(())
    }

    /// Fails unless the partner is a customer.
    pub fn validate_customer(&self) -> CoreResult<()> {
        if self.partner_type != PartnerType::Customer {
            return Err(CoreError::WrongPartnerType {
                partner_id: self.id,
                expected: "customer",
            });
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

    #[test]
    fn test_code_requires_id() {
        let mut partner = Partner::create("Acme Foods", PartnerType::Customer, None, None).unwrap();
        assert!(partner.generate_code().is_err());

        partner.id = 42;
        partner.generate_code().unwrap();
        assert_eq!(partner.code.as_deref(), Some("CUS000042"));
    }

    #[test]
    fn test_supplier_code_prefix() {
        let mut partner =
            Partner::create("Steel Works", PartnerType::Supplier, None, None).unwrap();
        partner.id = 7;
        partner.generate_code().unwrap();
        assert_eq!(partner.code.as_deref(), Some("SUP000007"));
    }

    #[test]
    fn test_type_validation() {
        let customer = Partner::create("Acme", PartnerType::Customer, None, None).unwrap();
        assert!(customer.validate_customer().is_ok());
        assert!(customer.validate_supplier().is_err());

        let supplier = Partner::create("Steel", PartnerType::Supplier, None, None).unwrap();
        assert!(supplier.validate_supplier().is_ok());
        assert!(supplier.validate_customer().is_err());
    }
}
