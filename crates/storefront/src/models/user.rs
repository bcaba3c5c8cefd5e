//! User and profile domain types.
//!
//! The add-on replaces the host's user model with an email-as-username
//! account carrying a person type, plus a one-to-one profile record for
//! the matching kind (individual or company).

use chrono::{DateTime, NaiveDate, Utc};

use quitanda_core::{
    Cnpj, CompanyProfileId, Cpf, Email, Gender, PersonProfileId, PersonType, Taxation, UserId,
};

/// A storefront user whose username is the email itself.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized account email (unique).
    pub email: Email,
    /// Whether the account is active. Deactivated instead of deleted.
    pub is_active: bool,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
    /// Which profile record applies to this user.
    pub person_type: PersonType,
}

/// Individual ("pessoa física") profile, one-to-one with [`User`].
#[derive(Debug, Clone)]
pub struct PersonProfile {
    /// Database ID of this profile.
    pub id: PersonProfileId,
    /// User who owns this profile.
    pub user_id: UserId,
    /// Full name.
    pub name: String,
    /// Validated CPF.
    pub cpf: Cpf,
    /// State identity document number (RG).
    pub id_document: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Declared gender.
    pub gender: Gender,
}

/// Company ("pessoa jurídica") profile, one-to-one with [`User`].
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    /// Database ID of this profile.
    pub id: CompanyProfileId,
    /// User who owns this profile.
    pub user_id: UserId,
    /// Legal company name ("razão social").
    pub legal_name: String,
    /// Validated CNPJ.
    pub cnpj: Cnpj,
    /// State registration number ("inscrição estadual"), if any.
    pub state_registration: Option<String>,
    /// Municipal registration number ("inscrição municipal"), if any.
    pub municipal_registration: Option<String>,
    /// Tax-collection obligation.
    pub taxation: Taxation,
    /// Name of the person responsible for the account.
    pub responsible: String,
}

/// Validated individual profile data, ready to persist.
#[derive(Debug, Clone)]
pub struct NewPersonProfile {
    pub name: String,
    pub cpf: Cpf,
    pub id_document: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// Validated company profile data, ready to persist.
#[derive(Debug, Clone)]
pub struct NewCompanyProfile {
    pub legal_name: String,
    pub cnpj: Cnpj,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub taxation: Taxation,
    pub responsible: String,
}
