//! Registration service.
//!
//! Validates Brazilian registration payloads (email, password, and the
//! CPF/CNPJ profile for the declared person type) and persists the account
//! with its profile record. Validation is a pure step so the host can run
//! it during form processing without touching the database.

mod error;

pub use error::RegistrationError;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use sqlx::PgPool;

use quitanda_core::{Cnpj, Cpf, Email, Gender, Taxation};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{
    CompanyProfile, NewCompanyProfile, NewPersonProfile, PersonProfile, User,
};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw registration payload, as submitted by the host's registration form.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Account email (will be normalized).
    pub email: String,
    /// Plain-text password (hashed before storage).
    pub password: String,
    /// Profile sub-form for the declared person type.
    pub profile: ProfileInput,
}

/// Profile sub-form for the declared person type.
#[derive(Debug, Clone)]
pub enum ProfileInput {
    /// "Pessoa física" registration with an individual profile.
    Individual(PersonInput),
    /// "Pessoa jurídica" registration with a company profile.
    Company(CompanyInput),
}

/// Individual profile fields as submitted.
#[derive(Debug, Clone)]
pub struct PersonInput {
    pub name: String,
    /// CPF, possibly formatted (`012.345.678-90`).
    pub cpf: String,
    pub id_document: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// Company profile fields as submitted.
#[derive(Debug, Clone)]
pub struct CompanyInput {
    pub legal_name: String,
    /// CNPJ, possibly formatted (`11.222.333/0001-81`).
    pub cnpj: String,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub taxation: Taxation,
    pub responsible: String,
}

/// A validated registration, ready to persist.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    /// Normalized account email.
    pub email: Email,
    /// Validated profile for the declared person type.
    pub profile: ValidProfile,
}

/// Validated profile data with the taxpayer identifier parsed.
#[derive(Debug, Clone)]
pub enum ValidProfile {
    Individual(NewPersonProfile),
    Company(NewCompanyProfile),
}

/// A freshly registered account with its profile record.
#[derive(Debug, Clone)]
pub enum RegisteredUser {
    Individual {
        user: User,
        profile: PersonProfile,
    },
    Company {
        user: User,
        profile: CompanyProfile,
    },
}

impl RegisteredUser {
    /// The account record, whichever profile kind was created.
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Individual { user, .. } | Self::Company { user, .. } => user,
        }
    }
}

impl NewRegistration {
    /// Validate the payload without touching the database.
    ///
    /// # Errors
    ///
    /// Returns a field-level [`RegistrationError`]: invalid email, weak
    /// password, missing profile field, or an invalid CPF/CNPJ (carrying
    /// the offending value for the form error message).
    pub fn validate(&self) -> Result<ValidRegistration, RegistrationError> {
        let email = Email::parse(&self.email)?;

        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let profile = match &self.profile {
            ProfileInput::Individual(person) => {
                require(&person.name, "name")?;
                require(&person.id_document, "id_document")?;
                let cpf = Cpf::parse(&person.cpf)
                    .map_err(|_| RegistrationError::InvalidCpf(person.cpf.clone()))?;

                ValidProfile::Individual(NewPersonProfile {
                    name: person.name.trim().to_owned(),
                    cpf,
                    id_document: person.id_document.trim().to_owned(),
                    birth_date: person.birth_date,
                    gender: person.gender,
                })
            }
            ProfileInput::Company(company) => {
                require(&company.legal_name, "legal_name")?;
                require(&company.responsible, "responsible")?;
                let cnpj = Cnpj::parse(&company.cnpj)
                    .map_err(|_| RegistrationError::InvalidCnpj(company.cnpj.clone()))?;

                ValidProfile::Company(NewCompanyProfile {
                    legal_name: company.legal_name.trim().to_owned(),
                    cnpj,
                    state_registration: company.state_registration.clone(),
                    municipal_registration: company.municipal_registration.clone(),
                    taxation: company.taxation,
                    responsible: company.responsible.trim().to_owned(),
                })
            }
        };

        Ok(ValidRegistration { email, profile })
    }
}

fn require(value: &str, field: &'static str) -> Result<(), RegistrationError> {
    if value.trim().is_empty() {
        return Err(RegistrationError::MissingField(field));
    }
    Ok(())
}

/// Registration service.
///
/// Handles account creation for both person types.
pub struct RegistrationService<'a> {
    users: UserRepository<'a>,
}

impl<'a> RegistrationService<'a> {
    /// Create a new registration service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account with its profile record.
    ///
    /// # Errors
    ///
    /// Returns a validation error (see [`NewRegistration::validate`]),
    /// `RegistrationError::EmailTaken` if the email is already registered,
    /// or a repository error.
    pub async fn register(
        &self,
        input: &NewRegistration,
    ) -> Result<RegisteredUser, RegistrationError> {
        let valid = input.validate()?;
        let password_hash = hash_password(&input.password)?;

        let registered = match valid.profile {
            ValidProfile::Individual(profile) => {
                let (user, profile) = self
                    .users
                    .create_individual(&valid.email, &password_hash, &profile)
                    .await
                    .map_err(map_conflict)?;
                RegisteredUser::Individual { user, profile }
            }
            ValidProfile::Company(profile) => {
                let (user, profile) = self
                    .users
                    .create_company(&valid.email, &password_hash, &profile)
                    .await
                    .map_err(map_conflict)?;
                RegisteredUser::Company { user, profile }
            }
        };

        tracing::info!(
            user_id = %registered.user().id,
            person_type = %registered.user().person_type,
            "user registered"
        );
        Ok(registered)
    }
}

fn map_conflict(e: RepositoryError) -> RegistrationError {
    match e {
        RepositoryError::Conflict(_) => RegistrationError::EmailTaken,
        other => RegistrationError::Repository(other),
    }
}

fn hash_password(password: &str) -> Result<String, RegistrationError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| RegistrationError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn person_input() -> NewRegistration {
        NewRegistration {
            email: "maria@example.com.br".to_owned(),
            password: "um segredo forte".to_owned(),
            profile: ProfileInput::Individual(PersonInput {
                name: "Maria da Silva".to_owned(),
                cpf: "012.345.678-90".to_owned(),
                id_document: "312321".to_owned(),
                birth_date: NaiveDate::from_ymd_opt(1954, 3, 28).unwrap(),
                gender: Gender::Female,
            }),
        }
    }

    fn company_input() -> NewRegistration {
        NewRegistration {
            email: "compras@padaria.com.br".to_owned(),
            password: "outro segredo".to_owned(),
            profile: ProfileInput::Company(CompanyInput {
                legal_name: "Padaria Pão Quente Ltda".to_owned(),
                cnpj: "11.222.333/0001-81".to_owned(),
                state_registration: None,
                municipal_registration: Some("998877".to_owned()),
                taxation: Taxation::Icms,
                responsible: "João da Silva".to_owned(),
            }),
        }
    }

    #[test]
    fn test_validate_individual() {
        let valid = person_input().validate().unwrap();
        assert_eq!(valid.email.as_str(), "maria@example.com.br");
        match valid.profile {
            ValidProfile::Individual(profile) => {
                assert_eq!(profile.cpf.as_str(), "01234567890");
            }
            ValidProfile::Company(_) => panic!("expected individual profile"),
        }
    }

    #[test]
    fn test_validate_company() {
        let valid = company_input().validate().unwrap();
        match valid.profile {
            ValidProfile::Company(profile) => {
                assert_eq!(profile.cnpj.as_str(), "11222333000181");
                assert_eq!(profile.taxation, Taxation::Icms);
            }
            ValidProfile::Individual(_) => panic!("expected company profile"),
        }
    }

    #[test]
    fn test_invalid_cpf_carries_offending_value() {
        let mut input = person_input();
        let ProfileInput::Individual(ref mut person) = input.profile else {
            unreachable!()
        };
        person.cpf = "111.444.777-36".to_owned();

        let err = input.validate().unwrap_err();
        assert!(matches!(
            &err,
            RegistrationError::InvalidCpf(value) if value == "111.444.777-36"
        ));
        assert_eq!(err.to_string(), "111.444.777-36 is not a valid CPF");
    }

    #[test]
    fn test_invalid_cnpj_carries_offending_value() {
        let mut input = company_input();
        let ProfileInput::Company(ref mut company) = input.profile else {
            unreachable!()
        };
        company.cnpj = "11.222.333/0001-82".to_owned();

        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "11.222.333/0001-82 is not a valid CNPJ");
    }

    #[test]
    fn test_weak_password_rejected() {
        let mut input = person_input();
        input.password = "curta".to_owned();
        assert!(matches!(
            input.validate().unwrap_err(),
            RegistrationError::WeakPassword(_)
        ));
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut input = person_input();
        let ProfileInput::Individual(ref mut person) = input.profile else {
            unreachable!()
        };
        person.name = "   ".to_owned();
        assert!(matches!(
            input.validate().unwrap_err(),
            RegistrationError::MissingField("name")
        ));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut input = person_input();
        input.email = "not-an-email".to_owned();
        assert!(matches!(
            input.validate().unwrap_err(),
            RegistrationError::InvalidEmail(_)
        ));
    }

    #[test]
    fn test_hash_password_produces_verifiable_hash() {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let hash = hash_password("um segredo forte").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"um segredo forte", &parsed)
                .is_ok()
        );
    }
}
