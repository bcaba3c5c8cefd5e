//! User repository for database operations.
//!
//! Accounts and their profile record are created in one transaction so a
//! user never exists without the profile its person type promises.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use quitanda_core::{Cnpj, CompanyProfileId, Cpf, Email, PersonProfileId, PersonType, UserId};

use super::RepositoryError;
use crate::models::user::{
    CompanyProfile, NewCompanyProfile, NewPersonProfile, PersonProfile, User,
};

/// Repository for user and profile database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    is_active: bool,
    date_joined: DateTime<Utc>,
    person_type: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let person_type = self.person_type.parse::<PersonType>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid person type in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            email,
            is_active: self.is_active,
            date_joined: self.date_joined,
            person_type,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PersonProfileRow {
    id: PersonProfileId,
    user_id: UserId,
    name: String,
    cpf: Cpf,
    id_document: String,
    birth_date: NaiveDate,
    gender: String,
}

impl PersonProfileRow {
    fn into_profile(self) -> Result<PersonProfile, RepositoryError> {
        let gender = self.gender.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid gender in database: {e}"))
        })?;

        Ok(PersonProfile {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            cpf: self.cpf,
            id_document: self.id_document,
            birth_date: self.birth_date,
            gender,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CompanyProfileRow {
    id: CompanyProfileId,
    user_id: UserId,
    legal_name: String,
    cnpj: Cnpj,
    state_registration: Option<String>,
    municipal_registration: Option<String>,
    taxation: String,
    responsible: String,
}

impl CompanyProfileRow {
    fn into_profile(self) -> Result<CompanyProfile, RepositoryError> {
        let taxation = self.taxation.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid taxation in database: {e}"))
        })?;

        Ok(CompanyProfile {
            id: self.id,
            user_id: self.user_id,
            legal_name: self.legal_name,
            cnpj: self.cnpj,
            state_registration: self.state_registration,
            municipal_registration: self.municipal_registration,
            taxation,
            responsible: self.responsible,
        })
    }
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an individual account with its person profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_individual(
        &self,
        email: &Email,
        password_hash: &str,
        profile: &NewPersonProfile,
    ) -> Result<(User, PersonProfile), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = insert_user(&mut tx, email, PersonType::Individual).await?;
        insert_password(&mut tx, user.id, password_hash).await?;

        let row: PersonProfileRow = sqlx::query_as(
            r"
            INSERT INTO brazil.person_profile
                (user_id, name, cpf, id_document, birth_date, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, cpf, id_document, birth_date, gender
            ",
        )
        .bind(user.id)
        .bind(&profile.name)
        .bind(profile.cpf.as_str())
        .bind(&profile.id_document)
        .bind(profile.birth_date)
        .bind(profile.gender.code())
        .fetch_one(&mut *tx)
        .await?;
        let person_profile = row.into_profile()?;

        tx.commit().await?;

        tracing::debug!(user_id = %user.id, "individual account created");
        Ok((user, person_profile))
    }

    /// Create a company account with its company profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_company(
        &self,
        email: &Email,
        password_hash: &str,
        profile: &NewCompanyProfile,
    ) -> Result<(User, CompanyProfile), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = insert_user(&mut tx, email, PersonType::Company).await?;
        insert_password(&mut tx, user.id, password_hash).await?;

        let row: CompanyProfileRow = sqlx::query_as(
            r"
            INSERT INTO brazil.company_profile
                (user_id, legal_name, cnpj, state_registration,
                 municipal_registration, taxation, responsible)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, legal_name, cnpj, state_registration,
                      municipal_registration, taxation, responsible
            ",
        )
        .bind(user.id)
        .bind(&profile.legal_name)
        .bind(profile.cnpj.as_str())
        .bind(profile.state_registration.as_deref())
        .bind(profile.municipal_registration.as_deref())
        .bind(profile.taxation.code())
        .bind(&profile.responsible)
        .fetch_one(&mut *tx)
        .await?;
        let company_profile = row.into_profile()?;

        tx.commit().await?;

        tracing::debug!(user_id = %user.id, "company account created");
        Ok((user, company_profile))
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, is_active, date_joined, person_type
            FROM brazil.user_account
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, is_active, date_joined, person_type
            FROM brazil.user_account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get the person profile for an individual account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn person_profile(
        &self,
        user_id: UserId,
    ) -> Result<Option<PersonProfile>, RepositoryError> {
        let row: Option<PersonProfileRow> = sqlx::query_as(
            r"
            SELECT id, user_id, name, cpf, id_document, birth_date, gender
            FROM brazil.person_profile
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(PersonProfileRow::into_profile).transpose()
    }

    /// Get the company profile for a company account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn company_profile(
        &self,
        user_id: UserId,
    ) -> Result<Option<CompanyProfile>, RepositoryError> {
        let row: Option<CompanyProfileRow> = sqlx::query_as(
            r"
            SELECT id, user_id, legal_name, cnpj, state_registration,
                   municipal_registration, taxation, responsible
            FROM brazil.company_profile
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(CompanyProfileRow::into_profile).transpose()
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<String>, RepositoryError> {
        let hash: Option<String> = sqlx::query_scalar(
            r"
            SELECT p.password_hash
            FROM brazil.user_account u
            JOIN brazil.user_password p ON u.id = p.user_id
            WHERE u.email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }
}

async fn insert_user(
    tx: &mut Transaction<'_, Postgres>,
    email: &Email,
    person_type: PersonType,
) -> Result<User, RepositoryError> {
    let row: UserRow = sqlx::query_as(
        r"
        INSERT INTO brazil.user_account (email, person_type)
        VALUES ($1, $2)
        RETURNING id, email, is_active, date_joined, person_type
        ",
    )
    .bind(email.as_str())
    .bind(person_type.code())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("email already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    row.into_user()
}

async fn insert_password(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    password_hash: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO brazil.user_password (user_id, password_hash)
        VALUES ($1, $2)
        ",
    )
    .bind(user_id)
    .bind(password_hash)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
