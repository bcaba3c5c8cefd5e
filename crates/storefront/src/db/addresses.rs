//! Address repository: mutable address CRUD and the freeze operation.
//!
//! `freeze` runs inside the caller's transaction so the immutable address
//! and its extra-field snapshot are never partially committed.

use sqlx::{PgPool, Postgres, Transaction};

use quitanda_core::{ImmutableAddressId, MutableAddressId};

use super::RepositoryError;
use crate::models::address::{
    AddressFields, ExtraAddressFields, ExtraImmutableAddress, ExtraMutableAddress,
    ImmutableAddress, MutableAddress,
};

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct MutableAddressRow {
    id: MutableAddressId,
    name: String,
    street: String,
    street2: Option<String>,
    street3: Option<String>,
    postal_code: String,
    city: String,
    region: String,
    country: String,
    phone: Option<String>,
}

impl MutableAddressRow {
    fn into_address(self) -> MutableAddress {
        MutableAddress {
            id: self.id,
            fields: AddressFields {
                name: self.name,
                street: self.street,
                street2: self.street2,
                street3: self.street3,
                postal_code: self.postal_code,
                city: self.city,
                region: self.region,
                country: self.country,
                phone: self.phone,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImmutableAddressRow {
    id: ImmutableAddressId,
    name: String,
    street: String,
    street2: Option<String>,
    street3: Option<String>,
    postal_code: String,
    city: String,
    region: String,
    country: String,
    phone: Option<String>,
}

impl ImmutableAddressRow {
    fn into_address(self) -> ImmutableAddress {
        ImmutableAddress {
            id: self.id,
            fields: AddressFields {
                name: self.name,
                street: self.street,
                street2: self.street2,
                street3: self.street3,
                postal_code: self.postal_code,
                city: self.city,
                region: self.region,
                country: self.country,
                phone: self.phone,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ExtraFieldsRow {
    house_number: String,
    mobile_phone: Option<String>,
    reference_point: Option<String>,
}

impl ExtraFieldsRow {
    fn into_fields(self) -> ExtraAddressFields {
        ExtraAddressFields {
            house_number: self.house_number,
            mobile_phone: self.mobile_phone,
            reference_point: self.reference_point,
        }
    }
}

const SELECT_MUTABLE: &str = r"
    SELECT id, name, street, street2, street3, postal_code, city, region, country, phone
    FROM brazil.mutable_address
    WHERE id = $1
";

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a mutable address, optionally with its extra fields, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create_mutable(
        &self,
        fields: &AddressFields,
        extra: Option<&ExtraAddressFields>,
    ) -> Result<(MutableAddress, Option<ExtraMutableAddress>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: MutableAddressRow = sqlx::query_as(
            r"
            INSERT INTO brazil.mutable_address
                (name, street, street2, street3, postal_code, city, region, country, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, street, street2, street3, postal_code, city, region, country, phone
            ",
        )
        .bind(&fields.name)
        .bind(&fields.street)
        .bind(fields.street2.as_deref())
        .bind(fields.street3.as_deref())
        .bind(&fields.postal_code)
        .bind(&fields.city)
        .bind(&fields.region)
        .bind(&fields.country)
        .bind(fields.phone.as_deref())
        .fetch_one(&mut *tx)
        .await?;
        let address = row.into_address();

        let extra_row = match extra {
            Some(extra) => {
                sqlx::query(
                    r"
                    INSERT INTO brazil.extra_mutable_address
                        (address_id, house_number, mobile_phone, reference_point)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(address.id)
                .bind(&extra.house_number)
                .bind(extra.mobile_phone.as_deref())
                .bind(extra.reference_point.as_deref())
                .execute(&mut *tx)
                .await?;

                Some(ExtraMutableAddress {
                    address_id: address.id,
                    fields: extra.clone(),
                })
            }
            None => None,
        };

        tx.commit().await?;

        Ok((address, extra_row))
    }

    /// Get a mutable address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_mutable(
        &self,
        id: MutableAddressId,
    ) -> Result<Option<MutableAddress>, RepositoryError> {
        let row: Option<MutableAddressRow> = sqlx::query_as(SELECT_MUTABLE)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(MutableAddressRow::into_address))
    }

    /// Get the extra fields attached to a mutable address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn extra_for_mutable(
        &self,
        id: MutableAddressId,
    ) -> Result<Option<ExtraMutableAddress>, RepositoryError> {
        let row: Option<ExtraFieldsRow> = sqlx::query_as(
            r"
            SELECT house_number, mobile_phone, reference_point
            FROM brazil.extra_mutable_address
            WHERE address_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| ExtraMutableAddress {
            address_id: id,
            fields: r.into_fields(),
        }))
    }

    /// Replace the extra fields of a mutable address.
    ///
    /// Only the mutable form can be edited; immutable snapshots are never
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address has no extra row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_extra(
        &self,
        id: MutableAddressId,
        fields: &ExtraAddressFields,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE brazil.extra_mutable_address
            SET house_number = $2, mobile_phone = $3, reference_point = $4
            WHERE address_id = $1
            ",
        )
        .bind(id)
        .bind(&fields.house_number)
        .bind(fields.mobile_phone.as_deref())
        .bind(fields.reference_point.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a mutable address.
    ///
    /// The extra row, if any, goes with it (cascade).
    ///
    /// # Returns
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_mutable(&self, id: MutableAddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM brazil.mutable_address WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an immutable address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_immutable(
        &self,
        id: ImmutableAddressId,
    ) -> Result<Option<ImmutableAddress>, RepositoryError> {
        let row: Option<ImmutableAddressRow> = sqlx::query_as(
            r"
            SELECT id, name, street, street2, street3, postal_code, city, region, country, phone
            FROM brazil.immutable_address
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ImmutableAddressRow::into_address))
    }

    /// Get the extra snapshot attached to an immutable address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn extra_for_immutable(
        &self,
        id: ImmutableAddressId,
    ) -> Result<Option<ExtraImmutableAddress>, RepositoryError> {
        let row: Option<ExtraFieldsRow> = sqlx::query_as(
            r"
            SELECT house_number, mobile_phone, reference_point
            FROM brazil.extra_immutable_address
            WHERE address_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| ExtraImmutableAddress {
            address_id: id,
            fields: r.into_fields(),
        }))
    }

    /// Freeze a mutable address into an immutable copy, carrying the extra
    /// fields along as a snapshot.
    ///
    /// Runs inside the caller's transaction: the immutable address and its
    /// extra snapshot commit together with whatever else the caller writes
    /// (the order row), or not at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the mutable address doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn freeze(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: MutableAddressId,
    ) -> Result<ImmutableAddressId, RepositoryError> {
        let row: Option<MutableAddressRow> = sqlx::query_as(SELECT_MUTABLE)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        let snapshot = row.into_address().to_immutable();

        let frozen_id: ImmutableAddressId = sqlx::query_scalar(
            r"
            INSERT INTO brazil.immutable_address
                (name, street, street2, street3, postal_code, city, region, country, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(&snapshot.name)
        .bind(&snapshot.street)
        .bind(snapshot.street2.as_deref())
        .bind(snapshot.street3.as_deref())
        .bind(&snapshot.postal_code)
        .bind(&snapshot.city)
        .bind(&snapshot.region)
        .bind(&snapshot.country)
        .bind(snapshot.phone.as_deref())
        .fetch_one(&mut **tx)
        .await?;

        let extra: Option<ExtraFieldsRow> = sqlx::query_as(
            r"
            SELECT house_number, mobile_phone, reference_point
            FROM brazil.extra_mutable_address
            WHERE address_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(extra) = extra {
            let extra_snapshot = ExtraMutableAddress {
                address_id: id,
                fields: extra.into_fields(),
            }
            .to_immutable();

            sqlx::query(
                r"
                INSERT INTO brazil.extra_immutable_address
                    (address_id, house_number, mobile_phone, reference_point)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(frozen_id)
            .bind(&extra_snapshot.house_number)
            .bind(extra_snapshot.mobile_phone.as_deref())
            .bind(extra_snapshot.reference_point.as_deref())
            .execute(&mut **tx)
            .await?;
        }

        tracing::debug!(mutable_id = %id, immutable_id = %frozen_id, "address frozen");
        Ok(frozen_id)
    }
}
