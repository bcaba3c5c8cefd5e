//! Address domain types and the mutable-to-immutable snapshot.
//!
//! Addresses exist in two forms sharing one field shape: a mutable form the
//! customer can still edit during checkout, and an immutable form created
//! once at order confirmation as a permanent historical record. The same
//! split applies to the Brazilian "extra" fields (street number, mobile
//! phone, reference point) attached one-to-one to each address.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use quitanda_core::{ImmutableAddressId, MutableAddressId};

/// A required form field was missing or empty.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("missing required field: {0}")]
pub struct MissingFieldError(pub &'static str);

/// The scalar fields shared by mutable and immutable addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    /// Recipient name.
    pub name: String,
    /// Street name.
    pub street: String,
    /// Complement (apartment, suite).
    pub street2: Option<String>,
    /// Neighborhood ("bairro").
    pub street3: Option<String>,
    /// Postal code (CEP).
    pub postal_code: String,
    /// City.
    pub city: String,
    /// State code (e.g. "SC").
    pub region: String,
    /// ISO country code.
    pub country: String,
    /// Landline phone, if given.
    pub phone: Option<String>,
}

/// An editable address, used while the customer can still change it.
#[derive(Debug, Clone)]
pub struct MutableAddress {
    /// Database ID of this address.
    pub id: MutableAddressId,
    /// Address field values.
    pub fields: AddressFields,
}

impl MutableAddress {
    /// Copy the field values into a detached snapshot for freezing.
    ///
    /// The ID is intentionally not carried over; the repository assigns a
    /// fresh immutable row inside the checkout transaction.
    #[must_use]
    pub fn to_immutable(&self) -> AddressFields {
        self.fields.clone()
    }
}

/// A frozen address, created once at order confirmation and never changed.
#[derive(Debug, Clone)]
pub struct ImmutableAddress {
    /// Database ID of this address.
    pub id: ImmutableAddressId,
    /// Address field values as they were at confirmation time.
    pub fields: AddressFields,
}

/// The Brazilian extra address fields shared by both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAddressFields {
    /// Street number ("número").
    pub house_number: String,
    /// Mobile phone ("celular"), if given.
    pub mobile_phone: Option<String>,
    /// Reference point ("ponto de referência"), if given.
    pub reference_point: Option<String>,
}

impl ExtraAddressFields {
    /// Construct from a submitted form field map.
    ///
    /// Optional fields submitted as empty strings are treated as absent,
    /// the way HTML forms post untouched inputs.
    ///
    /// # Errors
    ///
    /// Returns [`MissingFieldError`] if `house_number` is missing or empty.
    pub fn from_fields(data: &HashMap<String, String>) -> Result<Self, MissingFieldError> {
        let house_number = data
            .get("house_number")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or(MissingFieldError("house_number"))?
            .to_owned();

        Ok(Self {
            house_number,
            mobile_phone: optional_field(data, "mobile_phone"),
            reference_point: optional_field(data, "reference_point"),
        })
    }
}

fn optional_field(data: &HashMap<String, String>, key: &str) -> Option<String> {
    data.get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Extra fields linked one-to-one to a [`MutableAddress`].
#[derive(Debug, Clone)]
pub struct ExtraMutableAddress {
    /// The mutable address these fields belong to.
    pub address_id: MutableAddressId,
    /// Extra field values.
    pub fields: ExtraAddressFields,
}

impl ExtraMutableAddress {
    /// Copy the scalar fields into a detached snapshot for the immutable
    /// counterpart.
    ///
    /// The link to the mutable address is never carried over; the caller
    /// attaches the result to the newly created immutable address.
    #[must_use]
    pub fn to_immutable(&self) -> ExtraAddressFields {
        self.fields.clone()
    }
}

/// Extra fields linked one-to-one to an [`ImmutableAddress`].
///
/// Created exactly once per frozen address that has extra fields, and
/// never updated or deleted afterwards.
#[derive(Debug, Clone)]
pub struct ExtraImmutableAddress {
    /// The immutable address these fields belong to.
    pub address_id: ImmutableAddressId,
    /// Extra field values as they were at confirmation time.
    pub fields: ExtraAddressFields,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_extra() -> ExtraAddressFields {
        ExtraAddressFields {
            house_number: "563".to_owned(),
            mobile_phone: Some("13 98431-4345".to_owned()),
            reference_point: Some("longe de tudo".to_owned()),
        }
    }

    #[test]
    fn test_snapshot_copies_fields_and_drops_link() {
        let mutable = ExtraMutableAddress {
            address_id: MutableAddressId::new(42),
            fields: sample_extra(),
        };

        let snapshot = mutable.to_immutable();
        assert_eq!(snapshot, mutable.fields);
        // The snapshot is a plain fields value; it carries no address link
        // until the repository attaches it to a fresh immutable address.
    }

    #[test]
    fn test_snapshot_with_absent_optional_fields() {
        let mutable = ExtraMutableAddress {
            address_id: MutableAddressId::new(1),
            fields: ExtraAddressFields {
                house_number: "12A".to_owned(),
                mobile_phone: None,
                reference_point: None,
            },
        };

        let snapshot = mutable.to_immutable();
        assert_eq!(snapshot.house_number, "12A");
        assert_eq!(snapshot.mobile_phone, None);
        assert_eq!(snapshot.reference_point, None);
    }

    #[test]
    fn test_from_fields_full() {
        let data: HashMap<String, String> = [
            ("house_number", "323"),
            ("mobile_phone", "21 4444-3333"),
            ("reference_point", "proximo posto"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let extra = ExtraAddressFields::from_fields(&data).unwrap();
        assert_eq!(extra.house_number, "323");
        assert_eq!(extra.mobile_phone.as_deref(), Some("21 4444-3333"));
        assert_eq!(extra.reference_point.as_deref(), Some("proximo posto"));
    }

    #[test]
    fn test_from_fields_empty_optionals_are_absent() {
        let data: HashMap<String, String> = [
            ("house_number", "563"),
            ("mobile_phone", ""),
            ("reference_point", "   "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let extra = ExtraAddressFields::from_fields(&data).unwrap();
        assert_eq!(extra.mobile_phone, None);
        assert_eq!(extra.reference_point, None);
    }

    #[test]
    fn test_from_fields_missing_house_number() {
        let empty = HashMap::new();
        assert_eq!(
            ExtraAddressFields::from_fields(&empty),
            Err(MissingFieldError("house_number"))
        );

        let blank: HashMap<String, String> =
            [("house_number".to_owned(), "  ".to_owned())].into_iter().collect();
        assert_eq!(
            ExtraAddressFields::from_fields(&blank),
            Err(MissingFieldError("house_number"))
        );
    }

    #[test]
    fn test_address_snapshot_copies_fields() {
        let mutable = MutableAddress {
            id: MutableAddressId::new(7),
            fields: AddressFields {
                name: "maria da silva".to_owned(),
                street: "rua billing".to_owned(),
                street2: Some("apto".to_owned()),
                street3: Some("bairro outrem".to_owned()),
                postal_code: "89090-200".to_owned(),
                city: "blumenau".to_owned(),
                region: "SC".to_owned(),
                country: "BR".to_owned(),
                phone: Some("41 2332-0213".to_owned()),
            },
        };

        assert_eq!(mutable.to_immutable(), mutable.fields);
    }
}
