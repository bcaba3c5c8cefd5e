//! Person classification enums for Brazilian registration.
//!
//! The single-letter wire codes match what the registration forms submit
//! and what the database columns store.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Whether a registered customer is an individual or a company.
///
/// Determines which taxpayer identifier (CPF vs CNPJ) and which profile
/// record applies to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonType {
    /// "Pessoa física" - an individual, identified by a CPF.
    #[default]
    #[serde(rename = "PF")]
    Individual,
    /// "Pessoa jurídica" - a company, identified by a CNPJ.
    #[serde(rename = "PJ")]
    Company,
}

impl PersonType {
    /// Two-letter wire code stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Individual => "PF",
            Self::Company => "PJ",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for PersonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PF" => Ok(Self::Individual),
            "PJ" => Ok(Self::Company),
            _ => Err(format!("invalid person type: {s}")),
        }
    }
}

/// A company's tax-collection obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Taxation {
    /// Collects ICMS (state sales tax).
    #[serde(rename = "i")]
    Icms,
    /// Exempt from state registration.
    #[default]
    #[serde(rename = "e")]
    Exempt,
    /// Final consumer, not a tax contributor.
    #[serde(rename = "n")]
    NonContributor,
}

impl Taxation {
    /// Single-letter wire code stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Icms => "i",
            Self::Exempt => "e",
            Self::NonContributor => "n",
        }
    }
}

impl fmt::Display for Taxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Taxation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(Self::Icms),
            "e" => Ok(Self::Exempt),
            "n" => Ok(Self::NonContributor),
            _ => Err(format!("invalid taxation status: {s}")),
        }
    }
}

/// Customer gender, as collected by the individual registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    #[serde(rename = "u")]
    Undisclosed,
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "o")]
    Other,
}

impl Gender {
    /// Single-letter wire code stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Undisclosed => "u",
            Self::Male => "m",
            Self::Female => "f",
            Self::Other => "o",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" => Ok(Self::Undisclosed),
            "m" => Ok(Self::Male),
            "f" => Ok(Self::Female),
            "o" => Ok(Self::Other),
            _ => Err(format!("invalid gender: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_person_type_codes_roundtrip() {
        for pt in [PersonType::Individual, PersonType::Company] {
            assert_eq!(pt.code().parse::<PersonType>().unwrap(), pt);
        }
        assert!("XX".parse::<PersonType>().is_err());
    }

    #[test]
    fn test_taxation_codes_roundtrip() {
        for t in [Taxation::Icms, Taxation::Exempt, Taxation::NonContributor] {
            assert_eq!(t.code().parse::<Taxation>().unwrap(), t);
        }
        assert!("x".parse::<Taxation>().is_err());
    }

    #[test]
    fn test_gender_codes_roundtrip() {
        for g in [
            Gender::Undisclosed,
            Gender::Male,
            Gender::Female,
            Gender::Other,
        ] {
            assert_eq!(g.code().parse::<Gender>().unwrap(), g);
        }
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        assert_eq!(
            serde_json::to_string(&PersonType::Company).unwrap(),
            "\"PJ\""
        );
        assert_eq!(
            serde_json::to_string(&Taxation::NonContributor).unwrap(),
            "\"n\""
        );
        let g: Gender = serde_json::from_str("\"f\"").unwrap();
        assert_eq!(g, Gender::Female);
    }

    #[test]
    fn test_defaults_match_registration_form() {
        assert_eq!(PersonType::default(), PersonType::Individual);
        assert_eq!(Taxation::default(), Taxation::Exempt);
        assert_eq!(Gender::default(), Gender::Undisclosed);
    }
}
