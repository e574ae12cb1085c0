use serde::{Deserialize, Serialize};

use super::domain::Applicant;

/// Fields a search request may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryField {
    Name,
    Email,
    Birthday,
    Origin,
    Company,
    SpecialField,
    Languages,
    Tools,
}

impl QueryField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "birthday" => Some(Self::Birthday),
            "origin" => Some(Self::Origin),
            "company" => Some(Self::Company),
            "special_field" => Some(Self::SpecialField),
            "languages" => Some(Self::Languages),
            "tools" => Some(Self::Tools),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Birthday => "birthday",
            Self::Origin => "origin",
            Self::Company => "company",
            Self::SpecialField => "special_field",
            Self::Languages => "languages",
            Self::Tools => "tools",
        }
    }

    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Self::Languages | Self::Tools)
    }
}

/// Storage-native match criterion produced from a `(field, value)` request.
///
/// [`translate`] is the only constructor path: `Contains` is produced exactly
/// for the multi-valued fields and `Equals` for the scalar ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every record.
    All,
    /// Exact, case-sensitive equality on a scalar field. No substring or
    /// case-folded matching.
    Equals { field: QueryField, value: String },
    /// Element membership on a multi-valued field, not substring of the list
    /// serialized as text.
    Contains { field: QueryField, value: String },
}

impl Filter {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals { field, value } => match field {
                QueryField::Name => applicant.name == *value,
                QueryField::Email => applicant.email == *value,
                QueryField::Birthday => applicant.birthday == *value,
                QueryField::Origin => applicant.origin == *value,
                QueryField::Company => applicant.company.as_deref() == Some(value.as_str()),
                QueryField::SpecialField => applicant.special_field == *value,
                // Scalar equality is undefined for list fields; translate
                // never builds this combination.
                QueryField::Languages | QueryField::Tools => false,
            },
            Filter::Contains { field, value } => {
                let tokens = match field {
                    QueryField::Languages => &applicant.languages,
                    QueryField::Tools => &applicant.tools,
                    _ => return false,
                };
                tokens.iter().any(|token| token == value)
            }
        }
    }
}

/// Map a raw `(field, value)` search request onto a filter.
///
/// An empty (or whitespace-only) value is rejected rather than degrading to
/// match-everything.
pub fn translate(field: &str, value: &str) -> Result<Filter, QueryError> {
    let field = QueryField::parse(field).ok_or_else(|| QueryError::UnknownField(field.to_string()))?;
    if value.trim().is_empty() {
        return Err(QueryError::EmptyValue);
    }
    let value = value.to_string();
    Ok(if field.is_multi_valued() {
        Filter::Contains { field, value }
    } else {
        Filter::Equals { field, value }
    })
}

/// Error raised for a malformed search request.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown query field '{0}'")]
    UnknownField(String),
    #[error("query value must be non-empty")]
    EmptyValue,
}
