use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Where a ledger row came from. Ingestion only ever rewrites `Imported` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Manual,
    Imported(String),
}

impl Origin {
    pub fn as_db_string(&self) -> String {
        match self {
            Self::Manual => "manual".to_string(),
            Self::Imported(label) => format!("import:{label}"),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.strip_prefix("import:") {
            Some(label) => Self::Imported(label.to_string()),
            None => Self::Manual,
        }
    }
}

/// Rejected manual input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub origin: Origin,
    pub import_hash: String,
    pub created_at: String,
}

impl Expense {
    /// A hand-entered expense. Manual rows carry no import hash and are never deduplicated.
    pub fn manual(date: NaiveDate, description: &str, amount: Decimal) -> Result<Self, EntryError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EntryError::EmptyDescription);
        }
        if amount <= Decimal::ZERO {
            return Err(EntryError::NonPositiveAmount(amount));
        }
        Ok(Self {
            id: None,
            date,
            description: description.to_string(),
            amount,
            origin: Origin::Manual,
            import_hash: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn is_imported(&self) -> bool {
        matches!(self.origin, Origin::Imported(_))
    }
}
