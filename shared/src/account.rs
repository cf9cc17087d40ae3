use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment::ValidationError;

/// A funded account as kept by storage.
///
/// Only `id` is published through the accounts listing; balance and
/// currency stay on the storage side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub balance: Decimal,
    pub currency: String,
}

impl Account {
    pub fn new(id: impl Into<String>, balance: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance,
            currency: currency.into(),
        }
    }

    /// Check that the identifier and currency are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyAccountId);
        }
        if self.currency.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account() {
        let account = Account::new("bob123", Decimal::from(100), "USD");
        assert_eq!(account.validate(), Ok(()));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let account = Account::new("", Decimal::from(100), "USD");
        assert_eq!(account.validate(), Err(ValidationError::EmptyAccountId));
    }

    #[test]
    fn test_empty_currency_is_rejected() {
        let account = Account::new("bob123", Decimal::ZERO, "");
        assert_eq!(account.validate(), Err(ValidationError::EmptyCurrency));
    }
}
