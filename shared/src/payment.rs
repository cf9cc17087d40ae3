use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a payment relative to the account it is booked against.
///
/// Travels over the wire as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Direction {
    Incoming = 0,
    Outgoing = 1,
}

impl From<Direction> for u16 {
    fn from(direction: Direction) -> Self {
        direction as u16
    }
}

impl TryFrom<u16> for Direction {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Incoming),
            1 => Ok(Direction::Outgoing),
            other => Err(format!("unknown payment direction: {}", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => write!(f, "incoming"),
            Direction::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// A persisted payment from one account to another.
///
/// `id` and `dt` are assigned by storage and never by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub from_account: String,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub amount: Decimal,
    pub to_account: String,
    pub direction: Direction,
    /// Booking timestamp, `null` until storage sets it
    pub dt: Option<DateTime<Utc>>,
}

/// A payment request prior to persistence (the body of `POST /api/v1/payments`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub from_account: String,
    /// Decoded exactly from a JSON string or number; excess precision is an error
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub amount: Decimal,
    pub to_account: String,
    pub direction: Direction,
}

/// Violations of the domain's field-level rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty from_account")]
    EmptyFromAccount,
    #[error("empty to_account")]
    EmptyToAccount,
    #[error("invalid amount: must be greater than zero")]
    NonPositiveAmount,
    #[error("empty account id")]
    EmptyAccountId,
    #[error("empty currency")]
    EmptyCurrency,
}

fn validate_transfer(from: &str, to: &str, amount: &Decimal) -> Result<(), ValidationError> {
    if from.is_empty() {
        return Err(ValidationError::EmptyFromAccount);
    }
    if to.is_empty() {
        return Err(ValidationError::EmptyToAccount);
    }
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

impl Payment {
    /// Check that both accounts are set and the amount is strictly positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_transfer(&self.from_account, &self.to_account, &self.amount)
    }
}

impl PaymentInput {
    /// Same rules as [`Payment::validate`], applied before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_transfer(&self.from_account, &self.to_account, &self.amount)
    }

    /// Convert into an unpersisted payment; storage assigns `id` and `dt`.
    pub fn into_payment(self) -> Payment {
        Payment {
            id: 0,
            from_account: self.from_account,
            amount: self.amount,
            to_account: self.to_account,
            direction: self.direction,
            dt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn sample_input() -> PaymentInput {
        PaymentInput {
            from_account: "bob123".to_string(),
            amount: Decimal::from(100),
            to_account: "alice456".to_string(),
            direction: Direction::Incoming,
        }
    }

    #[test]
    fn test_validate_accepts_positive_amount() {
        assert_eq!(sample_input().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_accounts() {
        let mut input = sample_input();
        input.from_account.clear();
        assert_eq!(input.validate(), Err(ValidationError::EmptyFromAccount));

        let mut input = sample_input();
        input.to_account.clear();
        assert_eq!(input.validate(), Err(ValidationError::EmptyToAccount));
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_amounts() {
        let mut payment = sample_input().into_payment();
        payment.amount = Decimal::ZERO;
        assert_eq!(payment.validate(), Err(ValidationError::NonPositiveAmount));

        payment.amount = Decimal::from_str("-0.01").unwrap();
        assert_eq!(payment.validate(), Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_into_payment_leaves_storage_fields_unset() {
        let payment = sample_input().into_payment();
        assert_eq!(payment.id, 0);
        assert!(payment.dt.is_none());
        assert_eq!(payment.from_account, "bob123");
        assert_eq!(payment.direction, Direction::Incoming);
    }

    #[test]
    fn test_input_decodes_string_amount_without_rounding() {
        let body = json!({
            "from_account": "bob123",
            "to_account": "alice456",
            "amount": "0.1000000000000000000000000001",
            "direction": 1
        });

        let input: PaymentInput = serde_json::from_value(body).unwrap();

        assert_eq!(
            input.amount,
            Decimal::from_str("0.1000000000000000000000000001").unwrap()
        );
        assert_eq!(input.direction, Direction::Outgoing);
    }

    #[test]
    fn test_input_decodes_number_amount_without_rounding() {
        let body = r#"{"from_account":"bob123","to_account":"alice456","amount":12345678901234.000000001,"direction":0}"#;
        let input: PaymentInput = serde_json::from_str(body).unwrap();
        assert_eq!(input.amount, Decimal::from_str("12345678901234.000000001").unwrap());
        assert_eq!(input.amount.to_string(), "12345678901234.000000001");

        let body = r#"{"from_account":"bob123","to_account":"alice456","amount":0.1000000000000000000000000001,"direction":0}"#;
        let input: PaymentInput = serde_json::from_str(body).unwrap();
        assert_eq!(input.amount.to_string(), "0.1000000000000000000000000001");
    }

    #[test]
    fn test_input_rejects_amount_that_would_round() {
        let body = r#"{"from_account":"bob123","to_account":"alice456","amount":"0.12345678901234567890123456789012","direction":0}"#;
        let err = serde_json::from_str::<PaymentInput>(body).unwrap_err();
        assert!(err.to_string().contains("cannot be represented exactly"));

        let body = r#"{"from_account":"bob123","to_account":"alice456","amount":0.12345678901234567890123456789012,"direction":0}"#;
        assert!(serde_json::from_str::<PaymentInput>(body).is_err());
    }

    #[test]
    fn test_input_rejects_non_numeric_amount() {
        let body = r#"{"from_account":"bob123","to_account":"alice456","amount":true,"direction":0}"#;
        assert!(serde_json::from_str::<PaymentInput>(body).is_err());
    }

    #[test]
    fn test_payment_list_decodes_exact_amounts() {
        let body = r#"[{"id":1,"from_account":"bob123","amount":"100.250","to_account":"alice456","direction":1,"dt":null}]"#;
        let payments: Vec<Payment> = serde_json::from_str(body).unwrap();
        assert_eq!(payments[0].amount.to_string(), "100.250");
    }

    #[test]
    fn test_amount_is_encoded_as_string() {
        let value = serde_json::to_value(sample_input()).unwrap();
        assert_eq!(value["amount"], json!("100"));
        assert_eq!(value["direction"], json!(0));
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        let body = json!({
            "from_account": "bob123",
            "to_account": "alice456",
            "amount": "1",
            "direction": 7
        });

        assert!(serde_json::from_value::<PaymentInput>(body).is_err());
    }

    #[test]
    fn test_payment_without_timestamp_encodes_null() {
        let value = serde_json::to_value(sample_input().into_payment()).unwrap();
        assert_eq!(value["dt"], serde_json::Value::Null);
        assert_eq!(value["id"], json!(0));
    }
}
