//! Defines the core data models for transactions and the validation rules for
//! creating them.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::{ValidationError, currency::CurrencyValue, database_id::TransactionId, user::UserId};

// ============================================================================
// TAGS
// ============================================================================

/// Whether money was spent or earned.
///
/// Tags written by newer versions of the app are kept as
/// [TransactionType::Unrecognized] so that old rows never fail to load. They
/// are ignored by every sum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money spent, reduces net worth.
    Expense,
    /// Money earned, increases net worth.
    Income,
    /// A stored tag this build does not know about.
    Unrecognized(String),
}

impl TransactionType {
    /// The tag used in storage and JSON, e.g. "EXPENSE".
    pub fn as_tag(&self) -> &str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
            TransactionType::Unrecognized(tag) => tag,
        }
    }

    /// Read a tag from storage without rejecting unknown values.
    pub fn from_stored_tag(tag: &str) -> Self {
        tag.parse()
            .unwrap_or_else(|_| TransactionType::Unrecognized(tag.to_owned()))
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXPENSE" => Ok(TransactionType::Expense),
            "INCOME" => Ok(TransactionType::Income),
            _ => Err(ValidationError::InvalidTransactionType(s.to_owned())),
        }
    }
}

/// How often a transaction recurs.
///
/// Carried through to the presentation layer but never used in arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransactionFrequency {
    #[default]
    Fixed,
    Variable,
    /// A stored tag this build does not know about.
    Unrecognized(String),
}

impl TransactionFrequency {
    /// The tag used in storage and JSON, e.g. "FIXED".
    pub fn as_tag(&self) -> &str {
        match self {
            TransactionFrequency::Fixed => "FIXED",
            TransactionFrequency::Variable => "VARIABLE",
            TransactionFrequency::Unrecognized(tag) => tag,
        }
    }

    /// Read a tag from storage without rejecting unknown values.
    pub fn from_stored_tag(tag: &str) -> Self {
        tag.parse()
            .unwrap_or_else(|_| TransactionFrequency::Unrecognized(tag.to_owned()))
    }
}

impl FromStr for TransactionFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIXED" => Ok(TransactionFrequency::Fixed),
            "VARIABLE" => Ok(TransactionFrequency::Variable),
            _ => Err(ValidationError::InvalidFrequency(s.to_owned())),
        }
    }
}

macro_rules! impl_tag_conversions {
    ($tag_type:ty) => {
        impl Display for $tag_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_tag())
            }
        }

        impl Serialize for $tag_type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_tag())
            }
        }

        impl<'de> Deserialize<'de> for $tag_type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                Ok(<$tag_type>::from_stored_tag(&tag))
            }
        }

        impl ToSql for $tag_type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_tag()))
            }
        }

        impl FromSql for $tag_type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value.as_str().map(<$tag_type>::from_stored_tag)
            }
        }
    };
}

impl_tag_conversions!(TransactionType);
impl_tag_conversions!(TransactionFrequency);

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// `amount` is always a non-negative magnitude. Whether it adds to or takes
/// away from the user's balance is decided by `transaction_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned.
    pub amount: CurrencyValue,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// How often the transaction recurs.
    pub frequency: TransactionFrequency,
    /// When the transaction happened.
    pub date: Date,
    /// The user that owns the transaction.
    pub user_id: UserId,
}

/// A validated transaction that has not been saved yet.
///
/// To create a `NewTransaction`, use [NewTransaction::new] or
/// [TransactionForm::validate].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    title: String,
    amount: CurrencyValue,
    transaction_type: TransactionType,
    frequency: TransactionFrequency,
    date: Date,
    user_id: UserId,
}

impl NewTransaction {
    /// Validate the fields of a new transaction. The frequency defaults to
    /// [TransactionFrequency::Fixed].
    ///
    /// # Errors
    /// This function will return a:
    /// - [ValidationError::EmptyTitle] if `title` is empty or only whitespace,
    /// - [ValidationError::ZeroAmount] if `amount` is zero,
    /// - [ValidationError::NegativeAmount] if `amount` is less than zero,
    /// - or [ValidationError::InvalidTransactionType] if `transaction_type` is
    ///   not an expense or income.
    pub fn new(
        user_id: UserId,
        title: &str,
        amount: CurrencyValue,
        transaction_type: TransactionType,
        date: Date,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }

        if amount.is_negative() {
            return Err(ValidationError::NegativeAmount(amount));
        }

        if let TransactionType::Unrecognized(tag) = transaction_type {
            return Err(ValidationError::InvalidTransactionType(tag));
        }

        Ok(Self {
            title: title.to_owned(),
            amount,
            transaction_type,
            frequency: TransactionFrequency::default(),
            date,
            user_id,
        })
    }

    /// Set how often the transaction recurs.
    ///
    /// # Errors
    /// Returns [ValidationError::InvalidFrequency] for an unrecognized tag.
    pub fn with_frequency(mut self, frequency: TransactionFrequency) -> Result<Self, ValidationError> {
        if let TransactionFrequency::Unrecognized(tag) = frequency {
            return Err(ValidationError::InvalidFrequency(tag));
        }

        self.frequency = frequency;
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> CurrencyValue {
        self.amount
    }

    pub fn transaction_type(&self) -> &TransactionType {
        &self.transaction_type
    }

    pub fn frequency(&self) -> &TransactionFrequency {
        &self.frequency
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// The raw request body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub title: String,
    /// A plain decimal, e.g. "12.50". JSON numbers are accepted and kept as
    /// their decimal text.
    #[serde(default, deserialize_with = "deserialize_amount_text")]
    pub amount: String,
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub date: Option<Date>,
}

impl TransactionForm {
    /// Parse and validate the form. Fields are checked in the order title,
    /// amount, type, frequency and the first failure is returned.
    ///
    /// A missing `date` defaults to `today`.
    pub fn validate(self, user_id: UserId, today: Date) -> Result<NewTransaction, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let amount: CurrencyValue = self.amount.parse()?;
        let frequency = match self.frequency.as_deref() {
            Some(tag) if !tag.trim().is_empty() => TransactionFrequency::from_stored_tag(tag),
            _ => TransactionFrequency::default(),
        };

        // Unknown tags are rejected by `NewTransaction` after the amount checks.
        NewTransaction::new(
            user_id,
            &self.title,
            amount,
            TransactionType::from_stored_tag(&self.transaction_type),
            self.date.unwrap_or(today),
        )?
        .with_frequency(frequency)
    }
}

/// An amount sent either as a string or as a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountText {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_amount_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match AmountText::deserialize(deserializer)? {
        AmountText::Text(text) => text,
        AmountText::Number(number) => number.to_string(),
    })
}
