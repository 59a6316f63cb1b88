//! Data types shared by the reconciliation engine, the ledger stores and the sync API.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use loyalty_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::reconciliation::LedgerError;

//--------------------------------------       OrderId       ---------------------------------------------------------
/// The merchant's order identifier. This is the idempotence key of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for OrderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      CustomerId     ---------------------------------------------------------
/// The key of a customer's ledger in the ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CustomerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A customer resolved from an email address by the order source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub email: String,
}

impl CustomerRecord {
    pub fn new<I: Into<CustomerId>>(id: I, email: &str) -> Self {
        Self { id: id.into(), email: email.to_string() }
    }
}

//--------------------------------------        Money        ---------------------------------------------------------
/// A currency amount in minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const MINOR_UNITS: i64 = 100;

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * Self::MINOR_UNITS)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let minor = Self::MINOR_UNITS.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / minor, abs % minor)
    }
}

//--------------------------------------   FinancialStatus   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinancialStatus {
    Paid,
    PartiallyPaid,
    Refunded,
    /// Pending, authorized, partially_refunded, voided, etc. None of these trigger an award or a revert by themselves.
    Other(String),
}

impl FinancialStatus {
    /// Paid and partially paid orders are eligible for an award.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid | Self::PartiallyPaid)
    }

    pub fn is_refunded(&self) -> bool {
        matches!(self, Self::Refunded)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially_paid",
            Self::Refunded => "refunded",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for FinancialStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Self::Paid,
            "partially_paid" => Self::PartiallyPaid,
            "refunded" => Self::Refunded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FinancialStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FinancialStatus> for String {
    fn from(value: FinancialStatus) -> Self {
        value.as_str().to_string()
    }
}

impl Display for FinancialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------    OrderSnapshot    ---------------------------------------------------------
/// The current state of an order, as reported by the order source. Snapshots are read-only inputs to reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    /// Display name of the order, e.g. `#1001`. Used in entry labels.
    pub name: Option<String>,
    /// Gross total minus the sum of all refund transactions.
    pub net_amount: Money,
    pub is_cancelled: bool,
    pub financial_status: FinancialStatus,
}

impl OrderSnapshot {
    pub fn new(order_id: OrderId, net_amount: Money, financial_status: FinancialStatus) -> Self {
        Self { order_id, name: None, net_amount, is_cancelled: false, financial_status }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|s| !s.is_empty()).unwrap_or(self.order_id.as_str())
    }
}

//--------------------------------------    SocialAction     ---------------------------------------------------------
/// One-shot social actions that earn a fixed reward, at most once per customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialAction {
    Instagram,
    Facebook,
    Signup,
}

impl SocialAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Signup => "signup",
        }
    }

    pub fn reward(&self) -> Points {
        match self {
            Self::Instagram | Self::Facebook => Points::new(50),
            Self::Signup => Points::new(100),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Instagram => "Followed Instagram",
            Self::Facebook => "Liked Facebook",
            Self::Signup => "Signup Bonus",
        }
    }
}

impl FromStr for SocialAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            "signup" => Ok(Self::Signup),
            _ => Err(format!("Unknown social action: {s}")),
        }
    }
}

impl Display for SocialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------    LedgerAction     ---------------------------------------------------------
/// The discriminator of a ledger entry. Serialized as a plain string tag (`"order_award"`, `"instagram"` ...).
///
/// Tags this version does not understand (e.g. the legacy `"order"` lump-sum bonus) are kept verbatim in `Other` so
/// that history is never rewritten. They count towards the total but are otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LedgerAction {
    OrderAward,
    OrderRevert,
    Social(SocialAction),
    Other(String),
}

impl LedgerAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderAward => "order_award",
            Self::OrderRevert => "order_revert",
            Self::Social(a) => a.as_str(),
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_order_action(&self) -> bool {
        matches!(self, Self::OrderAward | Self::OrderRevert)
    }
}

impl From<String> for LedgerAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "order_award" => Self::OrderAward,
            "order_revert" => Self::OrderRevert,
            s => match SocialAction::from_str(s) {
                Ok(action) => Self::Social(action),
                Err(_) => Self::Other(value),
            },
        }
    }
}

impl From<LedgerAction> for String {
    fn from(value: LedgerAction) -> Self {
        value.as_str().to_string()
    }
}

impl Display for LedgerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------     LedgerEntry     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub action: LedgerAction,
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub label: String,
    pub points: Points,
    #[serde(rename = "date", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn order_award(order: &OrderSnapshot, points: Points, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: LedgerAction::OrderAward,
            order_id: Some(order.order_id.clone()),
            label: format!("Order Bonus ({})", order.display_name()),
            points,
            timestamp,
        }
    }

    /// `awarded` is the magnitude of the original award. The entry carries its negation.
    pub fn order_revert(order: &OrderSnapshot, awarded: Points, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: LedgerAction::OrderRevert,
            order_id: Some(order.order_id.clone()),
            label: format!("Order Reverted ({})", order.display_name()),
            points: -awarded,
            timestamp,
        }
    }

    pub fn social(action: SocialAction, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: LedgerAction::Social(action),
            order_id: None,
            label: action.label().to_string(),
            points: action.reward(),
            timestamp,
        }
    }
}

//--------------------------------------     LedgerState     ---------------------------------------------------------
/// A customer's points ledger: an append-only breakdown of entries and the running total.
///
/// The fields are private so that the total can only change by appending entries. Ledgers loaded from a store may
/// still be inconsistent; [`LedgerState::is_consistent`] tells you whether `total` matches the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    total: Points,
    breakdown: Vec<LedgerEntry>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger whose total is the sum of the given entries.
    pub fn from_entries(breakdown: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        let total = sum_points(&breakdown)?;
        Ok(Self { total, breakdown })
    }

    /// Reassembles a ledger exactly as it was stored, without validating it.
    pub fn from_parts(total: Points, breakdown: Vec<LedgerEntry>) -> Self {
        Self { total, breakdown }
    }

    pub fn total(&self) -> Points {
        self.total
    }

    pub fn breakdown(&self) -> &[LedgerEntry] {
        &self.breakdown
    }

    pub fn len(&self) -> usize {
        self.breakdown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }

    pub fn computed_total(&self) -> Result<Points, LedgerError> {
        sum_points(&self.breakdown)
    }

    /// Fails with [`LedgerError::TotalMismatch`] if the total does not match the breakdown, or with
    /// [`LedgerError::Malformed`] if the breakdown cannot be summed at all.
    pub fn check_consistency(&self) -> Result<(), LedgerError> {
        let computed = self.computed_total()?;
        if computed == self.total {
            Ok(())
        } else {
            Err(LedgerError::TotalMismatch { stored: self.total, computed })
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }

    pub(crate) fn append(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        self.total = self.total.checked_add(entry.points).ok_or_else(points_overflow)?;
        self.breakdown.push(entry);
        Ok(())
    }

    /// Encodes the ledger the way ledger stores keep it: a string-encoded total and a JSON array.
    pub fn to_stored(&self) -> Result<StoredLedger, LedgerError> {
        let breakdown = serde_json::to_string(&self.breakdown).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        Ok(StoredLedger { total: self.total.value().to_string(), breakdown })
    }
}

fn sum_points(entries: &[LedgerEntry]) -> Result<Points, LedgerError> {
    entries.iter().try_fold(Points::default(), |acc, e| acc.checked_add(e.points)).ok_or_else(points_overflow)
}

pub(crate) fn points_overflow() -> LedgerError {
    LedgerError::Malformed("The ledger points do not fit in a total.".to_string())
}

//--------------------------------------     StoredLedger    ---------------------------------------------------------
/// The wire/storage form of a [`LedgerState`]. Both fields are always written together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoredLedger {
    /// String-encoded integer
    pub total: String,
    /// JSON-encoded array of [`LedgerEntry`]
    pub breakdown: String,
}

impl StoredLedger {
    /// Decodes the stored fields. Blank fields are read as zero and an empty breakdown respectively, which is how a
    /// customer without any ledger activity looks.
    pub fn decode(&self) -> Result<LedgerState, LedgerError> {
        let total = match self.total.trim() {
            "" => Points::default(),
            s => s.parse::<Points>().map_err(|e| LedgerError::Malformed(format!("Invalid total. {e}")))?,
        };
        let breakdown = match self.breakdown.trim() {
            "" => Vec::new(),
            s => serde_json::from_str::<Vec<LedgerEntry>>(s)
                .map_err(|e| LedgerError::Malformed(format!("Invalid breakdown. {e}")))?,
        };
        Ok(LedgerState::from_parts(total, breakdown))
    }
}
