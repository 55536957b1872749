//! Request and response bodies of the finance REST API.
//!
//! Types in this crate mirror the wire format and carry no behaviour beyond
//! (de)serialization and the small normalization helpers in [`Reference`],
//! [`Money`] and [`dates`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use money::{Money, MoneyError};
pub use reference::{Id, Identified, Reference};

pub mod dates;
mod money;
mod reference;

/// Pagination block returned by list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    /// Pagination for an unpaginated response holding `len` items.
    pub fn single(len: usize) -> Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            page: 1,
            limit: len,
            total: u64::from(len),
            pages: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Response wrapper: the API sends either `{ "data": ..., "pagination": ... }`
/// or the bare payload depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        match self {
            Self::Wrapped { data, .. } | Self::Bare(data) => data,
        }
    }

    pub fn into_parts(self) -> (T, Option<Pagination>) {
        match self {
            Self::Wrapped { data, pagination } => (data, pagination),
            Self::Bare(data) => (data, None),
        }
    }
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Envelope<Vec<T>>> for Page<T> {
    fn from(value: Envelope<Vec<T>>) -> Self {
        let (items, pagination) = value.into_parts();
        let pagination = pagination.unwrap_or_else(|| Pagination::single(items.len()));
        Self { items, pagination }
    }
}

/// Error body. Older endpoints use `error`, newer ones `message`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Deleted {
    #[serde(default)]
    pub message: Option<String>,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct User {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: Option<String>,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        #[serde(default)]
        pub user: Option<User>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AccountType {
        #[default]
        Debit,
        Credit,
    }

    impl AccountType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Debit => "debit",
                Self::Credit => "credit",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Account {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: String,
        #[serde(rename = "type", default)]
        pub account_type: AccountType,
        #[serde(default)]
        pub balance: Money,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub organization: Option<Id>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default = "default_true")]
        pub is_active: bool,
        #[serde(default, with = "crate::dates::option")]
        pub created_at: Option<DateTime<Utc>>,
    }

    fn default_true() -> bool {
        true
    }

    impl Identified for Account {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    /// Account as embedded in other payloads; only the id is guaranteed.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AccountSummary {
        #[serde(alias = "_id")]
        pub id: Id,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(rename = "type", default)]
        pub account_type: Option<AccountType>,
    }

    impl Identified for AccountSummary {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.name.as_deref()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        #[serde(rename = "type")]
        pub account_type: AccountType,
        /// Opening balance.
        pub balance: Money,
        pub currency: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_active: Option<bool>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    impl CategoryKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        #[serde(default)]
        pub color: Option<String>,
        #[serde(default)]
        pub parent: Option<Id>,
    }

    impl Identified for Category {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategorySummary {
        #[serde(alias = "_id")]
        pub id: Id,
        #[serde(default)]
        pub name: Option<String>,
    }

    impl Identified for CategorySummary {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.name.as_deref()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub color: Option<String>,
        pub parent: Option<Id>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
    }
}

pub mod counterparty {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Counterparty {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
    }

    impl Identified for Counterparty {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CounterpartySummary {
        #[serde(alias = "_id")]
        pub id: Id,
        #[serde(default)]
        pub name: Option<String>,
    }

    impl Identified for CounterpartySummary {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.name.as_deref()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartyNew {
        pub name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub notes: Option<String>,
    }
}

pub mod organization {
    use super::*;

    /// Role of the current user inside an organization.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OrganizationRole {
        Owner,
        Admin,
        Member,
        Viewer,
    }

    impl OrganizationRole {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Admin => "admin",
                Self::Member => "member",
                Self::Viewer => "viewer",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Organization {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub role: Option<OrganizationRole>,
    }

    impl Identified for Organization {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrganizationNew {
        pub name: String,
        pub currency: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Member {
        pub user: Reference<crate::auth::User>,
        #[serde(default)]
        pub email: Option<String>,
        pub role: OrganizationRole,
    }

    impl Identified for crate::auth::User {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.name.as_deref().or(Some(self.email.as_str()))
        }
    }
}

pub mod party {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum PartyType {
        Customer,
        Supplier,
    }

    impl PartyType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Customer => "customer",
                Self::Supplier => "supplier",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Party {
        #[serde(alias = "_id")]
        pub id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub party_type: PartyType,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub address: Option<String>,
        #[serde(default)]
        pub opening_balance: Money,
        #[serde(default)]
        pub balance: Money,
    }

    impl Identified for Party {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.name)
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PartySummary {
        #[serde(alias = "_id")]
        pub id: Id,
        #[serde(default)]
        pub name: Option<String>,
    }

    impl Identified for PartySummary {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.name.as_deref()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PartyNew {
        pub name: String,
        #[serde(rename = "type")]
        pub party_type: PartyType,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub opening_balance: Money,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PartyUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub address: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct LedgerEntry {
        #[serde(with = "crate::dates")]
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub debit: Money,
        #[serde(default)]
        pub credit: Money,
        pub balance: Money,
        #[serde(default)]
        pub invoice: Option<Id>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PartyLedger {
        pub party: Party,
        #[serde(default)]
        pub opening_balance: Money,
        #[serde(default)]
        pub entries: Vec<LedgerEntry>,
        #[serde(default)]
        pub closing_balance: Money,
    }
}

pub mod transaction {
    use super::*;
    use crate::{
        account::AccountSummary, category::CategorySummary,
        counterparty::CounterpartySummary, party::PartySummary,
    };

    /// Direction of a transaction: credits increase the account balance,
    /// debits decrease it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionType {
        Debit,
        Credit,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Debit => "debit",
                Self::Credit => "credit",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        #[serde(alias = "_id")]
        pub id: Id,
        pub account: Reference<AccountSummary>,
        pub amount: Money,
        #[serde(rename = "type")]
        pub tx_type: TransactionType,
        #[serde(with = "crate::dates")]
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub category: Option<Reference<CategorySummary>>,
        #[serde(default)]
        pub counterparty: Option<Reference<CounterpartySummary>>,
        #[serde(default)]
        pub party: Option<Reference<PartySummary>>,
        /// Account balance right after this transaction, when the server
        /// computed it for the page being served.
        #[serde(
            default,
            alias = "balance_after_transaction",
            skip_serializing_if = "Option::is_none"
        )]
        pub balance_after_transaction: Option<Money>,
        #[serde(default)]
        pub transfer_id: Option<Id>,
        #[serde(default)]
        pub reference: Option<String>,
        #[serde(default, with = "crate::dates::option")]
        pub created_at: Option<DateTime<Utc>>,
    }

    impl Identified for Transaction {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            self.description.as_deref()
        }
    }

    /// Query parameters of `GET /transactions`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionFilter {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub account: Option<Id>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<Id>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub party: Option<Id>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub counterparty: Option<Id>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub tx_type: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub min_amount: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_amount: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub page: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<u32>,
    }

    impl TransactionFilter {
        /// Same filter targeting a specific page.
        pub fn with_page(&self, page: u32, limit: u32) -> Self {
            Self {
                page: Some(page),
                limit: Some(limit),
                ..self.clone()
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub account: Id,
        pub amount: Money,
        #[serde(rename = "type")]
        pub tx_type: TransactionType,
        #[serde(with = "crate::dates")]
        pub date: DateTime<Utc>,
        pub description: Option<String>,
        pub category: Option<Id>,
        pub counterparty: Option<Id>,
        pub party: Option<Id>,
        pub reference: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<Money>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub tx_type: Option<TransactionType>,
        #[serde(
            default,
            with = "crate::dates::option",
            skip_serializing_if = "Option::is_none"
        )]
        pub date: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<Id>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferNew {
        pub from_account: Id,
        pub to_account: Id,
        pub amount: Money,
        #[serde(with = "crate::dates")]
        pub date: DateTime<Utc>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferCreated {
        pub transfer_id: Id,
        #[serde(default)]
        pub transactions: Vec<Transaction>,
    }
}

pub mod invoice {
    use super::*;
    use crate::party::PartySummary;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum InvoiceStatus {
        Draft,
        Sent,
        Paid,
        Overdue,
        Cancelled,
    }

    impl InvoiceStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Draft => "draft",
                Self::Sent => "sent",
                Self::Paid => "paid",
                Self::Overdue => "overdue",
                Self::Cancelled => "cancelled",
            }
        }

        /// Settled invoices can no longer become overdue.
        pub fn is_settled(self) -> bool {
            matches!(self, Self::Paid | Self::Cancelled)
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvoiceItem {
        pub description: String,
        /// Quantity in hundredths (`150` = 1.5 units), same scale as [`Money`].
        pub quantity: Money,
        pub unit_price: Money,
        /// Tax rate in percent, e.g. `22` or `5.5`.
        #[serde(default)]
        pub tax_rate: Money,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Invoice {
        #[serde(alias = "_id")]
        pub id: Id,
        pub number: String,
        pub party: Reference<PartySummary>,
        #[serde(with = "crate::dates")]
        pub issue_date: DateTime<Utc>,
        #[serde(default, with = "crate::dates::option")]
        pub due_date: Option<DateTime<Utc>>,
        pub status: InvoiceStatus,
        #[serde(default)]
        pub items: Vec<InvoiceItem>,
        #[serde(default)]
        pub subtotal: Money,
        #[serde(default, alias = "tax")]
        pub tax_total: Money,
        #[serde(default)]
        pub total: Money,
        #[serde(default)]
        pub notes: Option<String>,
    }

    impl Identified for Invoice {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.number)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvoiceNew {
        pub party: Id,
        pub number: Option<String>,
        #[serde(with = "crate::dates")]
        pub issue_date: DateTime<Utc>,
        #[serde(with = "crate::dates::option")]
        pub due_date: Option<DateTime<Utc>>,
        pub items: Vec<InvoiceItem>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceStatusUpdate {
        pub status: InvoiceStatus,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    pub struct InvoiceFilter {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub party: Option<Id>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<InvoiceStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub page: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<u32>,
    }
}

pub mod import {
    use super::*;
    use crate::account::AccountSummary;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ImportStatus {
        Pending,
        Processing,
        Completed,
        Failed,
    }

    impl ImportStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Processing => "processing",
                Self::Completed => "completed",
                Self::Failed => "failed",
            }
        }

        pub fn is_finished(self) -> bool {
            matches!(self, Self::Completed | Self::Failed)
        }
    }

    /// A bank-statement import job.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Import {
        #[serde(alias = "_id")]
        pub id: Id,
        pub file_name: String,
        #[serde(default)]
        pub account: Option<Reference<AccountSummary>>,
        pub status: ImportStatus,
        #[serde(default)]
        pub total_rows: u32,
        #[serde(default)]
        pub imported_rows: u32,
        #[serde(default)]
        pub skipped_rows: u32,
        #[serde(default)]
        pub error: Option<String>,
        #[serde(default, with = "crate::dates::option")]
        pub created_at: Option<DateTime<Utc>>,
    }

    impl Identified for Import {
        fn id(&self) -> &Id {
            &self.id
        }

        fn label(&self) -> Option<&str> {
            Some(&self.file_name)
        }
    }
}

pub mod report {
    use super::*;
    use crate::category::CategorySummary;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        #[serde(default)]
        pub category: Option<Reference<CategorySummary>>,
        pub total: Money,
        #[serde(default)]
        pub count: u64,
    }

    /// Server-side totals for a transaction filter (`GET /reports/summary`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportSummary {
        pub total_credit: Money,
        pub total_debit: Money,
        pub net: Money,
        #[serde(default)]
        pub transaction_count: u64,
        #[serde(default)]
        pub by_category: Vec<CategoryTotal>,
    }
}
