//! State of the transaction filter bar.
//!
//! The filter bar collects the user's choices, validates them and turns them
//! into the query parameters of `GET /transactions`. The same state also
//! produces the one-line description printed in report headers.

use api_types::{
    Id, Money,
    transaction::{TransactionFilter, TransactionType},
};
use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    EngineError, ResultEngine,
    directory::{AccountDirectory, CategoryDirectory},
};

/// Quick date ranges offered next to the explicit start/end pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl DatePreset {
    /// Inclusive range for the preset relative to `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today),
            Self::Last7Days => (today - Duration::days(6), today),
            Self::Last30Days => (today - Duration::days(29), today),
            Self::ThisMonth => (first_of_month(today), today),
            Self::LastMonth => {
                let end = first_of_month(today) - Duration::days(1);
                (first_of_month(end), end)
            }
            Self::ThisYear => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl std::str::FromStr for DatePreset {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "today" => Ok(Self::Today),
            "last-7-days" | "7d" => Ok(Self::Last7Days),
            "last-30-days" | "30d" => Ok(Self::Last30Days),
            "this-month" => Ok(Self::ThisMonth),
            "last-month" => Ok(Self::LastMonth),
            "this-year" => Ok(Self::ThisYear),
            other => Err(EngineError::InvalidFilter(format!(
                "unknown period '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub account: Option<Id>,
    pub category: Option<Id>,
    pub party: Option<Id>,
    pub counterparty: Option<Id>,
    pub tx_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub search: Option<String>,
}

impl FilterState {
    pub fn set_account(&mut self, account: Option<Id>) {
        self.account = account;
    }

    pub fn set_category(&mut self, category: Option<Id>) {
        self.category = category;
    }

    pub fn set_party(&mut self, party: Option<Id>) {
        self.party = party;
    }

    pub fn set_counterparty(&mut self, counterparty: Option<Id>) {
        self.counterparty = counterparty;
    }

    pub fn set_type(&mut self, tx_type: Option<TransactionType>) {
        self.tx_type = tx_type;
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start_date = start;
        self.end_date = end;
    }

    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        let (start, end) = preset.range(today);
        self.set_date_range(Some(start), Some(end));
    }

    pub fn set_amount_range(&mut self, min: Option<Money>, max: Option<Money>) {
        self.min_amount = min;
        self.max_amount = max;
    }

    /// Blank or whitespace-only text clears the search.
    pub fn set_search(&mut self, text: &str) {
        let trimmed = text.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of active filters, as shown on the filter badge. A date range
    /// or amount range counts once even with both bounds set.
    pub fn active_count(&self) -> usize {
        [
            self.account.is_some(),
            self.category.is_some(),
            self.party.is_some(),
            self.counterparty.is_some(),
            self.tx_type.is_some(),
            self.start_date.is_some() || self.end_date.is_some(),
            self.min_amount.is_some() || self.max_amount.is_some(),
            self.search.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn validate(&self) -> ResultEngine<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(EngineError::InvalidFilter(format!(
                "start date {start} is after end date {end}"
            )));
        }
        for (label, amount) in [("minimum", self.min_amount), ("maximum", self.max_amount)] {
            if let Some(amount) = amount
                && amount.is_negative()
            {
                return Err(EngineError::InvalidAmount(format!(
                    "{label} amount must not be negative"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount)
            && min > max
        {
            return Err(EngineError::InvalidFilter(format!(
                "minimum amount {min} exceeds maximum amount {max}"
            )));
        }
        Ok(())
    }

    /// Validates and converts into API query parameters (without paging).
    pub fn to_query(&self) -> ResultEngine<TransactionFilter> {
        self.validate()?;
        Ok(TransactionFilter {
            account: self.account.clone(),
            category: self.category.clone(),
            party: self.party.clone(),
            counterparty: self.counterparty.clone(),
            tx_type: self.tx_type,
            start_date: self.start_date,
            end_date: self.end_date,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            search: self.search.clone(),
            page: None,
            limit: None,
        })
    }

    /// One-line description, e.g. `Account: Cash | From 2024-01-01 to 2024-01-31`.
    pub fn describe(&self, accounts: &AccountDirectory, categories: &CategoryDirectory) -> String {
        let mut parts = Vec::new();
        if let Some(id) = &self.account {
            let name = accounts.get(id).map_or(id.as_str(), |a| a.name.as_str());
            parts.push(format!("Account: {name}"));
        }
        if let Some(id) = &self.category {
            let name = categories.get(id).map_or(id.as_str(), |c| c.name.as_str());
            parts.push(format!("Category: {name}"));
        }
        if let Some(id) = &self.party {
            parts.push(format!("Party: {id}"));
        }
        if let Some(id) = &self.counterparty {
            parts.push(format!("Counterparty: {id}"));
        }
        if let Some(tx_type) = self.tx_type {
            parts.push(format!("Type: {}", tx_type.as_str()));
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => parts.push(format!("From {start} to {end}")),
            (Some(start), None) => parts.push(format!("From {start}")),
            (None, Some(end)) => parts.push(format!("Until {end}")),
            (None, None) => {}
        }
        match (self.min_amount, self.max_amount) {
            (Some(min), Some(max)) => parts.push(format!("Amount {min} to {max}")),
            (Some(min), None) => parts.push(format!("Amount at least {min}")),
            (None, Some(max)) => parts.push(format!("Amount at most {max}")),
            (None, None) => {}
        }
        if let Some(search) = &self.search {
            parts.push(format!("Search: \"{search}\""));
        }

        if parts.is_empty() {
            "All transactions".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn active_count_groups_ranges() {
        let mut state = FilterState::default();
        assert!(state.is_empty());

        state.set_date_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        state.set_amount_range(Some(Money::new(100)), None);
        state.set_type(Some(TransactionType::Debit));
        state.set_search("   ");
        assert_eq!(state.active_count(), 3);

        state.set_search(" rent ");
        assert_eq!(state.search.as_deref(), Some("rent"));
        assert_eq!(state.active_count(), 4);

        state.clear();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn validate_rejects_inverted_ranges() {
        let mut state = FilterState::default();
        state.set_date_range(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)));
        assert!(matches!(state.validate(), Err(EngineError::InvalidFilter(_))));

        state.set_date_range(None, None);
        state.set_amount_range(Some(Money::new(500)), Some(Money::new(100)));
        assert!(matches!(state.to_query(), Err(EngineError::InvalidFilter(_))));

        state.set_amount_range(Some(Money::new(-1)), None);
        assert!(matches!(state.validate(), Err(EngineError::InvalidAmount(_))));
    }

    #[test]
    fn to_query_copies_fields_without_paging() {
        let mut state = FilterState::default();
        state.set_account(Some(Id::from("a1")));
        state.set_type(Some(TransactionType::Credit));
        state.set_date_range(Some(date(2024, 1, 1)), None);

        let query = state.to_query().unwrap();
        assert_eq!(query.account, Some(Id::from("a1")));
        assert_eq!(query.tx_type, Some(TransactionType::Credit));
        assert_eq!(query.start_date, Some(date(2024, 1, 1)));
        assert_eq!((query.page, query.limit), (None, None));
    }

    #[test]
    fn presets_cover_month_boundaries() {
        let today = date(2024, 3, 15);
        assert_eq!(DatePreset::ThisMonth.range(today), (date(2024, 3, 1), today));
        assert_eq!(
            DatePreset::LastMonth.range(today),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            DatePreset::LastMonth.range(date(2024, 1, 10)),
            (date(2023, 12, 1), date(2023, 12, 31))
        );
        assert_eq!(DatePreset::Last7Days.range(today).0, date(2024, 3, 9));
        assert_eq!(DatePreset::ThisYear.range(today).0, date(2024, 1, 1));
        assert_eq!("last_month".parse::<DatePreset>().unwrap(), DatePreset::LastMonth);
        assert!("fortnight".parse::<DatePreset>().is_err());
    }

    #[test]
    fn describe_lists_active_filters() {
        let mut state = FilterState::default();
        assert_eq!(
            state.describe(&AccountDirectory::default(), &CategoryDirectory::default()),
            "All transactions"
        );

        state.set_account(Some(Id::from("a1")));
        state.set_date_range(None, Some(date(2024, 1, 31)));
        state.set_search("rent");
        assert_eq!(
            state.describe(&AccountDirectory::default(), &CategoryDirectory::default()),
            "Account: a1 | Until 2024-01-31 | Search: \"rent\""
        );
    }
}
