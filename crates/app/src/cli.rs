use std::path::PathBuf;

use api_types::{
    Id, Money,
    account::AccountType,
    category::CategoryKind,
    invoice::InvoiceStatus,
    party::PartyType,
    transaction::TransactionType,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{DatePreset, FilterState};

#[derive(Debug, Parser)]
#[command(name = "fintrack")]
#[command(about = "Accounts, transactions, invoices and reports from the command line")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. https://api.example.com/api).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override the API token.
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Organization id sent with every request.
    #[arg(long, global = true)]
    pub organization: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override currency code printed next to amounts.
    #[arg(long, global = true)]
    pub currency: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Exchange credentials for an API token.
    Login(LoginArgs),
    Accounts {
        #[command(subcommand)]
        command: AccountsCommand,
    },
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },
    /// Move money between two accounts.
    Transfer(TransferArgs),
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
    Counterparties {
        #[command(subcommand)]
        command: CounterpartiesCommand,
    },
    Orgs {
        #[command(subcommand)]
        command: OrgsCommand,
    },
    Parties {
        #[command(subcommand)]
        command: PartiesCommand,
    },
    Invoices {
        #[command(subcommand)]
        command: InvoicesCommand,
    },
    Imports {
        #[command(subcommand)]
        command: ImportsCommand,
    },
    /// Server-side totals for a filter.
    Summary(FilterArgs),
    /// Export the filtered transactions with running balances.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    /// Prefer setting `FINTRACK_PASSWORD` over passing the flag.
    #[arg(long, env = "FINTRACK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    List,
    Show {
        account: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_enum, default_value_t = AccountTypeArg::Debit)]
        account_type: AccountTypeArg,
        /// Opening balance.
        #[arg(long, default_value = "0")]
        balance: Money,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        account: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Create(TransactionArgs),
    Delete {
        id: Id,
    },
}

#[derive(Debug, Args)]
pub struct TransactionArgs {
    /// Account id or name.
    #[arg(long)]
    pub account: String,
    #[arg(long)]
    pub amount: Money,
    #[arg(long = "type", value_enum)]
    pub tx_type: TxTypeArg,
    /// Defaults to today in the configured timezone.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
    /// Category id or name.
    #[arg(long)]
    pub category: Option<String>,
    /// Counterparty id, name or email.
    #[arg(long)]
    pub counterparty: Option<String>,
    /// Party id or name.
    #[arg(long)]
    pub party: Option<String>,
    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub amount: Money,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    List {
        #[arg(long, value_enum)]
        kind: Option<CategoryKindArg>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        kind: CategoryKindArg,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        parent: Option<Id>,
    },
    Delete {
        category: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CounterpartiesCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    List,
    Members { id: Id },
}

#[derive(Debug, Subcommand)]
pub enum PartiesCommand {
    List {
        #[arg(long = "type", value_enum)]
        party_type: Option<PartyTypeArg>,
    },
    Show {
        party: String,
    },
    Ledger {
        party: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum InvoicesCommand {
    List {
        /// Party id or name.
        #[arg(long)]
        party: Option<String>,
        #[arg(long, value_enum)]
        status: Option<InvoiceStatusArg>,
    },
    Show {
        id: Id,
    },
    Status {
        id: Id,
        #[arg(value_enum)]
        status: InvoiceStatusArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum ImportsCommand {
    List,
    /// Upload a bank statement for an account.
    Upload {
        #[arg(long)]
        account: String,
        file: PathBuf,
    },
}

/// Filters shared by `transactions list`, `summary` and `report`.
///
/// Account, category, counterparty and party accept an id or a name.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub counterparty: Option<String>,
    #[arg(long)]
    pub party: Option<String>,
    #[arg(long = "type", value_enum)]
    pub tx_type: Option<TxTypeArg>,
    #[arg(long, conflicts_with = "period")]
    pub from: Option<NaiveDate>,
    #[arg(long, conflicts_with = "period")]
    pub to: Option<NaiveDate>,
    /// today, 7d, 30d, this-month, last-month or this-year.
    #[arg(long)]
    pub period: Option<DatePreset>,
    #[arg(long)]
    pub min_amount: Option<Money>,
    #[arg(long)]
    pub max_amount: Option<Money>,
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    /// Filter state for everything that does not need a lookup. Named
    /// references are resolved by the caller.
    pub fn to_state(&self, today: NaiveDate) -> FilterState {
        let mut state = FilterState::default();
        state.set_type(self.tx_type.map(Into::into));
        match self.period {
            Some(preset) => state.apply_preset(preset, today),
            None => state.set_date_range(self.from, self.to),
        }
        state.set_amount_range(self.min_amount, self.max_amount);
        if let Some(search) = &self.search {
            state.set_search(search);
        }
        state
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
    pub format: ReportFormat,
    /// Output file; standard output when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value = "Transaction report")]
    pub title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Html,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TxTypeArg {
    Debit,
    Credit,
}

impl From<TxTypeArg> for TransactionType {
    fn from(value: TxTypeArg) -> Self {
        match value {
            TxTypeArg::Debit => Self::Debit,
            TxTypeArg::Credit => Self::Credit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccountTypeArg {
    Debit,
    Credit,
}

impl From<AccountTypeArg> for AccountType {
    fn from(value: AccountTypeArg) -> Self {
        match value {
            AccountTypeArg::Debit => Self::Debit,
            AccountTypeArg::Credit => Self::Credit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CategoryKindArg {
    Income,
    Expense,
}

impl From<CategoryKindArg> for CategoryKind {
    fn from(value: CategoryKindArg) -> Self {
        match value {
            CategoryKindArg::Income => Self::Income,
            CategoryKindArg::Expense => Self::Expense,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartyTypeArg {
    Customer,
    Supplier,
}

impl From<PartyTypeArg> for PartyType {
    fn from(value: PartyTypeArg) -> Self {
        match value {
            PartyTypeArg::Customer => Self::Customer,
            PartyTypeArg::Supplier => Self::Supplier,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InvoiceStatusArg {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl From<InvoiceStatusArg> for InvoiceStatus {
    fn from(value: InvoiceStatusArg) -> Self {
        match value {
            InvoiceStatusArg::Draft => Self::Draft,
            InvoiceStatusArg::Sent => Self::Sent,
            InvoiceStatusArg::Paid => Self::Paid,
            InvoiceStatusArg::Overdue => Self::Overdue,
            InvoiceStatusArg::Cancelled => Self::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fintrack").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_flags_become_filter_state() {
        let cli = parse(&[
            "report",
            "--type",
            "debit",
            "--period",
            "last-month",
            "--min-amount",
            "10,50",
            "--search",
            "  rent ",
            "--format",
            "csv",
            "--organization",
            "org-1",
        ]);
        assert_eq!(cli.global.organization.as_deref(), Some("org-1"));
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.format, ReportFormat::Csv);

        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let state = args.filter.to_state(today);
        assert_eq!(state.tx_type, Some(TransactionType::Debit));
        assert_eq!(state.start_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(state.end_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(state.min_amount, Some(Money::new(1_050)));
        assert_eq!(state.search.as_deref(), Some("rent"));
    }

    #[test]
    fn period_conflicts_with_explicit_dates() {
        let result = Cli::try_parse_from([
            "fintrack",
            "summary",
            "--period",
            "7d",
            "--from",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn amounts_are_parsed_strictly() {
        assert!(
            Cli::try_parse_from([
                "fintrack",
                "transfer",
                "--from",
                "a",
                "--to",
                "b",
                "--amount",
                "1.234",
            ])
            .is_err()
        );
    }
}
