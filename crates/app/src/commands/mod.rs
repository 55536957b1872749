//! One function per CLI command. Output goes to stdout, logs to stderr.

use api_client::Client;
use api_types::{Id, Identified, Money};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use engine::{
    AccountDirectory, CategoryDirectory, FilterState, SearchableSelect, search::normalize_key,
};

use crate::{
    cli::{Command, FilterArgs, LoginArgs},
    error::{AppError, Result},
    settings::Settings,
};

mod accounts;
mod catalog;
mod imports;
mod parties;
mod report;
mod transactions;

pub struct Context {
    pub client: Client,
    pub settings: Settings,
    pub timezone: Tz,
}

impl Context {
    pub fn new(settings: Settings) -> Result<Self> {
        let timezone = engine::parse_timezone(&settings.timezone)?;
        let mut client = Client::new(&settings.base_url)?
            .with_organization(settings.organization.as_deref().map(Id::from));
        client.set_token(settings.token.clone());
        Ok(Self {
            client,
            settings,
            timezone,
        })
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Midnight UTC of `date`, or of today when absent.
    fn day(&self, date: Option<NaiveDate>) -> DateTime<Utc> {
        date.unwrap_or_else(|| self.today())
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    fn money(&self, amount: Money) -> String {
        amount.with_code(&self.settings.currency)
    }

    fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone)
            .format("%Y-%m-%d")
            .to_string()
    }

    async fn account_id(&self, input: &str) -> Result<Id> {
        let accounts = self.client.accounts_list().await?;
        pick("accounts", SearchableSelect::new(accounts), input)
    }

    async fn category_id(&self, input: &str) -> Result<Id> {
        let categories = self.client.categories_list(None).await?;
        pick("categories", SearchableSelect::new(categories), input)
    }

    async fn counterparty_id(&self, input: &str) -> Result<Id> {
        let counterparties = self.client.counterparties_list(None).await?;
        let select = SearchableSelect::new(counterparties).with_secondary(|c| c.email.as_deref());
        pick("counterparties", select, input)
    }

    async fn party_id(&self, input: &str) -> Result<Id> {
        let parties = self.client.parties_list(None).await?;
        let select = SearchableSelect::new(parties).with_secondary(|p| p.email.as_deref());
        pick("parties", select, input)
    }

    /// Resolves the filter flags into filter state, with the account and
    /// category directories used to print and describe the results.
    async fn filter(
        &self,
        args: &FilterArgs,
    ) -> Result<(FilterState, AccountDirectory, CategoryDirectory)> {
        let accounts = self.client.accounts_list().await?;
        let categories = self.client.categories_list(None).await?;

        let mut state = args.to_state(self.today());
        if let Some(input) = &args.account {
            let select = SearchableSelect::new(accounts.clone());
            state.set_account(Some(pick("accounts", select, input)?));
        }
        if let Some(input) = &args.category {
            let select = SearchableSelect::new(categories.clone());
            state.set_category(Some(pick("categories", select, input)?));
        }
        if let Some(input) = &args.counterparty {
            state.set_counterparty(Some(self.counterparty_id(input).await?));
        }
        if let Some(input) = &args.party {
            state.set_party(Some(self.party_id(input).await?));
        }
        state.validate()?;
        tracing::debug!("{} active filter(s)", state.active_count());

        Ok((
            state,
            AccountDirectory::new(accounts),
            CategoryDirectory::new(categories),
        ))
    }
}

/// Picks one option by id, exact name or unique search match.
fn pick<T: Identified>(kind: &'static str, mut select: SearchableSelect<T>, input: &str) -> Result<Id> {
    let input = input.trim();
    if select.select_by_id(&Id::from(input))
        && let Some(id) = select.selected_id()
    {
        return Ok(id.clone());
    }

    select.set_query(input);
    let wanted = normalize_key(input);
    let is_exact = |option: &T| option.label().map(normalize_key).as_deref() == Some(wanted.as_str());
    let exact = select.matches().filter(|o| is_exact(o)).count();

    if select.match_count() == 1 || exact == 1 {
        // Exact label matches rank first, so the highlight is the one to take.
        return select
            .select_highlighted()
            .map(|o| o.id().clone())
            .ok_or_else(|| AppError::NoMatch {
                kind,
                input: input.to_string(),
            });
    }
    if select.match_count() == 0 {
        return Err(AppError::NoMatch {
            kind,
            input: input.to_string(),
        });
    }

    let candidates = select
        .matches()
        .take(5)
        .map(|o| o.label().unwrap_or(o.id().as_str()).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::Ambiguous {
        kind,
        input: input.to_string(),
        candidates,
    })
}

pub async fn run(command: Command, ctx: &mut Context) -> Result<()> {
    match command {
        Command::Login(args) => login(ctx, args).await,
        Command::Accounts { command } => accounts::run(ctx, command).await,
        Command::Transactions { command } => transactions::run(ctx, command).await,
        Command::Transfer(args) => transactions::transfer(ctx, args).await,
        Command::Categories { command } => catalog::categories(ctx, command).await,
        Command::Counterparties { command } => catalog::counterparties(ctx, command).await,
        Command::Orgs { command } => catalog::organizations(ctx, command).await,
        Command::Parties { command } => parties::run(ctx, command).await,
        Command::Invoices { command } => parties::invoices(ctx, command).await,
        Command::Imports { command } => imports::run(ctx, command).await,
        Command::Summary(filter) => transactions::summary(ctx, &filter).await,
        Command::Report(args) => report::run(ctx, args).await,
    }
}

async fn login(ctx: &mut Context, args: LoginArgs) -> Result<()> {
    let response = ctx.client.login(&args.email, &args.password).await?;
    if let Some(user) = &response.user {
        println!("Logged in as {}", user.label().unwrap_or(user.email.as_str()));
    }
    println!("export FINTRACK_TOKEN={}", response.token);
    Ok(())
}
