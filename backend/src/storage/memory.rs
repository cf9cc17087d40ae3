//! Process-local payment storage.
//!
//! Mirrors what the database procedure does for a payment: both accounts
//! must exist and share a currency, the source must cover the amount, and
//! the balances move together with the new payment record under one lock.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use shared::{Account, Context, Payment};
use tracing::debug;

use super::traits::PaymentStorage;

#[derive(Debug, Default)]
struct State {
    accounts: Vec<Account>,
    payments: Vec<Payment>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage seeded with the given accounts, in listing order.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self> {
        let storage = Self::new();
        for account in accounts {
            storage.add_account(account)?;
        }
        Ok(storage)
    }

    pub fn add_account(&self, account: Account) -> Result<()> {
        account
            .validate()
            .map_err(|e| anyhow!("invalid account: {}", e))?;

        let mut state = self.lock()?;
        if state.accounts.iter().any(|a| a.id == account.id) {
            bail!("account already exists: {}", account.id);
        }
        state.accounts.push(account);
        Ok(())
    }

    /// Current state of one account, if known.
    pub fn account(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.lock()?.accounts.iter().find(|a| a.id == id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory storage lock poisoned"))
    }

    fn book(&self, payment: &Payment) -> Result<()> {
        payment
            .validate()
            .map_err(|e| anyhow!("invalid payment: {}", e))?;

        let mut state = self.lock()?;
        let from = state
            .accounts
            .iter()
            .position(|a| a.id == payment.from_account)
            .ok_or_else(|| anyhow!("unknown account: {}", payment.from_account))?;
        let to = state
            .accounts
            .iter()
            .position(|a| a.id == payment.to_account)
            .ok_or_else(|| anyhow!("unknown account: {}", payment.to_account))?;

        if from == to {
            bail!("cannot send a payment to the same account");
        }
        if state.accounts[from].currency != state.accounts[to].currency {
            bail!(
                "currency mismatch: {} vs {}",
                state.accounts[from].currency,
                state.accounts[to].currency
            );
        }
        if state.accounts[from].balance < payment.amount {
            bail!("insufficient funds on account {}", payment.from_account);
        }

        state.accounts[from].balance -= payment.amount;
        state.accounts[to].balance += payment.amount;

        state.next_id += 1;
        let stored = Payment {
            id: state.next_id,
            dt: Some(Utc::now()),
            ..payment.clone()
        };
        debug!(id = stored.id, "payment booked in memory");
        state.payments.push(stored);
        Ok(())
    }
}

#[async_trait]
impl PaymentStorage for InMemoryStorage {
    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>> {
        ctx.run(async { Ok::<_, anyhow::Error>(self.lock()?.payments.clone()) })
            .await?
    }

    async fn send_payment(&self, ctx: &Context, payment: &Payment) -> Result<()> {
        ctx.run(async { self.book(payment) }).await?
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>> {
        ctx.run(async {
            Ok::<_, anyhow::Error>(self
                .lock()?
                .accounts
                .iter()
                .map(|a| a.id.clone())
                .collect())
        })
        .await?
    }
}
