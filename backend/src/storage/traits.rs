//! # Storage Traits
//!
//! The contract the core service expects from its persistence collaborator.
//! Implementations own the payment and account records; callers only ever
//! receive copies.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Context, Payment};

/// Trait defining the interface for payment storage operations
///
/// Every operation must honor the given context: work still running when
/// its deadline passes or it is cancelled is abandoned with an error.
#[async_trait]
pub trait PaymentStorage: Send + Sync {
    /// List all stored payments
    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>>;

    /// Book a payment as one atomic unit; `id` and `dt` of the argument are ignored
    async fn send_payment(&self, ctx: &Context, payment: &Payment) -> Result<()>;

    /// Identifiers of all accounts that can take part in a payment
    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>>;
}
