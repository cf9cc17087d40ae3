use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::payment::{Payment, PaymentInput};

/// The payments capability set.
///
/// Implemented by the core service, by each middleware layer wrapping it,
/// and by the remote HTTP client, so any of them can stand in for another.
#[async_trait]
pub trait PaymentService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// List every persisted payment.
    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, Self::Error>;

    /// Persist a new payment; storage assigns its id and timestamp.
    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), Self::Error>;

    /// Identifiers of the accounts that can receive funds.
    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, Self::Error>;
}

#[async_trait]
impl<S> PaymentService for Arc<S>
where
    S: PaymentService + ?Sized,
{
    type Error = S::Error;

    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, Self::Error> {
        (**self).get_all_payments(ctx).await
    }

    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), Self::Error> {
        (**self).send_payment(ctx, input).await
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, Self::Error> {
        (**self).get_available_accounts(ctx).await
    }
}
