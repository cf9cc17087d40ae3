//! Core payment service.
//!
//! Delegates every operation to the storage collaborator and classifies its
//! failures as internal errors. The full cause stays in the error message for
//! server-side logs; the transport redacts it before anything reaches the wire.

use async_trait::async_trait;
use shared::{Context, Payment, PaymentInput, PaymentService, ServiceError};

use crate::storage::PaymentStorage;

pub struct CorePaymentService<S> {
    storage: S,
}

impl<S: PaymentStorage> CorePaymentService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: PaymentStorage> PaymentService for CorePaymentService<S> {
    type Error = ServiceError;

    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>, ServiceError> {
        self.storage
            .get_all_payments(ctx)
            .await
            .map_err(|e| ServiceError::internal(format!("failed to get all payments: {:#}", e)))
    }

    async fn send_payment(&self, ctx: &Context, input: PaymentInput) -> Result<(), ServiceError> {
        let payment = input.into_payment();
        self.storage
            .send_payment(ctx, &payment)
            .await
            .map_err(|e| ServiceError::internal(format!("failed to send payment: {:#}", e)))
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>, ServiceError> {
        self.storage
            .get_available_accounts(ctx)
            .await
            .map_err(|e| {
                ServiceError::internal(format!("failed to get available accounts: {:#}", e))
            })
    }
}
