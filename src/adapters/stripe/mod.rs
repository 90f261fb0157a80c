//! Stripe adapter for the PaymentGateway port.

mod stripe_gateway;
mod webhook_types;

pub use stripe_gateway::{StripeConfig, StripePaymentGateway};
pub use webhook_types::{SignatureHeader, SignatureParseError};
