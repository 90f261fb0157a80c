//! Enrollment domain: entitlements and the payment events that grant them.

mod entitlement;
mod errors;
mod payment_event;

pub use entitlement::{Entitlement, PurchaseStatus};
pub use errors::EnrollmentError;
pub use payment_event::{PaymentEvent, PaymentEventKind, PaymentMetadata};
