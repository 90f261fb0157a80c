//! Ports: the interfaces adapters implement and handlers depend on.

mod certificate_generator;
mod course_repository;
mod credential_hasher;
mod entitlement_store;
mod idempotency_guard;
mod mailer;
mod payment_gateway;
mod question_repository;
mod token_service;
mod user_repository;

pub use certificate_generator::CertificateGenerator;
pub use course_repository::CourseRepository;
pub use credential_hasher::CredentialHasher;
pub use entitlement_store::EntitlementStore;
pub use idempotency_guard::IdempotencyGuard;
pub use mailer::{EmailMessage, Mailer};
pub use payment_gateway::{
    CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayErrorCode, PaymentGateway,
};
pub use question_repository::QuestionRepository;
pub use token_service::{AuthError, TokenClaims, TokenService};
pub use user_repository::UserRepository;
