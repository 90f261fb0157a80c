//! Certificate generation adapters.

mod stub_generator;

pub use stub_generator::StubCertificateGenerator;
