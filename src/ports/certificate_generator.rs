//! CertificateGenerator port - completion certificate rendering.
//!
//! Certificate generation is an opaque collaborator; the core only needs
//! bytes it can stream back to the client.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for rendering completion certificates as PDF bytes.
#[async_trait]
pub trait CertificateGenerator: Send + Sync {
    async fn generate(
        &self,
        student_name: &str,
        course_name: &str,
    ) -> Result<Vec<u8>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn CertificateGenerator) {}
    }
}
