//! Stub implementation of the CertificateGenerator port.
//!
//! Renders a minimal single-page PDF with the student and course names.
//! Good enough for development and tests; a real renderer can replace it
//! behind the same port without touching callers.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::CertificateGenerator;

/// Minimal PDF certificate renderer.
#[derive(Debug, Default)]
pub struct StubCertificateGenerator;

impl StubCertificateGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Builds a one-page PDF document around the given text lines.
fn minimal_pdf(lines: &[String]) -> Vec<u8> {
    let escaped: Vec<String> = lines
        .iter()
        .map(|l| l.replace('\\', r"\\").replace('(', r"\(").replace(')', r"\)"))
        .collect();

    let mut content = String::from("BT /F1 18 Tf 72 720 Td 28 TL\n");
    for line in &escaped {
        content.push_str(&format!("({}) Tj T*\n", line));
    }
    content.push_str("ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    pdf.into_bytes()
}

#[async_trait]
impl CertificateGenerator for StubCertificateGenerator {
    async fn generate(
        &self,
        student_name: &str,
        course_name: &str,
    ) -> Result<Vec<u8>, DomainError> {
        let lines = vec![
            "Certificado de Conclusão".to_string(),
            String::new(),
            format!("Certificamos que {}", student_name),
            format!("concluiu o curso {}.", course_name),
        ];

        Ok(minimal_pdf(&lines))
    }
}
