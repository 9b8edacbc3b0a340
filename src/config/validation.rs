//! Configuration validation logic.

use super::TlsConfig;

/// Validate that configured TLS files exist.
pub(super) fn validate_tls(tls: &Option<TlsConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(tls) = tls else {
        return Ok(());
    };

    if !tls.cert_path.exists() {
        return Err(format!(
            "TLS certificate file not found: {}",
            tls.cert_path.display()
        )
        .into());
    }
    if !tls.key_path.exists() {
        return Err(format!("TLS key file not found: {}", tls.key_path.display()).into());
    }

    Ok(())
}

/// The reply file name must be a bare file name inside the output directory.
pub(super) fn validate_output_file_name(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(format!(
            "Invalid audio output file name '{name}': must be a plain file name"
        )
        .into());
    }

    Ok(())
}
