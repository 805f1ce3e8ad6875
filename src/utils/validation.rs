//! Utilidades de validación
//!
//! Funciones helper para normalizar matrículas, validar campos de texto
//! y convertir timestamps almacenados.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Letras, dígitos, espacios y guiones; sin caracteres de control ni ':'
    static ref PLATE_REGEX: Regex = Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} \-]{0,19}$").unwrap();
}

/// Normaliza una matrícula: recorta espacios y pasa a mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validar formato de matrícula de vehículo (ya normalizada o no)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let plate = normalize_plate(value);
    if !PLATE_REGEX.is_match(&plate) {
        let mut error = ValidationError::new("license_plate");
        error.message = Some("Matrícula inválida".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("El campo no puede estar vacío".into());
        return Err(error);
    }
    Ok(())
}

/// Convierte un timestamp RFC 3339 almacenado; ausente o ilegible equivale a epoch 0
pub fn parse_timestamp_or_epoch(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Timestamp actual en el formato que se persiste
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  abc-123 "), "ABC-123");
        assert_eq!(normalize_plate("XYZ-001"), "XYZ-001");
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("abc-123").is_ok());
        assert!(validate_license_plate("AB 123 CD").is_ok());
        assert!(validate_license_plate("").is_err());
        assert!(validate_license_plate("AB:12").is_err());
        assert!(validate_license_plate(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Centro").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_parse_timestamp_or_epoch() {
        let parsed = parse_timestamp_or_epoch(Some("2024-03-01T10:00:00Z"));
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        assert_eq!(parse_timestamp_or_epoch(None), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_timestamp_or_epoch(Some("ayer")), DateTime::<Utc>::UNIX_EPOCH);
    }
}
