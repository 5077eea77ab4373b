//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! específicos del dominio (VIN, PIN, colores de etapa).

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de VIN (17 caracteres, sin I, O ni Q)
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    static VIN_RE: OnceLock<Regex> = OnceLock::new();
    let re = VIN_RE.get_or_init(|| {
        Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap()
    });

    let normalized = value.trim().to_uppercase();
    if !re.is_match(&normalized) {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"17 alphanumeric chars, no I/O/Q".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de PIN (4 a 8 dígitos)
pub fn validate_pin(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < 4 || len > 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        let mut error = ValidationError::new("pin");
        error.add_param("format".into(), &"4-8 digits".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar color de etapa en formato hex (#RRGGBB)
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let ok = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        let mut error = ValidationError::new("hex_color");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"#RRGGBB".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("detail").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_vin() {
        assert!(validate_vin("1GNSKCKC0FR123456").is_ok());
        // en minúsculas se normaliza antes de validar
        assert!(validate_vin("1gnskckc0fr123456").is_ok());
        // demasiado corto
        assert!(validate_vin("1GNSKCKC0FR").is_err());
        // contiene I, O, Q
        assert!(validate_vin("1GNSKCKC0FR12345I").is_err());
        assert!(validate_vin("OGNSKCKC0FR123456").is_err());
    }

    #[test]
    fn test_validate_pin() {
        assert!(validate_pin("0000").is_ok());
        assert!(validate_pin("12345678").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("123456789").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#EF4444").is_ok());
        assert!(validate_hex_color("#22c55e").is_ok());
        assert!(validate_hex_color("EF4444").is_err());
        assert!(validate_hex_color("#EF44").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }
}
