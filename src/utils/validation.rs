//! Validaciones comunes de entrada
//!
//! Este módulo contiene validaciones de formato que se usan en varios
//! controllers: matrículas, códigos de remolque y rangos de fechas.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    /// Matrícula: alfanumérico con guiones o espacios internos, 5-20 caracteres
    static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9\- ]{3,18}[A-Z0-9]$").unwrap();
}

/// Normalizar una matrícula antes de validar o guardar
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Validar el formato de una matrícula (vehículo o remolque)
pub fn validate_license_plate(plate: &str) -> AppResult<String> {
    let normalized = normalize_plate(plate);
    if normalized.is_empty() {
        return Err(AppError::BadRequest("La matrícula es requerida".to_string()));
    }
    if !PLATE_REGEX.is_match(&normalized) {
        return Err(AppError::BadRequest(format!(
            "Formato de matrícula inválido: '{}'",
            plate
        )));
    }
    Ok(normalized)
}

/// Validar un rango de fechas inclusivo. Un fin ausente es válido
/// (viaje abierto); un fin anterior al inicio no lo es.
pub fn validate_date_range(start: NaiveDate, end: Option<NaiveDate>) -> AppResult<()> {
    if let Some(end) = end {
        if end < start {
            return Err(AppError::BadRequest(format!(
                "La fecha de fin ({}) no puede ser anterior a la fecha de inicio ({})",
                end, start
            )));
        }
    }
    Ok(())
}
