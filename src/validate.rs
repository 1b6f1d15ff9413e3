//! Client-side validation. Runs before any request is sent; a failure never
//! reaches the network.

use time::macros::format_description;
use time::{Date, Time};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

pub type Validation = Result<(), ValidationError>;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 3;
pub const DNI_LEN: usize = 8;
pub const PHONE_LEN: usize = 9;
pub const MAX_DOCTOR_CAPACITY: u32 = 50;

// =============================================================================
// FIELDS
// =============================================================================

/// Fails with the shared "complete every field" text when any value is blank.
///
/// # Errors
///
/// Returns the first blank field.
pub fn required(fields: &[(&'static str, &str)]) -> Validation {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(ValidationError::new(*field,"Por favor completa todos los campos.")),
        None => Ok(()),
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
///
/// # Errors
///
/// Returns an error if `email` is not shaped like an address.
pub fn email(email: &str) -> Validation {
    let invalid = || ValidationError::new("email", "El correo ingresado no es válido.");
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// # Errors
///
/// Returns an error unless `dni` is exactly eight digits.
pub fn dni(dni: &str) -> Validation {
    if all_digits(dni.trim(), DNI_LEN) {
        Ok(())
    } else {
        Err(ValidationError::new("dni", "El DNI debe contener exactamente 8 dígitos numéricos."))
    }
}

/// # Errors
///
/// Returns an error unless `phone` is exactly nine digits.
pub fn phone(phone: &str) -> Validation {
    if all_digits(phone.trim(), PHONE_LEN) {
        Ok(())
    } else {
        Err(ValidationError::new("telefono", "El número telefónico debe contener 9 dígitos."))
    }
}

/// # Errors
///
/// Returns an error if `password` is shorter than six characters.
pub fn password(password: &str) -> Validation {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ValidationError::new("password", "La contraseña debe tener al menos 6 caracteres"))
    }
}

/// # Errors
///
/// Returns an error if the trimmed name is shorter than three characters.
pub fn name(name: &str) -> Validation {
    if name.trim().chars().count() >= MIN_NAME_LEN {
        Ok(())
    } else {
        Err(ValidationError::new("nombre", "El nombre debe tener al menos 3 caracteres"))
    }
}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// DATES
// =============================================================================

/// Parse a `YYYY-MM-DD` wire date.
///
/// # Errors
///
/// Returns an error if `raw` is not a calendar date.
pub fn parse_date(raw: &str) -> Result<Date, ValidationError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::new("fecha", "Fecha inválida"))
}

/// Parse `HH:MM` or `HH:MM:SS`.
///
/// # Errors
///
/// Returns an error if `raw` is not a time of day.
pub fn parse_time(raw: &str) -> Result<Time, ValidationError> {
    let raw = raw.trim();
    Time::parse(raw, format_description!("[hour]:[minute]:[second]"))
        .or_else(|_| Time::parse(raw, format_description!("[hour]:[minute]")))
        .map_err(|_| ValidationError::new("hora", "Hora inválida"))
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub dni: String,
    pub phone: String,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Returns the first failing rule: required fields, email, DNI, phone,
    /// password.
    pub fn validate(&self) -> Validation {
        required(&[
            ("nombre", &self.name),
            ("email", &self.email),
            ("password", &self.password),
            ("dni", &self.dni),
            ("telefono", &self.phone),
        ])?;
        email(&self.email)?;
        dni(&self.dni)?;
        phone(&self.phone)?;
        password(&self.password)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChangeForm {
    /// # Errors
    ///
    /// Returns an error if a field is blank, the new password is too short,
    /// the confirmation differs, or the new password equals the current one.
    pub fn validate(&self) -> Validation {
        if self.current.trim().is_empty() {
            return Err(ValidationError::new("passwordActual", "Ingresa tu contraseña actual"));
        }
        if self.new.trim().is_empty() {
            return Err(ValidationError::new("passwordNueva", "Ingresa una nueva contraseña"));
        }
        password(&self.new).map_err(|e| ValidationError { field: "passwordNueva", ..e })?;
        if self.new != self.confirm {
            return Err(ValidationError::new("passwordConfirmar", "Las contraseñas no coinciden"));
        }
        if self.new == self.current {
            return Err(ValidationError::new("passwordNueva", "La nueva contraseña debe ser diferente a la actual"));
        }
        Ok(())
    }
}

/// Validate the admin doctor form and return the parsed capacity.
///
/// # Errors
///
/// Returns an error for a short name, a missing specialty, or a capacity
/// outside `1..=50`.
pub fn doctor_form(name_value: &str, specialty: &str, capacity: &str) -> Result<u32, ValidationError> {
    if name_value.trim().is_empty() {
        return Err(ValidationError::new("nombre", "El nombre es obligatorio"));
    }
    name(name_value)?;
    if specialty.trim().is_empty() {
        return Err(ValidationError::new("especialidad", "Debes seleccionar una especialidad"));
    }
    match capacity.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_DOCTOR_CAPACITY).contains(&n) => Ok(n),
        _ => Err(ValidationError::new("cupoPacientes", "El cupo debe ser un número entre 1 y 50")),
    }
}

/// # Errors
///
/// Returns an error if the specialty name is shorter than three characters.
pub fn specialty_form(name_value: &str) -> Validation {
    name(name_value).map_err(|_| ValidationError::new("nombre", "El nombre de la especialidad debe tener al menos 3 caracteres"))
}

/// Validate a schedule entry; returns the parsed date and times.
///
/// # Errors
///
/// Returns an error for an unparseable date or time, or when the start is
/// not before the end.
pub fn schedule_form(date: &str, start: &str, end: &str) -> Result<(Date, Time, Time), ValidationError> {
    required(&[("fecha", date), ("horaInicio", start), ("horaFin", end)])?;
    let date = parse_date(date)?;
    let start = parse_time(start).map_err(|e| ValidationError { field: "horaInicio", ..e })?;
    let end = parse_time(end).map_err(|e| ValidationError { field: "horaFin", ..e })?;
    if start >= end {
        return Err(ValidationError::new("horaFin", "La hora de fin debe ser posterior a la de inicio"));
    }
    Ok((date, start, end))
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
