//! User-facing texts shown when the backend gives no message of its own.

pub const SESSION_EXPIRED: &str = "Sesión expirada. Por favor, inicia sesión nuevamente.";
pub const NO_SESSION: &str = "No hay sesión activa. Por favor, inicia sesión.";
pub const CONNECTION_ERROR: &str = "Error de conexión. Intenta nuevamente.";
pub const SERVER_ERROR: &str = "Error del servidor. Intenta más tarde.";
pub const FETCH_ERROR: &str = "No se pudieron cargar los datos. Verifica tu conexión.";

pub const LOGIN_SUCCESS: &str = "Inicio de sesión exitoso";
pub const LOGIN_ERROR: &str = "Credenciales inválidas. Intenta nuevamente.";
pub const REGISTER_SUCCESS: &str = "Registro exitoso. Ahora puedes iniciar sesión.";
pub const REGISTER_ERROR: &str = "Error al registrar el usuario.";
pub const LOGOUT_SUCCESS: &str = "Sesión cerrada exitosamente";

pub const PROFILE_LOAD_ERROR: &str = "No se pudo cargar tu perfil";
pub const PROFILE_UPDATED: &str = "Perfil actualizado";
pub const PROFILE_UPDATE_ERROR: &str = "No se pudo actualizar tu perfil. Intenta nuevamente.";
pub const PASSWORD_CHANGED: &str = "Contraseña actualizada. Por favor, inicia sesión nuevamente.";
pub const PASSWORD_CHANGE_ERROR: &str = "No se pudo cambiar la contraseña. Verifica tu contraseña actual.";

pub const BOOKING_INVALID: &str = "Datos inválidos";
pub const BOOKING_NOT_FOUND: &str = "Paciente u horario no encontrado";
pub const BOOKING_CONFLICT: &str = "Este horario ya no está disponible";
pub const BOOKING_PAST: &str = "No se puede reservar en un horario pasado";
pub const BOOKING_ERROR: &str = "Error al crear la cita";
pub const BOOKING_SUCCESS: &str = "¡Cita reservada exitosamente!";
pub const DOCTORS_LOAD_ERROR: &str = "No se pudieron cargar los doctores disponibles";
pub const SLOTS_LOAD_ERROR: &str = "No se pudieron cargar los horarios disponibles";

pub const APPOINTMENTS_LOAD_ERROR: &str = "Error al cargar las citas";
pub const APPOINTMENT_CANCELLED: &str = "Cita cancelada correctamente";
pub const APPOINTMENT_CANCEL_ERROR: &str = "No se pudo cancelar la cita";

pub const DOCTOR_CREATED: &str = "Doctor registrado correctamente";
pub const DOCTOR_UPDATED: &str = "Doctor actualizado correctamente";
pub const DOCTOR_DELETED: &str = "Doctor eliminado correctamente";
pub const DOCTOR_SAVE_ERROR: &str = "Error al guardar el doctor";
pub const DOCTOR_DELETE_ERROR: &str = "Error al eliminar doctor";

pub const SPECIALTY_CREATED: &str = "Especialidad creada correctamente";
pub const SPECIALTY_UPDATED: &str = "Especialidad actualizada correctamente";
pub const SPECIALTY_DELETED: &str = "Especialidad eliminada correctamente";
pub const SPECIALTY_SAVE_ERROR: &str = "No se pudo guardar la especialidad";
pub const SPECIALTY_DELETE_ERROR: &str = "No se pudo eliminar la especialidad";

pub const SCHEDULE_CREATED: &str = "Horario creado correctamente";
pub const SCHEDULE_UPDATED: &str = "Horario actualizado correctamente";
pub const SCHEDULE_DELETED: &str = "Horario eliminado correctamente";
pub const SCHEDULE_SAVE_ERROR: &str = "Error al guardar el horario";
pub const SCHEDULE_DELETE_ERROR: &str = "Error al eliminar el horario";

pub const UPLOAD_ERROR: &str = "Error al subir imagen";
