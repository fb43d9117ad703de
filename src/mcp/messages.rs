//! User-facing (Spanish) text templates for tool results.
//!
//! Every tool call resolves to exactly one of these messages, optionally
//! paired with a JSON payload. Keeping them in one place makes the wording
//! testable and consistent across tools.

use std::fmt::Display;

pub fn process_error(error: impl Display) -> String {
    format!("Error en el proceso: {error}")
}

pub fn no_answer() -> String {
    "No se recibió respuesta del asistente".to_string()
}

pub fn not_a_pdf(url: &str) -> String {
    format!("El recurso en '{url}' no es un PDF válido")
}

pub fn document_uploaded(name: &str) -> String {
    format!("Documento '{name}' subido correctamente")
}

pub fn document_deleted(name: &str) -> String {
    format!("Documento '{name}' eliminado correctamente")
}

pub fn document_not_found(name: &str) -> String {
    format!("No se encontró ningún documento llamado '{name}'")
}

pub fn documents_listed(count: usize) -> String {
    match count {
        1 => "Se encontró 1 documento".to_string(),
        n => format!("Se encontraron {n} documentos"),
    }
}

pub fn clients_listed(count: usize) -> String {
    match count {
        1 => "Se encontró 1 cliente".to_string(),
        n => format!("Se encontraron {n} clientes"),
    }
}

pub fn client_created(name: &str) -> String {
    format!("Cliente '{name}' creado correctamente")
}

pub fn client_deleted(id: u64) -> String {
    format!("Cliente {id} eliminado correctamente")
}

pub fn client_not_found(id: u64) -> String {
    format!("No se encontró el cliente con ID {id}")
}

pub fn client_has_cases(id: u64) -> String {
    format!("No se puede eliminar el cliente {id}: tiene expedientes asociados")
}

pub fn client_updated(id: u64) -> String {
    format!("Cliente {id} actualizado correctamente")
}

pub fn cases_listed(count: usize) -> String {
    match count {
        1 => "Se encontró 1 expediente".to_string(),
        n => format!("Se encontraron {n} expedientes"),
    }
}

pub fn case_created(title: &str) -> String {
    format!("Expediente '{title}' creado correctamente")
}

pub fn case_deleted(id: u64) -> String {
    format!("Expediente {id} eliminado correctamente")
}

pub fn case_not_found(id: u64) -> String {
    format!("No se encontró el expediente con ID {id}")
}

pub fn case_updated(id: u64) -> String {
    format!("Expediente {id} actualizado correctamente")
}

pub fn invalid_date(value: &str) -> String {
    format!(
        "Formato de fecha inválido: '{value}'. Usa ISO 8601, por ejemplo 2025-03-01 o 2025-03-01T10:30:00Z"
    )
}
