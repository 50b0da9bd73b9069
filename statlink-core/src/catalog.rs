//! Localized user-facing messages.

use crate::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish.
    #[default]
    Es,
    /// English.
    En,
}

/// Unrecognized locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        // accept region-qualified tags like es-MX or en_US
        match tag.split(['-', '_']).next() {
            Some("es") => Ok(Self::Es),
            Some("en") => Ok(Self::En),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es => write!(f, "es"),
            Self::En => write!(f, "en"),
        }
    }
}

/// Messages shown to the user for each error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalog {
    /// Connectivity failure.
    pub network: String,
    /// The service took too long.
    pub timeout: String,
    /// The response could not be processed.
    pub parse: String,
    /// The uploaded data was rejected.
    pub validation: String,
    /// The file must be uploaded again.
    pub file_not_found: String,
    /// Fallback for anything else.
    pub generic: String,
    /// The request was abandoned.
    pub cancelled: String,
    /// The client is not configured.
    pub configuration: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::spanish()
    }
}

impl MessageCatalog {
    /// Spanish messages.
    pub fn spanish() -> Self {
        Self {
            network: "Error de conexión con el servicio de análisis. Verifica tu conexión e inténtalo de nuevo.".into(),
            timeout: "El análisis tardó demasiado en responder. Inténtalo de nuevo en unos momentos.".into(),
            parse: "No se pudo procesar la respuesta del servidor.".into(),
            validation: "Los datos del archivo no son válidos. Revisa los detalles e inténtalo de nuevo.".into(),
            file_not_found: "No se encontró el archivo. Vuelve a subirlo e inténtalo de nuevo.".into(),
            generic: "Ocurrió un error inesperado al realizar el análisis.".into(),
            cancelled: "La solicitud de análisis fue cancelada.".into(),
            configuration: "El servicio de análisis no está configurado correctamente.".into(),
        }
    }

    /// English messages.
    pub fn english() -> Self {
        Self {
            network: "Could not reach the analysis service. Check your connection and try again.".into(),
            timeout: "The analysis took too long to respond. Please try again in a moment.".into(),
            parse: "Could not process the server response.".into(),
            validation: "The file data is not valid. Review the details and try again.".into(),
            file_not_found: "The file could not be found. Please upload it again.".into(),
            generic: "An unexpected error occurred while running the analysis.".into(),
            cancelled: "The analysis request was cancelled.".into(),
            configuration: "The analysis service is not configured correctly.".into(),
        }
    }

    /// Catalog for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Es => Self::spanish(),
            Locale::En => Self::english(),
        }
    }

    /// Fixed message for an error kind.
    pub fn message_for(&self, kind: ErrorKind) -> &str {
        match kind {
            ErrorKind::NetworkError => &self.network,
            ErrorKind::Timeout => &self.timeout,
            ErrorKind::ParseError => &self.parse,
            ErrorKind::ValidationError => &self.validation,
            ErrorKind::FileNotFound => &self.file_not_found,
            ErrorKind::CalculationError | ErrorKind::UnknownError => &self.generic,
            ErrorKind::Cancelled => &self.cancelled,
        }
    }
}
