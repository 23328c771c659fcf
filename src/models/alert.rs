use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_TIPO: &str = "climatica";
pub const DEFAULT_DESCRIPCION: &str = "Alerta generada";
pub const DEFAULT_SEVERIDAD: &str = "media";
pub const DEFAULT_CIUDAD: &str = "Desconocida";
pub const DEFAULT_PAIS: &str = "Desconocido";
pub const FUENTE_MANUAL: &str = "manual";

/// Lifecycle state of an alert. The only transition is ACTIVA -> RESUELTA;
/// a resolved alert never becomes active again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoAlerta {
    #[serde(rename = "ACTIVA")]
    Activa,
    #[serde(rename = "RESUELTA")]
    Resuelta,
}

impl EstadoAlerta {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activa => "ACTIVA",
            Self::Resuelta => "RESUELTA",
        }
    }
}

impl fmt::Display for EstadoAlerta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoAlerta {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVA" => Ok(Self::Activa),
            "RESUELTA" => Ok(Self::Resuelta),
            other => Err(format!("estado desconocido: '{}'", other)),
        }
    }
}

/// An alert record. `sensor_id` is a weak reference to a sensor owned by a
/// different store; it is never validated against that store, and `detalles`
/// is an opaque map passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alerta {
    pub id: Uuid,
    #[serde(rename = "sensorId")]
    pub sensor_id: Option<Uuid>,
    pub tipo: String,
    pub descripcion: String,
    pub severidad: String,
    pub ciudad: String,
    pub pais: String,
    pub detalles: Value,
    pub fecha: DateTime<Utc>,
    pub fuente: String,
    pub estado: EstadoAlerta,
}

/// Creation payload for `POST /alerts`. Every field is optional; `sensor_id`
/// arrives as a raw string and is validated by the lifecycle manager rather
/// than coerced silently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NuevaAlerta {
    pub tipo: Option<String>,
    pub descripcion: Option<String>,
    pub ciudad: Option<String>,
    pub pais: Option<String>,
    #[serde(rename = "sensorId")]
    pub sensor_id: Option<String>,
    pub detalles: Option<Value>,
}
