use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::models::alert::{Alerta, EstadoAlerta};

/// Placeholder emitted when a sensor's latest measurement cannot be fetched.
pub const NO_DISPONIBLE: &str = "No disponible";

/// Enrichment outcome for one alert: either the raw measurement payload from
/// the remote store or an explicit unavailability marker. Serialized as the
/// payload itself or as the literal string `"No disponible"`.
#[derive(Debug, Clone, PartialEq)]
pub enum UltimaMedicion {
    Disponible(Value),
    NoDisponible,
}

impl Serialize for UltimaMedicion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Disponible(medicion) => medicion.serialize(serializer),
            Self::NoDisponible => serializer.serialize_str(NO_DISPONIBLE),
        }
    }
}

/// One record of the global view: the alert's display fields plus the
/// enrichment outcome, in the order alerts were listed.
#[derive(Debug, Clone, Serialize)]
pub struct AlertaGlobal {
    #[serde(rename = "sensorId")]
    pub sensor_id: Option<Uuid>,
    pub ciudad: String,
    pub pais: String,
    pub descripcion: String,
    pub severidad: String,
    #[serde(rename = "fechaAlerta")]
    pub fecha_alerta: DateTime<Utc>,
    pub fuente: String,
    pub estado: EstadoAlerta,
    #[serde(rename = "ultimaMedicion")]
    pub ultima_medicion: UltimaMedicion,
}

impl AlertaGlobal {
    pub fn from_alerta(alerta: &Alerta, ultima_medicion: UltimaMedicion) -> Self {
        Self {
            sensor_id: alerta.sensor_id,
            ciudad: alerta.ciudad.clone(),
            pais: alerta.pais.clone(),
            descripcion: alerta.descripcion.clone(),
            severidad: alerta.severidad.clone(),
            fecha_alerta: alerta.fecha,
            fuente: alerta.fuente.clone(),
            estado: alerta.estado,
            ultima_medicion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unavailable_serializes_as_marker_string() {
        let json = serde_json::to_value(UltimaMedicion::NoDisponible).unwrap();
        assert_eq!(json, json!("No disponible"));
    }

    #[test]
    fn available_serializes_as_raw_payload() {
        let payload = json!({ "temperatura": 31.5, "humedad": 60 });
        let json = serde_json::to_value(UltimaMedicion::Disponible(payload.clone())).unwrap();
        assert_eq!(json, payload);
    }
}
