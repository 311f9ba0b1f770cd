use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A back-office user as exposed to other modules. Credentials are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub uuid: Uuid,
    pub email: String,
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub dni: Option<String>,
    pub telefono: Option<String>,
    pub tipo: String,
    pub estado: Option<String>,
    pub intentos_fallidos: i64,
    pub bloqueado_hasta: Option<DateTime<Utc>>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Usuario {
    pub fn nombre_completo(&self) -> String {
        match &self.apellido_materno {
            Some(materno) => format!("{} {} {}", self.nombres, self.apellido_paterno, materno),
            None => format!("{} {}", self.nombres, self.apellido_paterno),
        }
    }
}
