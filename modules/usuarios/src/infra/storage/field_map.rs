use query_db::{FieldKind, FieldMap};

use super::entity::{Column, Entity};

/// Every queryable `usuarios` column under its API name.
///
/// `password_hash` is hidden: any filter, search, sort or group on it is
/// reported as forbidden rather than unknown, and it is never returned.
pub fn usuario_fields() -> FieldMap<Entity> {
    FieldMap::new()
        .insert("id", Column::Id, FieldKind::I64)
        .insert("uuid", Column::Uuid, FieldKind::Uuid)
        .insert("email", Column::Email, FieldKind::String)
        .insert_hidden("password_hash", Column::PasswordHash, FieldKind::String)
        .insert("nombres", Column::Nombres, FieldKind::String)
        .insert("apellido_paterno", Column::ApellidoPaterno, FieldKind::String)
        .insert("apellido_materno", Column::ApellidoMaterno, FieldKind::String)
        .insert("dni", Column::Dni, FieldKind::String)
        .insert("telefono", Column::Telefono, FieldKind::String)
        .insert("tipo", Column::Tipo, FieldKind::Enum)
        .insert("estado", Column::Estado, FieldKind::Enum)
        .insert("intentos_fallidos", Column::IntentosFallidos, FieldKind::I64)
        .insert("bloqueado_hasta", Column::BloqueadoHasta, FieldKind::DateTimeUtc)
        .insert("ultimo_acceso", Column::UltimoAcceso, FieldKind::DateTimeUtc)
        .insert("fecha_creacion", Column::FechaCreacion, FieldKind::DateTimeUtc)
        .insert(
            "fecha_actualizacion",
            Column::FechaActualizacion,
            FieldKind::DateTimeUtc,
        )
}
