//! Column policy for `usuarios` queries.

/// Columns a client may order by. Everything except `password_hash`.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "uuid",
    "email",
    "nombres",
    "apellido_paterno",
    "apellido_materno",
    "dni",
    "telefono",
    "tipo",
    "estado",
    "intentos_fallidos",
    "bloqueado_hasta",
    "ultimo_acceso",
    "fecha_creacion",
    "fecha_actualizacion",
];

/// Columns a summary may group by.
pub const GROUPABLE_COLUMNS: &[&str] = &["estado", "tipo", "fecha_creacion"];

/// Never returned in list rows.
pub const EXCLUDED_FIELDS: &[&str] = &["password_hash"];

/// Matched by the free-text `search` term.
pub const SEARCH_FIELDS: &[&str] = &[
    "nombres",
    "apellido_paterno",
    "apellido_materno",
    "email",
    "dni",
];
