#![allow(dead_code)]

use anyhow::Result;
use chrono::{TimeZone, Utc};
use runtime::{connect, DatabaseConfig};
use sea_orm::{ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use uuid::Uuid;

use usuarios::infra::storage::entity::{ActiveModel, Entity as UsuarioEntity};

/// `(id, nombres, apellido_paterno, apellido_materno, dni, tipo, estado)`;
/// usuario `n` was created on 2024-03-0n.
const FIXTURE: &[(
    i64,
    &str,
    &str,
    Option<&str>,
    Option<&str>,
    &str,
    Option<&str>,
)] = &[
    (1, "Ana", "Torres", Some("Ruiz"), Some("10000001"), "ADMINISTRADOR", Some("ACTIVO")),
    (2, "Bruno", "Diaz", None, Some("10000002"), "OPERADOR", Some("ACTIVO")),
    (3, "Carla", "Ruiz", Some("Vega"), None, "OPERADOR", Some("BLOQUEADO")),
    (4, "Diego", "Ramos", Some("Ruiz"), Some("10000004"), "OPERADOR", Some("INACTIVO")),
    (5, "Elena", "Soto", None, Some("10000005"), "ADMINISTRADOR", Some("ACTIVO")),
    (6, "Fabio", "Quispe", Some("Mamani"), Some("10000006"), "SUPERVISOR", None),
];

pub fn uuid_of(id: i64) -> Uuid {
    Uuid::from_u128(0x5500_0000_0000_0000_0000_0000_0000_0000 + id as u128)
}

pub async fn usuarios_db() -> Result<DatabaseConnection> {
    let db = connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_conns: None,
        log_statements: false,
    })
    .await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(UsuarioEntity)))
        .await?;

    let rows = FIXTURE.iter().map(
        |&(id, nombres, paterno, materno, dni, tipo, estado)| {
            let creado = Utc.with_ymd_and_hms(2024, 3, id as u32, 9, 0, 0).unwrap();
            ActiveModel {
                id: Set(id),
                uuid: Set(uuid_of(id)),
                email: Set(format!("{}@example.pe", nombres.to_lowercase())),
                password_hash: Set(format!("$argon2id$v=19$hash{id}")),
                nombres: Set(nombres.to_owned()),
                apellido_paterno: Set(paterno.to_owned()),
                apellido_materno: Set(materno.map(str::to_owned)),
                dni: Set(dni.map(str::to_owned)),
                telefono: Set(None),
                tipo: Set(tipo.to_owned()),
                estado: Set(estado.map(str::to_owned)),
                intentos_fallidos: Set(if id == 3 { 5 } else { 0 }),
                bloqueado_hasta: Set(None),
                ultimo_acceso: Set(None),
                fecha_creacion: Set(creado),
                fecha_actualizacion: Set(creado),
            }
        },
    );
    UsuarioEntity::insert_many(rows).exec(&db).await?;
    Ok(db)
}
