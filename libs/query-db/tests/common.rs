#![allow(dead_code)]

use anyhow::Result;
use chrono::{TimeZone, Utc};
use query_db::{FieldKind, FieldMap};
use sea_orm::{
    ActiveValue::Set, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema,
};

pub mod person {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "people")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
        pub estado: Option<String>,
        pub tipo: String,
        pub age: i64,
        pub score: f64,
        pub active: bool,
        pub secret: String,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub use person::{Column, Entity as People, Model as Person};

pub fn field_map() -> FieldMap<People> {
    FieldMap::<People>::new()
        .insert("id", Column::Id, FieldKind::I64)
        .insert("name", Column::Name, FieldKind::String)
        .insert("estado", Column::Estado, FieldKind::Enum)
        .insert("tipo", Column::Tipo, FieldKind::Enum)
        .insert("age", Column::Age, FieldKind::I64)
        .insert("score", Column::Score, FieldKind::F64)
        .insert("active", Column::Active, FieldKind::Bool)
        .insert("secret", Column::Secret, FieldKind::String)
        .insert("created_at", Column::CreatedAt, FieldKind::DateTimeUtc)
}

/// In-memory database without any tables.
pub async fn bare_db() -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Ok(Database::connect(opts).await?)
}

/// Fresh in-memory database with the `people` table and no rows.
pub async fn empty_db() -> Result<DatabaseConnection> {
    let db = bare_db().await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(People)))
        .await?;
    Ok(db)
}

/// `(id, name, estado, tipo, age, day of January 2024)`.
const FIXTURE: &[(i64, &str, Option<&str>, &str, i64, u32)] = &[
    (1, "Ana Torres", Some("ACTIVO"), "FUNCIONARIO", 30, 1),
    (2, "Bruno Diaz", Some("ACTIVO"), "FUNCIONARIO", 41, 2),
    (3, "Carla Ruiz", Some("ACTIVO"), "CONTRATISTA", 25, 3),
    (4, "Maria Lopez", Some("SUSPENDIDO"), "FUNCIONARIO", 52, 4),
    (5, "Maria Lopez", Some("SUSPENDIDO"), "CONTRATISTA", 38, 5),
    (6, "Maria Lopez", Some("INACTIVO"), "FUNCIONARIO", 29, 6),
    (7, "Pedro 50%_off", Some("ACTIVO"), "CONTRATISTA", 33, 7),
    (8, "Rosa Vega", None, "FUNCIONARIO", 47, 8),
    (9, "Sofia Paz", None, "CONTRATISTA", 22, 9),
    (10, "Tomas Rey", Some("ACTIVO"), "FUNCIONARIO", 60, 10),
];

/// Database seeded with ten people: estado ACTIVO×5, SUSPENDIDO×2, INACTIVO×1, NULL×2.
pub async fn seeded_db() -> Result<DatabaseConnection> {
    let db = empty_db().await?;
    let rows = FIXTURE
        .iter()
        .map(|&(id, name, estado, tipo, age, day)| person::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            estado: Set(estado.map(str::to_owned)),
            tipo: Set(tipo.to_owned()),
            age: Set(age),
            score: Set(age as f64 / 10.0),
            active: Set(id % 2 == 0),
            secret: Set(format!("hash-{id}")),
            created_at: Set(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()),
        });
    People::insert_many(rows).exec(&db).await?;
    Ok(db)
}

pub fn ids(rows: &[serde_json::Value]) -> Vec<i64> {
    rows.iter()
        .map(|r| r["id"].as_i64().expect("row id"))
        .collect()
}
