pub mod entity;
pub mod field_map;
pub mod sea_orm_repo;

pub use sea_orm_repo::SeaOrmUsuariosRepository;
