pub mod client;
pub mod columns;
pub mod error;
pub mod model;

pub use client::UsuariosApi;
pub use error::UsuariosError;
pub use model::Usuario;
