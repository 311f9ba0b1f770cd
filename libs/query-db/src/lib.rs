//! SeaORM binding for the declarative query model in `query-core`.
//!
//! An entity exposes its queryable columns through a [`FieldMap`]; the compilers
//! turn filter trees and sort specs into `sea_orm::Condition` and ordering, and the
//! two services run them against any `ConnectionTrait` handle:
//!
//! - [`ListService`]: filter, count, order, offset/limit, fetch, paginated envelope.
//! - [`SummaryService`]: group-by counts with a grand total, plus percentage breakdowns.
//!
//! # Example
//! ```rust,no_run
//! # use query_db::{FieldKind, FieldMap, ListService, QueryConfig};
//! # use query_core::ListRequest;
//! # mod user {
//! #     use sea_orm::entity::prelude::*;
//! #     #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, serde::Serialize)]
//! #     #[sea_orm(table_name = "users")]
//! #     pub struct Model {
//! #         #[sea_orm(primary_key)]
//! #         pub id: i64,
//! #         pub email: String,
//! #     }
//! #     #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
//! #     pub enum Relation {}
//! #     impl ActiveModelBehavior for ActiveModel {}
//! # }
//! # async fn run(db: &sea_orm::DatabaseConnection) -> query_core::QueryResult<()> {
//! let fields = FieldMap::<user::Entity>::new()
//!     .insert("id", user::Column::Id, FieldKind::I64)
//!     .insert("email", user::Column::Email, FieldKind::String);
//! let users = ListService::new(fields, QueryConfig::default())
//!     .with_allowed_sort_columns(["id", "email"]);
//!
//! let page = users.list(db, &ListRequest::new().page(1, 20)).await?;
//! println!("{} of {}", page.data.len(), page.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod field_map;
pub mod filter;
pub mod list;
pub mod sort;
pub mod summary;

pub use config::{ConfigError, QueryConfig};
pub use field_map::{Field, FieldKind, FieldMap};
pub use filter::{compile_filter, compile_search, field_conditions};
pub use list::ListService;
pub use sort::{compile_sort, CompiledSort, SortApplyExt};
pub use summary::SummaryService;
