//! Record types and their value codecs

pub mod attr;
pub mod column;
pub mod lifecycle;
pub mod model_type;
pub mod repr;
pub mod simple_model;

pub use attr::Attr;
pub use column::Column;
pub use lifecycle::{RecordState, SessionLink, SessionToken};
pub use model_type::ModelType;
pub use simple_model::{RowImage, SimpleModel, SimpleModelBuilder, SimpleModelView};

use crate::schema::SchemaRegistry;

/// Registry holding the schema of every record type this crate defines
pub fn default_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register::<SimpleModel>();
    registry
}
