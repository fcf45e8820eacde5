//! LumaDB Adapter Module

pub mod schema_introspect;

pub use schema_introspect::{
    SchemaIntrospector, 
    TableSchema, 
    ColumnSchema, 
    ColumnType, 
    IndexSchema,
    ApiEndpoint,
    IntrospectionError,
};
