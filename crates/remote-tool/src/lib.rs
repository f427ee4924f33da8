//! Callable tools backed by single-operation OpenAPI schemas.
//!
//! A [`RemoteTool`] fetches an OpenAPI document, binds itself to the first
//! operation it declares and, on invocation, POSTs a JSON payload built from
//! free-text input plus named parameters to that operation.

pub mod binding;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod schema;
pub mod tool;

pub use binding::{build_payload, FirstRequiredString, InputBinder};
pub use client::{RemoteTool, RemoteToolBuilder};
pub use config::{RemoteToolConfig, DEFAULT_DESCRIPTION, DEFAULT_NAME};
pub use error::{RemoteToolError, Result};
pub use executor::RemoteToolExecutor;
pub use schema::{select_operation, BodySchema, OpenApiDocument, Operation, SelectedOperation};
pub use tool::{FunctionDefinition, Tool, ToolDefinition};
