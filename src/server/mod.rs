pub mod app;
mod deserializers;
pub mod error;
mod extractors;
pub mod routes;
