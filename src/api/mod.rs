pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod routes;
