//! Backend del libro de trayectos de la flota
//!
//! Trayectos, vehículos, mantenimiento y gestión de usuarios sobre un
//! almacén clave-valor (Redis) y un proveedor de identidad externo.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
