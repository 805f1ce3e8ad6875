//! Controladores
//!
//! Cada controlador agrupa los repositorios que necesita y aplica las
//! reglas de negocio. Las rutas los construyen por request a partir del
//! estado compartido.

pub mod auth_controller;
pub mod maintenance_controller;
pub mod settings_controller;
pub mod trip_controller;
pub mod user_controller;
pub mod vehicle_controller;
