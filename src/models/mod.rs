//! Modelos del sistema
//!
//! Este módulo contiene los registros que se persisten en el almacén
//! clave-valor y los tipos de identidad.

pub mod auth;
pub mod maintenance;
pub mod settings;
pub mod trip;
pub mod vehicle;
