//! Repositorios sobre el almacén clave-valor

pub mod maintenance_repository;
pub mod settings_repository;
pub mod trip_repository;
pub mod vehicle_repository;
