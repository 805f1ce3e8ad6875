//! DTOs de la API
//!
//! Requests y responses HTTP. Los campos obligatorios son `Option` para que
//! su ausencia se reporte como error de validación (400).

pub mod auth_dto;
pub mod common_dto;
pub mod maintenance_dto;
pub mod trip_dto;
pub mod vehicle_dto;
