//! Services module
//!
//! Lógica de negocio pura (disponibilidad, reconciliación, permisos) y la
//! integración con el proveedor de identidad externo.

pub mod availability_service;
pub mod authorization_service;
pub mod identity_service;
pub mod trip_reconciliation;
