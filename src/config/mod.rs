//! Configuración del proyecto
//!
//! Variables de entorno del servidor, del almacén y del proveedor de identidad.

pub mod environment;

pub use environment::*;
