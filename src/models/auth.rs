use serde::{Deserialize, Serialize};

/// Roles del sistema, ordenados de menor a mayor privilegio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Driver,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "driver" => Some(Role::Driver),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Rol leído de metadatos externos; desconocido o ausente equivale a driver
    pub fn from_metadata(value: Option<&str>) -> Self {
        value.and_then(Role::from_str).unwrap_or(Role::Driver)
    }

    /// admin o super_admin
    pub fn is_admin_tier(&self) -> bool {
        *self >= Role::Admin
    }
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl AuthenticatedUser {
    pub fn is_admin_tier(&self) -> bool {
        self.role.is_admin_tier()
    }
}

/// Usuario tal como lo expone el proveedor de identidad (listados de admin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Driver < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
        assert!(!Role::Driver.is_admin_tier());
        assert!(Role::Admin.is_admin_tier());
        assert!(Role::SuperAdmin.is_admin_tier());
    }

    #[test]
    fn test_role_from_metadata_defaults_to_driver() {
        assert_eq!(Role::from_metadata(Some("super_admin")), Role::SuperAdmin);
        assert_eq!(Role::from_metadata(Some("root")), Role::Driver);
        assert_eq!(Role::from_metadata(None), Role::Driver);
    }

    #[test]
    fn test_role_serde_round_trip_names() {
        assert_eq!(serde_json::to_value(Role::SuperAdmin).unwrap(), "super_admin");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
