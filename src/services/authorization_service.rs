//! Servicio de autorización
//!
//! Todas las decisiones de permisos pasan por aquí. La gestión de usuarios
//! (cambio de rol, borrado) se resuelve con una única tabla de reglas en
//! `authorize_user_action`.

use crate::models::auth::{AuthenticatedUser, Role};
use crate::utils::errors::{forbidden_error, AppError, AppResult};

/// Acción de gestión sobre otro usuario (o sobre uno mismo)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ChangeRole(Role),
    Delete,
}

/// Recuento de roles en todo el sistema, necesario para algunas reglas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCensus {
    pub super_admins: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Myself,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Allow,
    Deny(&'static str),
    LastSuperAdmin,
}

/// Exige rol admin o super_admin
pub fn require_admin_tier(user: &AuthenticatedUser) -> AppResult<()> {
    if user.is_admin_tier() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Se requieren permisos de administrador".to_string()))
    }
}

/// Exige exactamente super_admin
pub fn require_super_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if user.role == Role::SuperAdmin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Se requieren permisos de super administrador".to_string()))
    }
}

/// El dueño del trayecto o un admin pueden borrarlo
pub fn can_delete_trip(user: &AuthenticatedUser, owner_id: &str) -> bool {
    user.id == owner_id || user.is_admin_tier()
}

fn verdict(
    action: UserAction,
    actor: Role,
    target: Target,
    target_role: Role,
    census: RoleCensus,
) -> Verdict {
    use Role::*;
    use Target::*;
    use UserAction::*;

    let last_super_admin = census.super_admins <= 1;

    match (action, actor, target, target_role) {
        // Bootstrap: un admin se autopromueve si todavía no existe ningún super_admin
        (ChangeRole(SuperAdmin), Admin, Myself, _) if census.super_admins == 0 => Verdict::Allow,
        (ChangeRole(SuperAdmin), SuperAdmin, Myself, _) => Verdict::Allow,
        (ChangeRole(_), SuperAdmin, Myself, _) if last_super_admin => Verdict::LastSuperAdmin,
        (ChangeRole(_), SuperAdmin, Myself, _) => Verdict::Allow,
        (ChangeRole(_), _, Myself, _) => Verdict::Deny("sólo un super administrador puede cambiar roles"),

        (ChangeRole(new_role), SuperAdmin, Other, SuperAdmin) if new_role != SuperAdmin && last_super_admin => {
            Verdict::LastSuperAdmin
        }
        (ChangeRole(_), SuperAdmin, Other, _) => Verdict::Allow,
        (ChangeRole(_), _, Other, _) => Verdict::Deny("sólo un super administrador puede cambiar roles"),

        (Delete, _, Myself, _) => Verdict::Deny("no puedes eliminar tu propia cuenta"),
        (Delete, Driver, Other, _) => Verdict::Deny("se requieren permisos de administrador"),
        (Delete, Admin, Other, Driver) => Verdict::Allow,
        (Delete, Admin, Other, _) => Verdict::Deny("un administrador sólo puede eliminar conductores"),
        (Delete, SuperAdmin, Other, SuperAdmin) if last_super_admin => Verdict::LastSuperAdmin,
        (Delete, SuperAdmin, Other, _) => Verdict::Allow,
    }
}

/// Decide si `actor` puede ejecutar `action` sobre el usuario `target_id`
pub fn authorize_user_action(
    actor: &AuthenticatedUser,
    target_id: &str,
    target_role: Role,
    action: UserAction,
    census: RoleCensus,
) -> AppResult<()> {
    let target = if actor.id == target_id { Target::Myself } else { Target::Other };

    match verdict(action, actor.role, target, target_role, census) {
        Verdict::Allow => Ok(()),
        Verdict::Deny(reason) => {
            let operation = match action {
                UserAction::ChangeRole(_) => "cambiar el rol",
                UserAction::Delete => "eliminar el usuario",
            };
            Err(forbidden_error(operation, reason))
        }
        Verdict::LastSuperAdmin => Err(AppError::Conflict(
            "Debe existir al menos un super administrador".to_string(),
        )),
    }
}
