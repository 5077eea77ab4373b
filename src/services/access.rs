//! Filtro de acceso por rol
//!
//! Predicado único para decidir si un usuario puede ver/editar el campo
//! de completado de una etapa. Regla plana: "Manager" ve todo, el resto
//! solo las etapas de su rol. Sin reglas negativas ni jerarquías.

use crate::models::stage::PipelineStage;

/// Rol con visibilidad total sobre el pipeline
pub const MANAGER_ROLE: &str = "Manager";

/// True si el conjunto de roles del usuario incluye "Manager" o el rol
/// requerido por la etapa.
pub fn can_access_stage(user_roles: &[String], stage: &PipelineStage) -> bool {
    user_roles
        .iter()
        .any(|role| role == MANAGER_ROLE || role == &stage.role)
}

/// True si el usuario tiene el rol Manager
pub fn is_manager(user_roles: &[String]) -> bool {
    user_roles.iter().any(|role| role == MANAGER_ROLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stage::CompletionKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn stage_for_role(role: &str) -> PipelineStage {
        PipelineStage {
            id: Uuid::new_v4(),
            dealership_id: Uuid::nil(),
            order_num: 1,
            stage_name: "Awaiting Service".to_string(),
            role: role.to_string(),
            completion_field: "Service Advisor".to_string(),
            completion_type: CompletionKind::Dropdown,
            list_name: Some("Advisors".to_string()),
            target_hours: Some(8),
            stage_color: "#EAB308".to_string(),
            is_terminal: false,
            created_at: Utc::now(),
        }
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn matching_role_grants_access() {
        let stage = stage_for_role("Service");
        assert!(can_access_stage(&roles(&["Service"]), &stage));
    }

    #[test]
    fn non_matching_role_is_denied() {
        let stage = stage_for_role("Service");
        assert!(!can_access_stage(&roles(&["Sales"]), &stage));
    }

    #[test]
    fn manager_accesses_any_stage() {
        for role in ["Manager", "Service", "Detail", "Sales"] {
            assert!(can_access_stage(&roles(&["Manager"]), &stage_for_role(role)));
        }
    }

    #[test]
    fn any_role_in_the_set_is_enough() {
        let stage = stage_for_role("Detail");
        assert!(can_access_stage(&roles(&["Sales", "Detail"]), &stage));
    }

    #[test]
    fn empty_role_set_is_denied() {
        let stage = stage_for_role("Service");
        assert!(!can_access_stage(&[], &stage));
    }

    #[test]
    fn is_manager_checks_the_flat_role() {
        assert!(is_manager(&roles(&["Sales", "Manager"])));
        assert!(!is_manager(&roles(&["Sales"])));
    }
}
