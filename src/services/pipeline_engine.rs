//! Motor de estado del pipeline
//!
//! Funciones puras que derivan el estado de cada vehículo a partir del
//! catálogo de etapas y sus completados. Nada de esto toca la base de
//! datos: el reloj (`now`) se inyecta y el mismo input produce siempre
//! el mismo output.
//!
//! Reglas principales:
//! - La etapa actual de un vehículo es la primera etapa, en orden
//!   ascendente de `order_num`, cuyo completado falta o no está
//!   satisfecho. Si todas están satisfechas, la etapa actual es la
//!   primera marcada `is_terminal`; sin etapa terminal configurada el
//!   estado es el centinela "Pending".
//! - Las etapas se comparan siempre por `id`, nunca por nombre.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::completion::StageCompletion;
use crate::models::stage::PipelineStage;
use crate::models::vehicle::Vehicle;
use crate::services::access;

/// Centinela para vehículos sin etapa resoluble
pub const PENDING_STATUS: &str = "Pending";

/// Etapas ordenadas ascendentemente por `order_num`
pub fn ordered_stages(stages: &[PipelineStage]) -> Vec<&PipelineStage> {
    let mut sorted: Vec<&PipelineStage> = stages.iter().collect();
    sorted.sort_by_key(|s| s.order_num);
    sorted
}

/// Resolver la etapa actual de un vehículo.
///
/// `None` significa que no hay etapa resoluble (todas satisfechas y sin
/// etapa terminal configurada, o catálogo vacío): el centinela "Pending".
pub fn current_stage<'a>(
    vehicle_id: Uuid,
    stages: &'a [PipelineStage],
    completions: &[StageCompletion],
) -> Option<&'a PipelineStage> {
    let sorted = ordered_stages(stages);

    for &stage in &sorted {
        let completion = completions
            .iter()
            .find(|c| c.vehicle_id == vehicle_id && c.stage_id == stage.id);

        match completion {
            Some(c) if c.is_satisfied() => continue,
            _ => return Some(stage),
        }
    }

    // Todas satisfechas: la primera etapa terminal en orden de iteración.
    // Con más de una terminal configurada gana la de menor order_num.
    sorted.into_iter().find(|s| s.is_terminal)
}

/// Nombre del estado actual, con centinela para el caso sin etapa
pub fn current_status_name(
    vehicle_id: Uuid,
    stages: &[PipelineStage],
    completions: &[StageCompletion],
) -> String {
    current_stage(vehicle_id, stages, completions)
        .map(|s| s.stage_name.clone())
        .unwrap_or_else(|| PENDING_STATUS.to_string())
}

/// Edad del vehículo en días completos desde su entrada al sistema.
/// Nunca negativa: un desfase de reloj se trunca a 0.
pub fn age_in_days(vehicle: &Vehicle, now: DateTime<Utc>) -> i64 {
    (now - vehicle.in_system_date).num_days().max(0)
}

/// SLA: un vehículo excede el objetivo de su etapa cuando su edad en
/// días supera estrictamente `target_hours / 24` (división entera, tal
/// cual la regla de facto del sistema). Sin `target_hours` no hay SLA.
pub fn is_overdue(vehicle: &Vehicle, stage: &PipelineStage, now: DateTime<Utc>) -> bool {
    match stage.target_hours {
        Some(target_hours) => age_in_days(vehicle, now) > i64::from(target_hours / 24),
        None => false,
    }
}

/// Cumplimiento de SLA de toda la flota, como porcentaje [0, 100].
/// Solo cuenta vehículos no archivados; con flota vacía devuelve 100.
pub fn fleet_sla_compliance(
    vehicles: &[Vehicle],
    stages: &[PipelineStage],
    completions: &[StageCompletion],
    now: DateTime<Utc>,
) -> u32 {
    let active: Vec<&Vehicle> = vehicles.iter().filter(|v| !v.archived).collect();
    if active.is_empty() {
        return 100;
    }

    let on_time = active
        .iter()
        .filter(|v| match current_stage(v.id, stages, completions) {
            Some(stage) => !is_overdue(v, stage, now),
            // Sin etapa resoluble no hay SLA que incumplir
            None => true,
        })
        .count();

    ((on_time as f64 / active.len() as f64) * 100.0).round() as u32
}

/// Métricas agregadas de una etapa del pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct StageMetrics {
    pub stage_id: Uuid,
    pub stage_name: String,
    pub stage_color: String,
    pub count: usize,
    pub avg_age_days: i64,
    pub overdue_count: usize,
}

/// Particionar la flota activa por etapa actual (por `id`) y agregar
/// conteo, edad media y vehículos fuera de SLA por etapa, en orden
/// ascendente del pipeline.
pub fn stage_metrics(
    vehicles: &[Vehicle],
    stages: &[PipelineStage],
    completions: &[StageCompletion],
    now: DateTime<Utc>,
) -> Vec<StageMetrics> {
    let resolved: Vec<(&Vehicle, Option<&PipelineStage>)> = vehicles
        .iter()
        .filter(|v| !v.archived)
        .map(|v| (v, current_stage(v.id, stages, completions)))
        .collect();

    ordered_stages(stages)
        .into_iter()
        .map(|stage| {
            let bucket: Vec<&Vehicle> = resolved
                .iter()
                .filter(|(_, current)| current.map_or(false, |c| c.id == stage.id))
                .map(|(v, _)| *v)
                .collect();

            let avg_age_days = if bucket.is_empty() {
                0
            } else {
                let total: i64 = bucket.iter().map(|v| age_in_days(v, now)).sum();
                (total as f64 / bucket.len() as f64).round() as i64
            };

            StageMetrics {
                stage_id: stage.id,
                stage_name: stage.stage_name.clone(),
                stage_color: stage.stage_color.clone(),
                count: bucket.len(),
                avg_age_days,
                overdue_count: bucket.iter().filter(|v| is_overdue(v, stage, now)).count(),
            }
        })
        .collect()
}

/// Conteo de vehículos activos cuya etapa actual es visible para un rol
pub fn role_workload(
    role: &str,
    vehicles: &[Vehicle],
    stages: &[PipelineStage],
    completions: &[StageCompletion],
) -> usize {
    let roles = [role.to_string()];
    vehicles
        .iter()
        .filter(|v| !v.archived)
        .filter(|v| {
            current_stage(v.id, stages, completions)
                .map_or(false, |stage| access::can_access_stage(&roles, stage))
        })
        .count()
}

/// Distribución de la flota activa por antigüedad: 0-3, 4-7, 8-14 y 15+ días
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgingBuckets {
    pub zero_to_three: usize,
    pub four_to_seven: usize,
    pub eight_to_fourteen: usize,
    pub fifteen_plus: usize,
}

pub fn aging_buckets(vehicles: &[Vehicle], now: DateTime<Utc>) -> AgingBuckets {
    let mut buckets = AgingBuckets::default();
    for vehicle in vehicles.iter().filter(|v| !v.archived) {
        match age_in_days(vehicle, now) {
            0..=3 => buckets.zero_to_three += 1,
            4..=7 => buckets.four_to_seven += 1,
            8..=14 => buckets.eight_to_fourteen += 1,
            _ => buckets.fifteen_plus += 1,
        }
    }
    buckets
}

/// Transición planificada para un completado de etapa.
///
/// `apply` es un helper puro de transición de estado: decide qué hay que
/// persistir sin tocar la base de datos. Quien llama es responsable del
/// control de acceso previo y de ejecutar la transición.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionTransition {
    /// Crear o sobreescribir el registro vivo
    Complete {
        value: String,
        completed_by: String,
        completed_at: DateTime<Utc>,
    },
    /// Anular value/completed_by/completed_at y estampar cleared_at.
    /// Nunca se borra la fila: el historial se preserva.
    Clear { cleared_at: DateTime<Utc> },
    /// Valor vacío sin registro previo: nada que limpiar
    Noop,
}

pub fn plan_completion_transition(
    existing: Option<&StageCompletion>,
    new_value: &str,
    user_name: &str,
    now: DateTime<Utc>,
) -> CompletionTransition {
    if !new_value.is_empty() {
        CompletionTransition::Complete {
            value: new_value.to_string(),
            completed_by: user_name.to_string(),
            completed_at: now,
        }
    } else if existing.is_some() {
        CompletionTransition::Clear { cleared_at: now }
    } else {
        CompletionTransition::Noop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stage::CompletionKind;
    use chrono::Duration;

    fn stage(order: i32, name: &str, role: &str, target_hours: Option<i32>, terminal: bool) -> PipelineStage {
        PipelineStage {
            id: Uuid::new_v4(),
            dealership_id: Uuid::nil(),
            order_num: order,
            stage_name: name.to_string(),
            role: role.to_string(),
            completion_field: name.to_string(),
            completion_type: CompletionKind::Checkbox,
            list_name: None,
            target_hours,
            stage_color: "#6B7280".to_string(),
            is_terminal: terminal,
            created_at: Utc::now(),
        }
    }

    fn vehicle(age_days: i64, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            dealership_id: Uuid::nil(),
            stock_num: Some("R1770526".to_string()),
            year: Some("2021".to_string()),
            make: Some("Chevrolet".to_string()),
            model: Some("Equinox".to_string()),
            vin: None,
            in_system_date: now - Duration::days(age_days),
            notes: String::new(),
            ro_num: None,
            estimate: None,
            actual: None,
            archived: false,
            created_at: now - Duration::days(age_days),
            updated_at: now - Duration::days(age_days),
        }
    }

    fn satisfied(vehicle_id: Uuid, stage_id: Uuid, value: &str) -> StageCompletion {
        StageCompletion {
            id: Uuid::new_v4(),
            vehicle_id,
            stage_id,
            completion_value: Some(value.to_string()),
            completed_by: Some("Admin".to_string()),
            completed_at: Some(Utc::now()),
            cleared_at: None,
        }
    }

    fn three_stage_pipeline() -> Vec<PipelineStage> {
        vec![
            stage(1, "Intake", "Manager", Some(24), false),
            stage(2, "Detail", "Detail", Some(4), false),
            stage(3, "Ready", "Sales", None, true),
        ]
    }

    #[test]
    fn vehicle_without_completions_is_at_first_stage() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let v = vehicle(0, now);

        let current = current_stage(v.id, &stages, &[]).unwrap();
        assert_eq!(current.stage_name, "Intake");
    }

    #[test]
    fn current_stage_is_deterministic() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let v = vehicle(2, now);
        let completions = vec![satisfied(v.id, stages[0].id, "done")];

        let first = current_stage(v.id, &stages, &completions).map(|s| s.id);
        for _ in 0..5 {
            assert_eq!(current_stage(v.id, &stages, &completions).map(|s| s.id), first);
        }
    }

    #[test]
    fn stage_order_wins_over_input_order() {
        let now = Utc::now();
        // catálogo desordenado a propósito
        let mut stages = three_stage_pipeline();
        stages.reverse();
        let v = vehicle(0, now);

        let current = current_stage(v.id, &stages, &[]).unwrap();
        assert_eq!(current.stage_name, "Intake");
    }

    #[test]
    fn cleared_completion_does_not_satisfy() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let v = vehicle(0, now);
        let mut completion = satisfied(v.id, stages[0].id, "done");
        completion.completion_value = None;
        completion.completed_at = None;
        completion.cleared_at = Some(now);

        let current = current_stage(v.id, &stages, &[completion]).unwrap();
        assert_eq!(current.stage_name, "Intake");
    }

    #[test]
    fn empty_value_does_not_satisfy() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let v = vehicle(0, now);
        let completion = satisfied(v.id, stages[0].id, "");

        let current = current_stage(v.id, &stages, &[completion]).unwrap();
        assert_eq!(current.stage_name, "Intake");
    }

    #[test]
    fn all_satisfied_resolves_to_terminal_stage() {
        let now = Utc::now();
        // la terminal no es la última en orden
        let stages = vec![
            stage(1, "A", "Manager", Some(24), false),
            stage(2, "B", "Service", Some(24), true),
        ];
        let v = vehicle(1, now);
        let completions = vec![
            satisfied(v.id, stages[0].id, "ok"),
            satisfied(v.id, stages[1].id, "ok"),
        ];

        let current = current_stage(v.id, &stages, &completions).unwrap();
        assert_eq!(current.stage_name, "B");
    }

    #[test]
    fn multiple_terminals_tie_break_on_lowest_order() {
        let now = Utc::now();
        let stages = vec![
            stage(1, "A", "Manager", None, false),
            stage(2, "T1", "Sales", None, true),
            stage(3, "T2", "Sales", None, true),
        ];
        let v = vehicle(0, now);
        let completions: Vec<StageCompletion> = stages
            .iter()
            .map(|s| satisfied(v.id, s.id, "ok"))
            .collect();

        let current = current_stage(v.id, &stages, &completions).unwrap();
        assert_eq!(current.stage_name, "T1");
    }

    #[test]
    fn no_terminal_configured_yields_pending_sentinel() {
        let now = Utc::now();
        let stages = vec![stage(1, "A", "Manager", None, false)];
        let v = vehicle(0, now);
        let completions = vec![satisfied(v.id, stages[0].id, "ok")];

        assert!(current_stage(v.id, &stages, &completions).is_none());
        assert_eq!(
            current_status_name(v.id, &stages, &completions),
            PENDING_STATUS
        );
    }

    #[test]
    fn completion_of_another_vehicle_is_ignored() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let v = vehicle(0, now);
        let other = vehicle(0, now);
        let completions = vec![satisfied(other.id, stages[0].id, "ok")];

        let current = current_stage(v.id, &stages, &completions).unwrap();
        assert_eq!(current.stage_name, "Intake");
    }

    #[test]
    fn age_clamps_negative_clock_skew_to_zero() {
        let now = Utc::now();
        let mut v = vehicle(0, now);
        v.in_system_date = now + Duration::hours(6);
        assert_eq!(age_in_days(&v, now), 0);
    }

    #[test]
    fn age_floors_partial_days() {
        let now = Utc::now();
        let mut v = vehicle(0, now);
        v.in_system_date = now - Duration::hours(47);
        assert_eq!(age_in_days(&v, now), 1);
    }

    #[test]
    fn overdue_boundary_is_strict() {
        let now = Utc::now();
        let s = stage(1, "Detail", "Detail", Some(24), false);

        // exactamente 1 día con objetivo de 24h: dentro de SLA
        assert!(!is_overdue(&vehicle(1, now), &s, now));
        // 2 días: fuera
        assert!(is_overdue(&vehicle(2, now), &s, now));
    }

    #[test]
    fn overdue_truncates_hours_to_days() {
        let now = Utc::now();
        // 36h / 24 = 1 día por división entera
        let s = stage(1, "Service", "Service", Some(36), false);
        assert!(!is_overdue(&vehicle(1, now), &s, now));
        assert!(is_overdue(&vehicle(2, now), &s, now));
    }

    #[test]
    fn no_target_hours_means_never_overdue() {
        let now = Utc::now();
        let s = stage(1, "Ready", "Sales", None, true);
        assert!(!is_overdue(&vehicle(30, now), &s, now));
    }

    #[test]
    fn sla_compliance_of_empty_fleet_is_100() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        assert_eq!(fleet_sla_compliance(&[], &stages, &[], now), 100);
    }

    #[test]
    fn sla_compliance_ignores_archived_vehicles() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        // atascado en Intake (24h) desde hace 10 días
        let mut overdue_vehicle = vehicle(10, now);
        overdue_vehicle.archived = true;
        let on_time_vehicle = vehicle(0, now);
        let vehicles = vec![overdue_vehicle, on_time_vehicle];

        assert_eq!(fleet_sla_compliance(&vehicles, &stages, &[], now), 100);
    }

    #[test]
    fn sla_compliance_rounds_percentage() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let vehicles = vec![vehicle(0, now), vehicle(0, now), vehicle(10, now)];

        // 2 de 3 en SLA -> 66.67 -> 67
        assert_eq!(fleet_sla_compliance(&vehicles, &stages, &[], now), 67);
    }

    #[test]
    fn stage_metrics_partitions_by_current_stage_id() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let at_intake = vehicle(2, now);
        let at_detail = vehicle(6, now);
        let completions = vec![satisfied(at_detail.id, stages[0].id, "done")];
        let vehicles = vec![at_intake.clone(), at_detail.clone()];

        let metrics = stage_metrics(&vehicles, &stages, &completions, now);
        assert_eq!(metrics.len(), 3);

        assert_eq!(metrics[0].stage_name, "Intake");
        assert_eq!(metrics[0].count, 1);
        assert_eq!(metrics[0].avg_age_days, 2);
        assert_eq!(metrics[0].overdue_count, 1);

        assert_eq!(metrics[1].stage_name, "Detail");
        assert_eq!(metrics[1].count, 1);
        assert_eq!(metrics[1].avg_age_days, 6);
        assert_eq!(metrics[1].overdue_count, 1);

        assert_eq!(metrics[2].count, 0);
        assert_eq!(metrics[2].avg_age_days, 0);
    }

    #[test]
    fn two_stages_with_same_name_do_not_mix_buckets() {
        let now = Utc::now();
        // mismo nombre, ids distintos: el bucketing por id no los mezcla
        let stages = vec![
            stage(1, "Detail", "Detail", Some(24), false),
            stage(2, "Detail", "Detail", Some(24), false),
        ];
        let v = vehicle(0, now);
        let completions = vec![satisfied(v.id, stages[0].id, "done")];

        let metrics = stage_metrics(&[v], &stages, &completions, now);
        assert_eq!(metrics[0].count, 0);
        assert_eq!(metrics[1].count, 1);
    }

    #[test]
    fn aging_buckets_split_by_age() {
        let now = Utc::now();
        let vehicles = vec![
            vehicle(0, now),
            vehicle(3, now),
            vehicle(5, now),
            vehicle(14, now),
            vehicle(30, now),
        ];

        let buckets = aging_buckets(&vehicles, now);
        assert_eq!(buckets.zero_to_three, 2);
        assert_eq!(buckets.four_to_seven, 1);
        assert_eq!(buckets.eight_to_fourteen, 1);
        assert_eq!(buckets.fifteen_plus, 1);
    }

    #[test]
    fn role_workload_counts_visible_stages_only() {
        let now = Utc::now();
        let stages = three_stage_pipeline();
        let at_intake = vehicle(0, now); // etapa de Manager
        let at_detail = vehicle(0, now); // etapa de Detail
        let completions = vec![satisfied(at_detail.id, stages[0].id, "done")];
        let vehicles = vec![at_intake, at_detail];

        assert_eq!(role_workload("Detail", &vehicles, &stages, &completions), 1);
        assert_eq!(role_workload("Sales", &vehicles, &stages, &completions), 0);
        // Manager ve todas las etapas
        assert_eq!(role_workload("Manager", &vehicles, &stages, &completions), 2);
    }

    #[test]
    fn monotonic_progress_through_scenario() {
        // Escenario completo: Intake -> Detail -> Ready (terminal)
        let now = Utc::now();
        let stages = vec![
            stage(1, "Intake", "Manager", Some(24), false),
            stage(2, "Detail", "Detail", Some(24), false),
            stage(3, "Ready", "Sales", None, true),
        ];
        let v = vehicle(1, now);

        let mut completions = vec![satisfied(v.id, stages[0].id, "done")];
        assert_eq!(current_status_name(v.id, &stages, &completions), "Detail");

        completions.push(satisfied(v.id, stages[1].id, "done"));
        assert_eq!(current_status_name(v.id, &stages, &completions), "Ready");

        // completar la terminal no mueve el estado: sigue en Ready
        completions.push(satisfied(v.id, stages[2].id, "done"));
        assert_eq!(current_status_name(v.id, &stages, &completions), "Ready");

        // limpiar una etapa anterior sí regresa el estado
        completions[1].completion_value = None;
        completions[1].completed_at = None;
        completions[1].cleared_at = Some(now);
        assert_eq!(current_status_name(v.id, &stages, &completions), "Detail");
    }

    #[test]
    fn transition_with_value_plans_complete() {
        let now = Utc::now();
        let plan = plan_completion_transition(None, "John D.", "Admin", now);
        assert_eq!(
            plan,
            CompletionTransition::Complete {
                value: "John D.".to_string(),
                completed_by: "Admin".to_string(),
                completed_at: now,
            }
        );
    }

    #[test]
    fn transition_with_empty_value_plans_clear_not_delete() {
        let now = Utc::now();
        let existing = satisfied(Uuid::new_v4(), Uuid::new_v4(), "done");

        let plan = plan_completion_transition(Some(&existing), "", "Admin", now);
        assert_eq!(plan, CompletionTransition::Clear { cleared_at: now });
    }

    #[test]
    fn transition_with_empty_value_and_no_row_is_noop() {
        let now = Utc::now();
        let plan = plan_completion_transition(None, "", "Admin", now);
        assert_eq!(plan, CompletionTransition::Noop);
    }
}
