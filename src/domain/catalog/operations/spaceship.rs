//! Spaceship operations.

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::operation::{Operation, OperationContext};
use crate::domain::catalog::response::ApiResponse;
use crate::domain::knowledge::predicate::at_most;
use crate::domain::knowledge::{Constraints, Value};

pub(super) fn operations() -> Vec<Operation> {
    vec![
        Operation::new("spaceship_access_codes", "spaceship", access_codes)
            .requires(&["Section", "ClearanceLevel"])
            .fails_with("AccessStatus", "denied"),
        Operation::new("spaceship_life_support", "spaceship", life_support)
            .requires(&["Section"])
            .fails_with("LifeSupportStatus", "unknown"),
    ]
}

/// Releases a section's access code to crew whose clearance covers it.
fn access_codes(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let section = ctx.literal("Section")?.clone();
    let clearance = ctx.int("ClearanceLevel")?;

    let constraints = Constraints::new()
        .with("Section", section)
        .with("ClearanceLevel", at_most(clearance));
    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("AccessStatus", "denied"));
    };
    let mut response = ApiResponse::empty()
        .with("AccessStatus", "granted")
        .with_count(count);
    for field in ["Section", "AccessCode", "DoorStatus"] {
        if let Some(value) = record.get(field) {
            response = response.with(field, value.to_json());
        }
    }
    Ok(response)
}

fn life_support_status(oxygen: i64) -> &'static str {
    match oxygen {
        n if n < 20 => "Critical",
        n if n < 50 => "Warning",
        _ => "Nominal",
    }
}

fn life_support(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let section = ctx.literal("Section")?.clone();
    let (record, count) = ctx.sample(&Constraints::new().with("Section", section))?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("LifeSupportStatus", "unknown"));
    };
    let oxygen = record.get("OxygenLevel").and_then(Value::as_int).unwrap_or(0);
    Ok(ApiResponse::from_record(record, count).with("LifeSupportStatus", life_support_status(oxygen)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use crate::domain::knowledge::{KnowledgeBase, Record};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn ship() -> KnowledgeBase {
        KnowledgeBase::from_records(
            "spaceship",
            vec![Record::new(RecordId::new(0))
                .with_field("Section", "bridge")
                .with_field("ClearanceLevel", 4)
                .with_field("AccessCode", 7311)
                .with_field("OxygenLevel", 12)],
        )
    }

    fn run(index: usize, request: Constraints) -> ApiResponse {
        operations()[index]
            .run(&request, &ship(), &mut StdRng::seed_from_u64(0))
            .unwrap()
    }

    #[test]
    fn oxygen_thresholds() {
        assert_eq!(life_support_status(19), "Critical");
        assert_eq!(life_support_status(20), "Warning");
        assert_eq!(life_support_status(50), "Nominal");
    }

    #[test]
    fn low_oxygen_section_is_critical() {
        let response = run(1, Constraints::new().with("Section", "bridge"));
        assert_eq!(response.get("LifeSupportStatus"), Some(&json!("Critical")));
    }

    #[test]
    fn insufficient_clearance_is_denied() {
        let denied = run(
            0,
            Constraints::new()
                .with("Section", "bridge")
                .with("ClearanceLevel", 3),
        );
        assert_eq!(denied, ApiResponse::status_only("AccessStatus", "denied"));

        let granted = run(
            0,
            Constraints::new()
                .with("Section", "bridge")
                .with("ClearanceLevel", 5),
        );
        assert_eq!(granted.get("AccessCode"), Some(&json!(7311)));
    }
}
