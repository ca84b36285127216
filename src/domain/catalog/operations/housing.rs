//! Apartment operations.

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::operation::{Operation, OperationContext};
use crate::domain::catalog::response::ApiResponse;
use crate::domain::knowledge::Constraints;

use super::search_operation;

/// Viewings are offered from 08:00 until the last slot at 20:00.
const VIEWING_HOURS: std::ops::RangeInclusive<i64> = 8..=20;

pub(super) fn operations() -> Vec<Operation> {
    vec![
        search_operation("apartment"),
        Operation::new("apartment_schedule", "apartment", apartment_schedule)
            .requires(&["Name", "Day", "StartTimeHour", "RequestType"])
            .fails_with("ScheduleStatus", "failed"),
    ]
}

fn apartment_schedule(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let name = ctx.literal("Name")?.clone();
    let day = ctx.literal("Day")?.to_json();
    let hour = ctx.int("StartTimeHour")?;
    let request_type = ctx.literal("RequestType")?.to_json();

    if !VIEWING_HOURS.contains(&hour) {
        return Ok(ApiResponse::status_only("ScheduleStatus", "outside viewing hours"));
    }
    let (record, count) = ctx.sample(&Constraints::new().with("Name", name))?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("ScheduleStatus", "failed"));
    };
    match ctx.choose(&["scheduled", "scheduled", "time slot unavailable"]) {
        "scheduled" => Ok(ApiResponse::from_record(record, count)
            .with("Day", day)
            .with("StartTimeHour", hour)
            .with("RequestType", request_type)
            .with("ScheduleStatus", "scheduled")),
        other => Ok(ApiResponse::status_only("ScheduleStatus", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use crate::domain::knowledge::{KnowledgeBase, Record};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn schedule(hour: i64, seed: u64) -> ApiResponse {
        let kb = KnowledgeBase::from_records(
            "apartment",
            vec![Record::new(RecordId::new(0)).with_field("Name", "Cedar House")],
        );
        let request = Constraints::new()
            .with("Name", "Cedar House")
            .with("Day", "Tuesday")
            .with("StartTimeHour", hour)
            .with("RequestType", "viewing");
        operations()[1]
            .run(&request, &kb, &mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn late_viewing_is_refused() {
        assert_eq!(
            schedule(22, 0),
            ApiResponse::status_only("ScheduleStatus", "outside viewing hours")
        );
    }

    #[test]
    fn outcome_is_a_known_status() {
        for seed in 0..20 {
            let response = schedule(10, seed);
            let status = response.get("ScheduleStatus").and_then(|s| s.as_str()).unwrap();
            assert!(["scheduled", "time slot unavailable"].contains(&status));
        }
    }
}
