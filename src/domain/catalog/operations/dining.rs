//! Restaurant and party-venue operations.

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::operation::{Operation, OperationContext};
use crate::domain::catalog::response::ApiResponse;
use crate::domain::knowledge::predicate::{at_least, at_most};
use crate::domain::knowledge::Constraints;

use super::search_operation;

pub(super) fn operations() -> Vec<Operation> {
    vec![
        search_operation("restaurant"),
        Operation::new("restaurant_reserve", "restaurant", restaurant_reserve)
            .requires(&["Name", "Time", "Size"])
            .fails_with("ReservationStatus", "failed"),
        Operation::new("party_plan", "party", party_plan)
            .requires(&["VenueName", "Day", "NumberGuests"])
            .fails_with("PartyStatus", "failed"),
    ]
}

/// Reserves a table: the restaurant must take reservations, seat the party
/// and be open for at least an hour from the requested time.
fn restaurant_reserve(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let name = ctx.literal("Name")?.clone();
    let time = ctx.int("Time")?;
    let size = ctx.int("Size")?;
    if !(0..=23).contains(&time) {
        return Err(CatalogError::invalid(ctx.operation(), "Time", "hour must be 0-23"));
    }
    if size < 1 {
        return Err(CatalogError::invalid(ctx.operation(), "Size", "party size must be positive"));
    }

    let constraints = Constraints::new()
        .with("Name", name)
        .with("TakesReservations", true)
        .with("MaxPartySize", at_least(size))
        .with("OpeningHour", at_most(time))
        .with("ClosingHour", at_least(time + 1));

    Ok(match ctx.sample(&constraints)? {
        (Some(record), count) => ApiResponse::from_record(record, count)
            .with("Time", time)
            .with("Size", size)
            .with("ReservationStatus", "confirmed"),
        (None, _) => ApiResponse::status_only("ReservationStatus", "failed"),
    })
}

/// Books a venue large enough for the guest list. Whether the venue is free
/// on the requested day is not modelled, so availability is drawn at random.
fn party_plan(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let venue = ctx.literal("VenueName")?.clone();
    let day = ctx.literal("Day")?.to_json();
    let guests = ctx.int("NumberGuests")?;
    if guests < 1 {
        return Err(CatalogError::invalid(ctx.operation(), "NumberGuests", "guest count must be positive"));
    }

    let mut constraints = Constraints::new()
        .with("VenueName", venue)
        .with("MaxGuests", at_least(guests));
    ctx.pass_through(&mut constraints, &["City", "HasCatering", "HasDJ"]);

    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("PartyStatus", "failed"));
    };
    match ctx.choose(&["booked", "booked", "venue unavailable"]) {
        "booked" => {
            let per_guest = record.get("PricePerGuest").and_then(|v| v.as_int()).unwrap_or(0);
            let total = per_guest.checked_mul(guests).ok_or_else(|| {
                CatalogError::invalid(ctx.operation(), "NumberGuests", "guest count too large")
            })?;
            Ok(ApiResponse::from_record(record, count)
                .with("Day", day)
                .with("NumberGuests", guests)
                .with("TotalPrice", total)
                .with("PartyStatus", "booked"))
        }
        other => Ok(ApiResponse::status_only("PartyStatus", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use crate::domain::knowledge::{KnowledgeBase, Record};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn restaurants() -> KnowledgeBase {
        KnowledgeBase::from_records(
            "restaurant",
            vec![
                Record::new(RecordId::new(0))
                    .with_field("Name", "Roma")
                    .with_field("TakesReservations", true)
                    .with_field("MaxPartySize", 6)
                    .with_field("OpeningHour", 11)
                    .with_field("ClosingHour", 22),
                Record::new(RecordId::new(1))
                    .with_field("Name", "Sakura")
                    .with_field("TakesReservations", false)
                    .with_field("MaxPartySize", 12)
                    .with_field("OpeningHour", 8)
                    .with_field("ClosingHour", 23),
            ],
        )
    }

    fn reserve(request: Constraints) -> Result<ApiResponse, CatalogError> {
        let op = operations()
            .into_iter()
            .find(|op| op.name() == "restaurant_reserve")
            .unwrap();
        op.run(&request, &restaurants(), &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn reservation_within_opening_hours_is_confirmed() {
        let response = reserve(
            Constraints::new()
                .with("Name", "Roma")
                .with("Time", 19)
                .with("Size", 4),
        )
        .unwrap();
        assert_eq!(response.get("ReservationStatus"), Some(&json!("confirmed")));
        assert_eq!(response.get("id"), Some(&json!(0)));
    }

    #[test]
    fn last_seating_is_one_hour_before_closing() {
        let response = reserve(
            Constraints::new()
                .with("Name", "Roma")
                .with("Time", 22)
                .with("Size", 2),
        )
        .unwrap();
        assert_eq!(response, ApiResponse::status_only("ReservationStatus", "failed"));
    }

    #[test]
    fn restaurant_without_reservations_fails() {
        let response = reserve(
            Constraints::new()
                .with("Name", "Sakura")
                .with("Time", 12)
                .with("Size", 2),
        )
        .unwrap();
        assert_eq!(response.count, 0);
    }

    #[test]
    fn missing_name_is_reported() {
        let err = reserve(Constraints::new().with("Time", 12).with("Size", 2)).unwrap_err();
        assert_eq!(err, CatalogError::missing("restaurant_reserve", "Name"));
    }

    #[test]
    fn party_needs_a_positive_guest_count() {
        let venues = KnowledgeBase::from_records(
            "party",
            vec![Record::new(RecordId::new(0))
                .with_field("VenueName", "Hall")
                .with_field("MaxGuests", 80)
                .with_field("PricePerGuest", 30)],
        );
        let op = operations()
            .into_iter()
            .find(|op| op.name() == "party_plan")
            .unwrap();
        let err = op
            .run(
                &Constraints::new()
                    .with("VenueName", "Hall")
                    .with("Day", "Friday")
                    .with("NumberGuests", i64::MIN),
                &venues,
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter { ref parameter, .. } if parameter == "NumberGuests"));
    }
}
