//! Movie, banking, shopping and meeting-room operations.

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::operation::{Operation, OperationContext};
use crate::domain::catalog::response::ApiResponse;
use crate::domain::knowledge::predicate::at_least;
use crate::domain::knowledge::{Constraints, Value};

use super::search_operation;

pub(super) fn operations() -> Vec<Operation> {
    vec![
        search_operation("movie"),
        Operation::new("bank_balance", "bank", bank_balance)
            .requires(&["FullName", "AccountNumber", "PIN"])
            .fails_with("AuthenticationStatus", "failed"),
        Operation::new("bank_fraud_report", "bank", bank_fraud_report)
            .requires(&["FullName", "AccountNumber", "Description"])
            .fails_with("ReportStatus", "failed"),
        search_operation("shopping"),
        Operation::new("shopping_order", "shopping", shopping_order)
            .requires(&["ProductName", "Quantity", "Address"])
            .fails_with("OrderStatus", "failed"),
        Operation::new("meeting_schedule", "schedule", meeting_schedule)
            .requires(&["Day", "StartTimeHour", "NumberAttendees"])
            .fails_with("MeetingStatus", "failed"),
    ]
}

/// A PIN is four digits; anything else fails authentication.
fn valid_pin(value: &Value) -> bool {
    match value {
        Value::Int(n) => (0..=9999).contains(n),
        Value::Text(s) => s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn bank_balance(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let holder = ctx.literal("FullName")?.clone();
    let account = ctx.literal("AccountNumber")?.to_json();
    if !valid_pin(ctx.literal("PIN")?) {
        return Ok(ApiResponse::status_only("AuthenticationStatus", "failed"));
    }

    let mut constraints = Constraints::new().with("FullName", holder);
    ctx.pass_through(&mut constraints, &["AccountType", "Currency"]);
    let (record, count) = ctx.sample(&constraints)?;
    Ok(match record {
        Some(record) => ApiResponse::from_record(record, count)
            .with("AccountNumber", account)
            .with("AuthenticationStatus", "ok"),
        None => ApiResponse::status_only("AuthenticationStatus", "failed"),
    })
}

fn bank_fraud_report(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let holder = ctx.literal("FullName")?.clone();
    let account = ctx.literal("AccountNumber")?.to_json();

    let (record, _) = ctx.sample(&Constraints::new().with("FullName", holder.clone()))?;
    if record.is_none() {
        return Ok(ApiResponse::status_only("ReportStatus", "failed"));
    }
    let status = ctx.choose(&["report filed", "report under review"]);
    let case = ctx.gen_range(10_000..=99_999);
    Ok(ApiResponse::empty()
        .with("FullName", holder.to_json())
        .with("AccountNumber", account)
        .with("CaseNumber", case)
        .with("ReportStatus", status)
        .with_count(1))
}

fn shopping_order(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let product = ctx.literal("ProductName")?.clone();
    let quantity = ctx.int("Quantity")?;
    let address = ctx.literal("Address")?.to_json();
    if quantity < 1 {
        return Err(CatalogError::invalid(ctx.operation(), "Quantity", "must be at least 1"));
    }

    let mut constraints = Constraints::new()
        .with("ProductName", product)
        .with("InStock", true);
    ctx.pass_through(&mut constraints, &["Brand", "Category"]);

    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("OrderStatus", "failed"));
    };
    let price = record.get("Price").and_then(Value::as_int).unwrap_or(0);
    let total = price
        .checked_mul(quantity)
        .ok_or_else(|| CatalogError::invalid(ctx.operation(), "Quantity", "quantity too large"))?;
    let order_id = ctx.gen_range(100_000..=999_999);
    Ok(ApiResponse::from_record(record, count)
        .with("Quantity", quantity)
        .with("Address", address)
        .with("TotalPrice", total)
        .with("OrderId", order_id)
        .with("OrderStatus", "placed"))
}

/// Finds a room for everyone. Other bookings are not modelled, so a clash is
/// drawn at random.
fn meeting_schedule(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let day = ctx.literal("Day")?.to_json();
    let start = ctx.int("StartTimeHour")?;
    let attendees = ctx.int("NumberAttendees")?;
    let duration = match ctx.request().get("DurationHours") {
        Some(_) => ctx.int("DurationHours")?,
        None => 1,
    };
    if !(0..=23).contains(&start) {
        return Err(CatalogError::invalid(ctx.operation(), "StartTimeHour", "hour must be 0-23"));
    }
    // start is 0-23 here, so the subtraction cannot overflow
    if duration < 1 || duration > 24 - start {
        return Err(CatalogError::invalid(
            ctx.operation(),
            "DurationHours",
            "meeting must end on the same day",
        ));
    }

    let mut constraints = Constraints::new().with("Capacity", at_least(attendees));
    ctx.pass_through(&mut constraints, &["Room", "HasProjector", "HasVideoConference"]);

    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("MeetingStatus", "failed"));
    };
    match ctx.choose(&["scheduled", "scheduled", "room already booked"]) {
        "scheduled" => Ok(ApiResponse::from_record(record, count)
            .with("Day", day)
            .with("StartTimeHour", start)
            .with("EndTimeHour", start + duration)
            .with("NumberAttendees", attendees)
            .with("MeetingStatus", "scheduled")),
        other => Ok(ApiResponse::status_only("MeetingStatus", other)),
    }
}
