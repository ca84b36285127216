//! Hotel, flight, ride, route and weather operations.

use chrono::NaiveDate;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::operation::{min_by_field, Operation, OperationContext};
use crate::domain::catalog::response::ApiResponse;
use crate::domain::knowledge::predicate::at_least;
use crate::domain::knowledge::{Constraints, Value};

use super::search_operation;

const RIDE_STATUSES: &[&str] = &[
    "driver on the way",
    "driver arrived",
    "ride in progress",
    "ride completed",
];

pub(super) fn operations() -> Vec<Operation> {
    vec![
        search_operation("hotel"),
        Operation::new("hotel_reserve", "hotel", hotel_reserve)
            .requires(&["Name", "CheckInDate", "CheckOutDate", "CustomerName"])
            .fails_with("BookingStatus", "failed"),
        Operation::new("hotel_service_request", "hotel", hotel_service_request)
            .requires(&["Name", "RoomNumber", "Request"])
            .fails_with("RequestStatus", "failed"),
        Operation::new("plane_search", "plane", plane_search)
            .requires(&["DepartureCity", "ArrivalCity"]),
        Operation::new("plane_reserve", "plane", plane_reserve)
            .requires(&["FlightNumber", "PassengerName"])
            .fails_with("BookingStatus", "failed"),
        Operation::new("ride_book", "ride", ride_book)
            .requires(&["DepartureLocation", "Destination", "NumberPassengers"])
            .fails_with("RideStatus", "failed"),
        Operation::new("ride_status", "ride", ride_status)
            .requires(&["RideId"])
            .fails_with("RideStatus", "unknown ride"),
        Operation::new("trip_directions", "trip", trip_directions)
            .requires(&["DepartureLocation", "ArrivalLocation", "TravelMode"]),
        Operation::new("weather", "weather", weather).requires(&["City", "Day"]),
    ]
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_text()
        .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
}

/// Books a room. ISO dates are checked for order; free-text dates
/// ("next friday") are accepted as given.
fn hotel_reserve(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let name = ctx.literal("Name")?.clone();
    let check_in = ctx.literal("CheckInDate")?;
    let check_out = ctx.literal("CheckOutDate")?;
    let customer = ctx.literal("CustomerName")?.to_json();

    let nights = match (parse_date(check_in), parse_date(check_out)) {
        (Some(start), Some(end)) if end <= start => {
            return Err(CatalogError::invalid(
                ctx.operation(),
                "CheckOutDate",
                "check-out must be after check-in",
            ));
        }
        (Some(start), Some(end)) => Some((end - start).num_days()),
        _ => None,
    };

    let constraints = Constraints::new()
        .with("Name", name)
        .with("RoomsAvailable", at_least(1));
    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("BookingStatus", "failed"));
    };

    let mut response = ApiResponse::from_record(record, count)
        .with("CheckInDate", check_in.to_json())
        .with("CheckOutDate", check_out.to_json())
        .with("CustomerName", customer)
        .with("BookingStatus", "confirmed");
    if let Some(nights) = nights {
        let rate = record.get("PricePerNight").and_then(Value::as_int).unwrap_or(0);
        let total = rate.checked_mul(nights).ok_or_else(|| {
            CatalogError::invalid(ctx.operation(), "CheckOutDate", "stay too long")
        })?;
        response = response.with("Nights", nights).with("TotalPrice", total);
    }
    Ok(response)
}

fn hotel_service_request(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let name = ctx.literal("Name")?.clone();
    let room = ctx.literal("RoomNumber")?.to_json();
    let request = ctx.literal("Request")?.clone();

    let (record, _) = ctx.sample(&Constraints::new().with("Name", name))?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("RequestStatus", "failed"));
    };
    let offered = record
        .get("Services")
        .map(|services| services.contains(&request))
        .unwrap_or(false);
    let status = if offered {
        ctx.choose(&["request accepted", "request scheduled"])
    } else {
        "service not offered"
    };
    Ok(ApiResponse::empty()
        .with("Name", record.get("Name").map(Value::to_json).unwrap_or_default())
        .with("RoomNumber", room)
        .with("Request", request.to_json())
        .with("RequestStatus", status)
        .with_count(1))
}

/// Earliest departure between the two cities; other request fields narrow
/// the search.
fn plane_search(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let matches = ctx.all(ctx.request())?;
    Ok(match min_by_field(&matches, "DepartureHour") {
        Some(record) => ApiResponse::from_record(record, matches.len()),
        None => ApiResponse::empty(),
    })
}

fn plane_reserve(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let flight = ctx.int("FlightNumber")?;
    let passenger = ctx.literal("PassengerName")?.to_json();
    let seats = match ctx.request().get("NumberSeats") {
        Some(_) => ctx.int("NumberSeats")?,
        None => 1,
    };

    let mut constraints = Constraints::new()
        .with("FlightNumber", flight)
        .with("SeatsAvailable", at_least(seats));
    ctx.pass_through(&mut constraints, &["Class", "DepartureCity", "ArrivalCity"]);

    let (record, count) = ctx.sample(&constraints)?;
    let Some(record) = record else {
        return Ok(ApiResponse::status_only("BookingStatus", "failed"));
    };
    let reference = ctx.gen_range(100_000..=999_999);
    Ok(ApiResponse::from_record(record, count)
        .with("PassengerName", passenger)
        .with("NumberSeats", seats)
        .with("BookingReference", reference)
        .with("BookingStatus", "confirmed"))
}

/// Books the fastest ride that fits every passenger.
fn ride_book(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let from = ctx.literal("DepartureLocation")?.to_json();
    let to = ctx.literal("Destination")?.to_json();
    let passengers = ctx.int("NumberPassengers")?;

    let mut constraints = Constraints::new().with("MaxPassengers", at_least(passengers));
    ctx.pass_through(&mut constraints, &["Service", "CarType", "AllowsPets"]);

    let matches = ctx.all(&constraints)?;
    let Some(record) = min_by_field(&matches, "DurationMinutes") else {
        return Ok(ApiResponse::status_only("RideStatus", "failed"));
    };
    let ride_id = ctx.gen_range(1000..=9999);
    Ok(ApiResponse::from_record(record, matches.len())
        .with("DepartureLocation", from)
        .with("Destination", to)
        .with("NumberPassengers", passengers)
        .with("RideId", ride_id)
        .with("RideStatus", "booked"))
}

/// Rides are not tracked, so the status is drawn at random.
fn ride_status(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let ride_id = ctx.literal("RideId")?.to_json();
    let status = ctx.choose(RIDE_STATUSES);
    let eta = match status {
        "driver on the way" => ctx.gen_range(1..=20),
        _ => 0,
    };
    Ok(ApiResponse::empty()
        .with("RideId", ride_id)
        .with("RideStatus", status)
        .with("EtaMinutes", eta)
        .with_count(1))
}

/// Shortest route for the requested travel mode.
fn trip_directions(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let from = ctx.literal("DepartureLocation")?.to_json();
    let to = ctx.literal("ArrivalLocation")?.to_json();
    let mode = ctx.literal("TravelMode")?.clone();

    let mut constraints = Constraints::new().with("TravelMode", mode);
    ctx.pass_through(&mut constraints, &["TrafficLevel"]);

    let matches = ctx.all(&constraints)?;
    Ok(match min_by_field(&matches, "DurationMinutes") {
        Some(record) => ApiResponse::from_record(record, matches.len())
            .with("DepartureLocation", from)
            .with("ArrivalLocation", to),
        None => ApiResponse::empty(),
    })
}

fn weather(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let mut constraints = Constraints::new();
    ctx.pass_through(&mut constraints, &["City", "Day", "Condition"]);
    let (record, count) = ctx.sample(&constraints)?;
    Ok(match record {
        Some(record) => ApiResponse::from_record(record, count),
        None => ApiResponse::empty(),
    })
}
