use chrono::Weekday;
use serde_json::{Map, Value};

/// Canonical weekday order used to index day-keyed schedule data. Row cells
/// are always emitted in this order, whatever display labels the client
/// supplies for the header.
pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Fixed slot list for the CSV rendering of a schedule.
pub const SCHEDULE_SLOTS: [&str; 7] = [
    "Lunch1", "Lunch2", "Bothams1", "Bothams2", "Bothams3", "Hole1", "Hole2",
];

/// Section name -> { weekday name -> cell value }, in client insertion order.
///
/// Spreadsheet row order mirrors the iteration order of this map, which is
/// why the crate enables serde_json's `preserve_order`.
pub type ScheduleData = Map<String, Value>;

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Text for one schedule cell. Clients send strings, but the value is
/// client-owned JSON: null and absent render empty, anything else falls back
/// to its JSON form.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
