use super::ExportError;
use crate::schedule::{DAYS_OF_WEEK, SCHEDULE_SLOTS, ScheduleData, cell_text, weekday_name};

/// Fixed-schema CSV rendering of a schedule: the canonical slot list by the
/// canonical weekdays, missing values rendered empty. Lossy relative to the
/// spreadsheet export and entirely side-effect free.
pub fn schedule_to_csv(data: &ScheduleData) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        let mut header = Vec::with_capacity(DAYS_OF_WEEK.len() + 1);
        header.push("");
        header.extend(DAYS_OF_WEEK.iter().map(|day| weekday_name(*day)));
        writer.write_record(&header)?;

        for slot in SCHEDULE_SLOTS {
            let days = data.get(slot);
            let mut record = Vec::with_capacity(DAYS_OF_WEEK.len() + 1);
            record.push(slot.to_string());
            for day in DAYS_OF_WEEK {
                record.push(cell_text(
                    days.and_then(|values| values.get(weekday_name(day))),
                ));
            }
            writer.write_record(&record)?;
        }

        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
