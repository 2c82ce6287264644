use crate::time_of_day::TimeOfDay;
use crate::weekday::Weekday;
use chrono::offset::LocalResult;
use chrono::{Duration, TimeZone};
use chrono_tz::Tz;

/// Computes the next absolute UTC timestamp (millis) at or after `now`
/// that falls on the given weekday at the given wall-clock time in the
/// canonical zone.
///
/// When the target weekday is today but the time has already passed, the
/// trigger rolls forward by exactly 7 days, never 0.
pub fn next_trigger_millis(
    now_millis: i64,
    weekday: Weekday,
    time_of_day: &TimeOfDay,
    tz: &Tz,
) -> i64 {
    let now = tz.timestamp_millis(now_millis);
    let today = Weekday::from(chrono::Datelike::weekday(&now));

    let days_ahead = i64::from((weekday.index() + 7 - today.index()) % 7);
    let date = now.date_naive() + Duration::days(days_ahead);

    let candidate = resolve_wall_clock(tz, date, time_of_day);
    if candidate >= now_millis {
        candidate
    } else {
        resolve_wall_clock(tz, date + Duration::days(7), time_of_day)
    }
}

/// Maps a local calendar date + wall-clock time to UTC millis. A minute
/// erased by a DST jump shifts forward hour by hour until it resolves; an
/// ambiguous minute takes the earlier instant.
fn resolve_wall_clock(tz: &Tz, date: chrono::NaiveDate, time_of_day: &TimeOfDay) -> i64 {
    let mut naive = date.and_hms(
        u32::from(time_of_day.hour()),
        u32::from(time_of_day.minute()),
        0,
    );
    loop {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => return earliest.timestamp_millis(),
            LocalResult::None => naive = naive + Duration::hours(1),
        }
    }
}
