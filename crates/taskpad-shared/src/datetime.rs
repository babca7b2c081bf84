use chrono::{
  DateTime,
  Local,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone
};
use tracing::debug;

/// `Www Mmm DD YYYY`, the form used
/// for the persisted last completion
/// day and the date header.
pub const DISPLAY_DATE_FORMAT: &str =
  "%a %b %d %Y";

const NAIVE_DATETIME_FORMATS: [&str;
  5] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M"
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn display_date(
  date: NaiveDate
) -> String {
  date
    .format(DISPLAY_DATE_FORMAT)
    .to_string()
}

/// Parses a deadline the way the add
/// form produces it. Values without an
/// offset are local time; a bare date
/// is local midnight. Unparseable input
/// yields `None`.
#[must_use]
pub fn parse_deadline(
  raw: &str
) -> Option<DateTime<Local>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(
      trimmed
    )
  {
    return Some(
      dt.with_timezone(&Local)
    );
  }

  for fmt in NAIVE_DATETIME_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        trimmed, fmt
      )
    {
      return localize(naive);
    }
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      trimmed,
      DATE_FORMAT
    )
  {
    return localize(
      date.and_time(NaiveTime::MIN)
    );
  }

  debug!(raw = %trimmed, "deadline does not parse; treating as absent");
  None
}

/// ` (Due: ...)` suffix for a task
/// label. Empty when there is no
/// deadline.
#[must_use]
pub fn deadline_suffix(
  raw: Option<&str>
) -> String {
  match raw.map(str::trim) {
    | None | Some("") => String::new(),
    | Some(text) => {
      format!(
        " (Due: {})",
        format_deadline(text)
      )
    }
  }
}

#[must_use]
pub fn format_deadline(
  raw: &str
) -> String {
  let trimmed = raw.trim();
  match parse_deadline(trimmed) {
    | Some(dt)
      if is_date_only(trimmed) =>
    {
      dt.format(DATE_FORMAT)
        .to_string()
    }
    | Some(dt) => {
      dt.format("%Y-%m-%d %H:%M")
        .to_string()
    }
    | None => trimmed.to_string()
  }
}

fn is_date_only(raw: &str) -> bool {
  NaiveDate::parse_from_str(
    raw,
    DATE_FORMAT
  )
  .is_ok()
}

fn localize(
  naive: NaiveDateTime
) -> Option<DateTime<Local>> {
  let resolved = Local
    .from_local_datetime(&naive)
    .earliest();
  if resolved.is_none() {
    debug!(%naive, "local time does not exist; treating deadline as absent");
  }
  resolved
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    TimeZone,
    Timelike,
    Utc
  };

  use super::*;

  #[test]
  fn parses_every_accepted_form() {
    let local = parse_deadline(
      "2026-02-16T10:30"
    )
    .unwrap();
    assert_eq!(local.hour(), 10);
    assert_eq!(local.minute(), 30);

    assert!(
      parse_deadline(
        "2026-02-16 10:30"
      )
      .is_some()
    );
    assert!(
      parse_deadline(
        "2026-02-16T10:30:15.250"
      )
      .is_some()
    );

    let midnight =
      parse_deadline("2020-01-01")
        .unwrap();
    assert_eq!(
      midnight.date_naive(),
      NaiveDate::from_ymd_opt(
        2020, 1, 1
      )
      .unwrap()
    );
    assert_eq!(midnight.hour(), 0);

    let offset = parse_deadline(
      "2026-02-16T10:00:00Z"
    )
    .unwrap();
    assert_eq!(
      offset.with_timezone(&Utc),
      Utc
        .with_ymd_and_hms(
          2026, 2, 16, 10, 0, 0
        )
        .unwrap()
    );
  }

  #[test]
  fn garbage_and_blank_are_absent() {
    assert!(parse_deadline("").is_none());
    assert!(
      parse_deadline("   ").is_none()
    );
    assert!(
      parse_deadline("next tuesday")
        .is_none()
    );
    assert!(
      parse_deadline("2026-13-45")
        .is_none()
    );
  }

  #[test]
  fn suffix_formats_or_echoes_raw() {
    assert_eq!(
      deadline_suffix(None),
      ""
    );
    assert_eq!(
      deadline_suffix(Some(
        "2020-01-01"
      )),
      " (Due: 2020-01-01)"
    );
    assert_eq!(
      deadline_suffix(Some(
        "2026-02-16T09:05"
      )),
      " (Due: 2026-02-16 09:05)"
    );
    assert_eq!(
      deadline_suffix(Some("soon")),
      " (Due: soon)"
    );
  }

  #[test]
  fn display_date_matches_header_form()
  {
    let date = NaiveDate::from_ymd_opt(
      2026, 10, 5
    )
    .unwrap();
    assert_eq!(
      display_date(date),
      "Mon Oct 05 2026"
    );
  }
}
