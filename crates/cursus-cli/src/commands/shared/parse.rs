use chrono::{DateTime, NaiveDate, Utc};
use cursus_core::entities::Relocation;
use cursus_core::enums::CoverageLevel;

/// Parse `skill:level:target` into a relocation off `from_session_id`.
pub fn parse_relocation(raw: &str, from_session_id: &str) -> anyhow::Result<Relocation> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [skill_id, level, to_session_id] = parts.as_slice() else {
        anyhow::bail!("invalid relocation '{raw}': expected skill:level:target_session");
    };
    if skill_id.is_empty() || to_session_id.is_empty() {
        anyhow::bail!("invalid relocation '{raw}': skill and target session are required");
    }
    let level: CoverageLevel = level
        .to_ascii_lowercase()
        .parse()
        .map_err(|error: String| anyhow::anyhow!("invalid relocation '{raw}': {error}"))?;

    Ok(Relocation {
        skill_id: (*skill_id).to_string(),
        level,
        from_session_id: from_session_id.to_string(),
        to_session_id: (*to_session_id).to_string(),
    })
}

pub fn parse_relocations(raw: &[String], from_session_id: &str) -> anyhow::Result<Vec<Relocation>> {
    raw.iter()
        .map(|value| parse_relocation(value, from_session_id))
        .collect()
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{raw}': expected RFC 3339 or YYYY-MM-DD"))?;
    day.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid date '{raw}'"))
}

/// Resolve `--date` / `--clear-date` into a date change.
///
/// `None` keeps the current date, `Some(None)` clears it.
pub fn parse_date_change(
    date: Option<&str>,
    clear: bool,
) -> anyhow::Result<Option<Option<DateTime<Utc>>>> {
    if clear {
        return Ok(Some(None));
    }
    date.map(|raw| parse_date(raw).map(Some)).transpose()
}
