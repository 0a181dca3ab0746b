//! Current date/time tool with optional IANA timezone conversion.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde_json::{json, Map, Value};

use super::Tool;

pub struct DateTimeTool;

/// Output shape selected by the `format` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Full,
    Date,
    Time,
    Iso,
}

impl OutputFormat {
    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "date" => Self::Date,
            "time" => Self::Time,
            "iso" => Self::Iso,
            _ => Self::Full,
        }
    }
}

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "get_datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time or convert between time zones"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "The timezone to get the time for (e.g., 'UTC', 'America/New_York', 'Europe/London', 'Asia/Tokyo'). Default is local system time."
                },
                "format": {
                    "type": "string",
                    "description": "The format for the datetime output. Options: 'full' (date and time), 'date' (date only), 'time' (time only), 'iso' (ISO 8601 format). Default is 'full'."
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let timezone = params.get("timezone").and_then(|v| v.as_str());
        let format = OutputFormat::parse(
            params.get("format").and_then(|v| v.as_str()).unwrap_or("full"),
        );
        tracing::info!(?timezone, ?format, "Getting datetime information");

        let (now, timezone_name) = resolve_now(timezone, Utc::now());
        Ok(render(&now, &timezone_name, format))
    }
}

/// Current time in the requested zone. No zone means local time; an
/// unknown zone falls back to UTC.
fn resolve_now(timezone: Option<&str>, now_utc: DateTime<Utc>) -> (DateTime<FixedOffset>, String) {
    match timezone {
        None => (now_utc.with_timezone(&Local).fixed_offset(), "Local".to_string()),
        Some(name) => match name.parse::<chrono_tz::Tz>() {
            Ok(tz) => (now_utc.with_timezone(&tz).fixed_offset(), name.to_string()),
            Err(_) => {
                tracing::warn!(timezone = name, "Unknown timezone, using UTC");
                (now_utc.fixed_offset(), "UTC".to_string())
            }
        },
    }
}

fn render(now: &DateTime<FixedOffset>, timezone_name: &str, format: OutputFormat) -> Value {
    let date = now.format("%Y-%m-%d").to_string();
    let time = now.format("%H:%M:%S").to_string();
    let (date, time) = match format {
        OutputFormat::Date => (Some(date), None),
        OutputFormat::Time => (None, Some(time)),
        OutputFormat::Full | OutputFormat::Iso => (Some(date), Some(time)),
    };

    let mut response = Map::new();
    response.insert("timezone".into(), json!(timezone_name));
    response.insert("date".into(), json!(date));
    response.insert("time".into(), json!(time));
    response.insert("weekday".into(), json!(now.format("%A").to_string()));
    response.insert("timestamp".into(), json!(now.timestamp()));
    if format == OutputFormat::Iso {
        response.insert("iso_format".into(), json!(now.to_rfc3339()));
    }
    Value::Object(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_named_timezone() {
        let (now, name) = resolve_now(Some("Asia/Tokyo"), fixed_now());
        assert_eq!(name, "Asia/Tokyo");
        let out = render(&now, &name, OutputFormat::Full);
        assert_eq!(out["date"], "2024-03-10");
        assert_eq!(out["time"], "21:30:00");
        assert_eq!(out["timestamp"], fixed_now().timestamp());
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let (now, name) = resolve_now(Some("Mars/Olympus"), fixed_now());
        assert_eq!(name, "UTC");
        assert_eq!(render(&now, &name, OutputFormat::Time)["time"], "12:30:00");
    }

    #[test]
    fn test_formats() {
        let (now, name) = resolve_now(Some("UTC"), fixed_now());
        let date_only = render(&now, &name, OutputFormat::Date);
        assert!(date_only["time"].is_null());
        assert_eq!(date_only["weekday"], "Sunday");

        let iso = render(&now, &name, OutputFormat::Iso);
        assert_eq!(iso["iso_format"], "2024-03-10T12:30:00+00:00");
        assert!(render(&now, &name, OutputFormat::Full).get("iso_format").is_none());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::parse("ISO"), OutputFormat::Iso);
        assert_eq!(OutputFormat::parse("whatever"), OutputFormat::Full);
    }

    #[test]
    fn test_execute_local() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let result = DateTimeTool.execute(json!({})).await.unwrap();
            assert_eq!(result["timezone"], "Local");
            assert!(result["date"].is_string());
        });
    }
}
