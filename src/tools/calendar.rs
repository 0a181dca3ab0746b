//! Calendar lookup tool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use super::Tool;

pub struct CalendarTool;

#[derive(Deserialize)]
struct CalendarArgs {
    date: String,
}

#[async_trait]
impl Tool for CalendarTool {
    fn name(&self) -> &str {
        "check_calendar"
    }

    fn description(&self) -> &str {
        "Check the user's calendar for events on a specific date"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "description": "The date to check, in ISO format (YYYY-MM-DD)"
                }
            },
            "required": ["date"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let args: CalendarArgs =
            serde_json::from_value(params).context("Missing required parameter: date")?;
        tracing::info!(date = %args.date, "Checking calendar");

        let events = events_on(&args.date, Local::now().date_naive());
        Ok(json!({
            "date": args.date,
            "total_events": events.len(),
            "events": events,
        }))
    }
}

/// Today has three meetings, tomorrow two; every other date is free.
fn events_on(date: &str, today: NaiveDate) -> Vec<Value> {
    let iso = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    if date == iso(today) {
        vec![
            json!({"time": "09:00-10:00", "title": "Team meeting"}),
            json!({"time": "12:00-13:00", "title": "Lunch with client"}),
            json!({"time": "15:00-16:30", "title": "Project review"}),
        ]
    } else if date == iso(today + Duration::days(1)) {
        vec![
            json!({"time": "11:00-12:00", "title": "Dentist appointment"}),
            json!({"time": "14:00-15:00", "title": "Weekly sync"}),
        ]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(events_on("2024-03-10", today).len(), 3);
        let tomorrow = events_on("2024-03-11", today);
        assert_eq!(tomorrow.len(), 2);
        assert_eq!(tomorrow[0]["title"], "Dentist appointment");
        assert!(events_on("2024-03-12", today).is_empty());
    }

    #[test]
    fn test_execute_today() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
            let result = CalendarTool.execute(json!({ "date": today })).await.unwrap();
            assert_eq!(result["total_events"], 3);
        });
    }

    #[test]
    fn test_missing_date() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            assert!(CalendarTool.execute(json!({})).await.is_err());
        });
    }
}
