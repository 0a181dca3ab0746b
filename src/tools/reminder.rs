//! Reminder tool. Nothing is persisted; the reminder is acknowledged with a
//! fresh id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::Tool;

pub struct ReminderTool;

#[derive(Deserialize)]
struct ReminderArgs {
    title: String,
    time: String,
    #[serde(default)]
    description: String,
}

#[async_trait]
impl Tool for ReminderTool {
    fn name(&self) -> &str {
        "set_reminder"
    }

    fn description(&self) -> &str {
        "Set a reminder for the user"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title or subject of the reminder"
                },
                "time": {
                    "type": "string",
                    "description": "The time for the reminder in ISO format (YYYY-MM-DDTHH:MM:SS)"
                },
                "description": {
                    "type": "string",
                    "description": "Optional additional details for the reminder"
                }
            },
            "required": ["title", "time"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let args: ReminderArgs = serde_json::from_value(params)
            .context("Invalid reminder arguments: title and time are required")?;
        tracing::info!(title = %args.title, time = %args.time, "Setting reminder");

        Ok(json!({
            "reminder_id": reminder_id(),
            "title": args.title,
            "time": args.time,
            "description": args.description,
            "created_at": super::local_timestamp(),
            "status": "scheduled",
        }))
    }
}

fn reminder_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    #[test]
    fn test_set_reminder() {
        rt().block_on(async {
            let result = ReminderTool
                .execute(json!({ "title": "Dentist", "time": "2024-03-11T11:00:00" }))
                .await
                .unwrap();
            assert_eq!(result["status"], "scheduled");
            assert_eq!(result["description"], "");
            assert_eq!(result["reminder_id"].as_str().unwrap().len(), 8);
            let created_at = result["created_at"].as_str().unwrap();
            assert!(chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        });
    }

    #[test]
    fn test_missing_time() {
        rt().block_on(async {
            let err = ReminderTool
                .execute(json!({ "title": "Dentist" }))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("time"));
        });
    }
}
