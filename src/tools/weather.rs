//! Weather lookup tool.
//!
//! Returns canned conditions for a handful of cities; anything else is
//! sunny and warm.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a specific location"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state or country, e.g., 'San Francisco, CA' or 'Paris, France'"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"],
                    "description": "The temperature unit to use"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let location = params
            .get("location")
            .and_then(|v| v.as_str())
            .context("Missing required parameter: location")?;
        let unit = params
            .get("unit")
            .and_then(|v| v.as_str())
            .unwrap_or("celsius");

        tracing::info!(location, unit, "Getting weather");

        let (celsius, fahrenheit, condition) = conditions_for(location);
        let temperature = if unit == "celsius" { celsius } else { fahrenheit };

        Ok(json!({
            "location": location,
            "temperature": temperature,
            "unit": unit,
            "condition": condition,
            "humidity": 65,
            "wind_speed": 10,
            "updated_at": super::local_timestamp(),
        }))
    }
}

fn conditions_for(location: &str) -> (i64, i64, &'static str) {
    let location = location.to_lowercase();
    if location.contains("london") {
        (15, 59, "Rainy")
    } else if location.contains("tokyo") {
        (20, 68, "Clear")
    } else if location.contains("new york") {
        (22, 72, "Partly Cloudy")
    } else {
        (25, 77, "Sunny")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    #[test]
    fn test_metadata() {
        let tool = WeatherTool;
        assert_eq!(tool.name(), "get_weather");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "location");
        assert_eq!(schema["properties"]["unit"]["enum"][1], "fahrenheit");
    }

    #[test]
    fn test_london_defaults_to_celsius() {
        rt().block_on(async {
            let result = WeatherTool
                .execute(json!({ "location": "London, UK" }))
                .await
                .unwrap();
            assert_eq!(result["temperature"], 15);
            assert_eq!(result["unit"], "celsius");
            assert_eq!(result["condition"], "Rainy");
            assert_eq!(result["humidity"], 65);
            let updated_at = result["updated_at"].as_str().unwrap();
            assert!(chrono::NaiveDateTime::parse_from_str(updated_at, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        });
    }

    #[test]
    fn test_fahrenheit_and_fallback_city() {
        rt().block_on(async {
            let tokyo = WeatherTool
                .execute(json!({ "location": "Tokyo", "unit": "fahrenheit" }))
                .await
                .unwrap();
            assert_eq!(tokyo["temperature"], 68);

            let paris = WeatherTool
                .execute(json!({ "location": "Paris, France" }))
                .await
                .unwrap();
            assert_eq!(paris["temperature"], 25);
            assert_eq!(paris["condition"], "Sunny");
        });
    }

    #[test]
    fn test_missing_location() {
        rt().block_on(async {
            let result = WeatherTool.execute(json!({})).await;
            assert!(result.unwrap_err().to_string().contains("location"));
        });
    }
}
