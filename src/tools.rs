// 🧰 Agent Tooling
// Tool definitions a tool-calling model can be given, plus dispatch onto the ledger

use crate::error::{LedgerError, LedgerResult};
use crate::html::{extract_profile_cards, parse_badge_page};
use crate::ledger::Ledger;
use crate::points::points_table;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

fn name_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": description }
        },
        "required": ["name"]
    })
}

fn html_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "html": { "type": "string", "description": description }
        },
        "required": ["html"]
    })
}

fn no_args() -> Value {
    json!({ "type": "object", "properties": {} })
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "classify_and_score",
            description: "Classify a certification name into a tier and return the points it is worth.",
            parameters: name_schema("Certification or badge name"),
        },
        ToolDefinition {
            name: "record_badge",
            description: "Store a scraped badge card. Returns whether it was new.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Badge name; may be empty when raw_text starts with it" },
                    "raw_text": { "type": "string", "description": "Full card text including dates and any Expired marker" }
                },
                "required": ["raw_text"]
            }),
        },
        ToolDefinition {
            name: "get_total_points",
            description: "Get the total points from all valid certifications.",
            parameters: no_args(),
        },
        ToolDefinition {
            name: "get_category_breakdown",
            description: "Badge count and valid points per certification tier.",
            parameters: no_args(),
        },
        ToolDefinition {
            name: "calculate_certification_points",
            description: "How many points a certification would add, with current and projected totals. Nothing is stored.",
            parameters: name_schema("The name of the certification to look up"),
        },
        ToolDefinition {
            name: "get_my_certifications",
            description: "List all stored certifications with status and points.",
            parameters: no_args(),
        },
        ToolDefinition {
            name: "show_points_table",
            description: "Show the certification points table.",
            parameters: no_args(),
        },
        ToolDefinition {
            name: "inspect_badge_page",
            description: "Read badge name, holder and dates from a single Credly badge page, with the tier and points the badge is worth. Nothing is stored.",
            parameters: html_schema("HTML of a rendered Credly badge page"),
        },
        ToolDefinition {
            name: "import_profile",
            description: "Extract every badge card from a Credly profile page and store the new ones.",
            parameters: html_schema("HTML of a rendered Credly profile badges page"),
        },
    ]
}

fn str_arg<'v>(args: &'v Value, key: &str) -> Option<&'v str> {
    args.get(key).and_then(Value::as_str)
}

fn required_str<'v>(args: &'v Value, key: &str) -> LedgerResult<&'v str> {
    str_arg(args, key).ok_or_else(|| LedgerError::invalid(format!("missing string argument `{}`", key)))
}

fn to_value<T: Serialize>(value: &T) -> LedgerResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Run one tool call against the ledger.
pub fn call_tool(ledger: &Ledger<'_>, name: &str, args: &Value) -> LedgerResult<Value> {
    info!(tool = name, "tool call");

    match name {
        "classify_and_score" => {
            let score = ledger.classify_and_score(required_str(args, "name")?)?;
            to_value(&score)
        }
        "record_badge" => {
            let raw_text = required_str(args, "raw_text")?;
            let badge_name = str_arg(args, "name").unwrap_or("");
            let inserted = ledger.record_badge(badge_name, raw_text)?;
            Ok(json!({ "inserted": inserted }))
        }
        "get_total_points" => Ok(json!({ "total_points": ledger.total_points()? })),
        "get_category_breakdown" => to_value(&ledger.category_breakdown()?),
        "calculate_certification_points" => {
            let preview = ledger.preview_certification(required_str(args, "name")?)?;
            to_value(&preview)
        }
        "get_my_certifications" => to_value(&ledger.certifications()?),
        "show_points_table" => to_value(&points_table()),
        "inspect_badge_page" => {
            let details = parse_badge_page(required_str(args, "html")?)
                .map_err(|e| LedgerError::internal(e.to_string()))?;
            let score = ledger.classify_and_score(&details.badge_name)?;
            Ok(json!({ "details": to_value(&details)?, "score": to_value(&score)? }))
        }
        "import_profile" => {
            let cards = extract_profile_cards(required_str(args, "html")?)
                .map_err(|e| LedgerError::internal(e.to_string()))?;
            let summary = ledger.import_cards(&cards)?;
            to_value(&summary)
        }
        other => Err(LedgerError::invalid(format!("unknown tool `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::BadgeStore;

    #[test]
    fn test_every_definition_dispatches() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);
        let args = json!({
            "name": "AWS Certified Cloud Practitioner",
            "raw_text": "Issued\n2024",
            "html": "<html><body></body></html>"
        });

        assert_eq!(tool_definitions().len(), 9);
        for tool in tool_definitions() {
            assert!(
                call_tool(&ledger, tool.name, &args).is_ok(),
                "tool {} should dispatch",
                tool.name
            );
        }
    }

    #[test]
    fn test_record_then_total() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);

        let args = json!({ "name": "Some Vendor Advanced Badge", "raw_text": "Issued\nJune 2024" });
        assert_eq!(call_tool(&ledger, "record_badge", &args).unwrap(), json!({ "inserted": true }));
        assert_eq!(call_tool(&ledger, "record_badge", &args).unwrap(), json!({ "inserted": false }));

        let total = call_tool(&ledger, "get_total_points", &json!({})).unwrap();
        assert_eq!(total["total_points"], json!(10.0));

        let breakdown = call_tool(&ledger, "get_category_breakdown", &json!({})).unwrap();
        assert_eq!(breakdown["tiers"]["Specialty"]["badge_count"], json!(1));
    }

    #[test]
    fn test_preview_tool() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);

        let preview = call_tool(
            &ledger,
            "calculate_certification_points",
            &json!({ "name": "Totally Unrelated Badge" }),
        )
        .unwrap();
        assert_eq!(preview["tier"], json!("Unknown"));
        assert_eq!(preview["points"], json!(2.5));
        assert_eq!(preview["projected_total"], json!(2.5));
    }

    #[test]
    fn test_bad_calls() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);

        assert!(matches!(
            call_tool(&ledger, "launch_rockets", &json!({})),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            call_tool(&ledger, "classify_and_score", &json!({ "name": 7 })),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_inspect_badge_page_tool() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);
        let html = r#"
            <html><body>
              <div class="cr-badges-full-badge__head-group">AWS Certified Security Specialty</div>
              <p class="badge-banner-issued-to-text__name-and-celebrator-list">Jane Doe</p>
            </body></html>
        "#;

        let result = call_tool(&ledger, "inspect_badge_page", &json!({ "html": html })).unwrap();
        assert_eq!(result["details"]["badge_name"], json!("AWS Certified Security Specialty"));
        assert_eq!(result["details"]["certificate_holder"], json!("Jane Doe"));
        assert_eq!(result["details"]["dates"], json!("N/A"));
        assert_eq!(result["score"]["tier"], json!("Specialty"));
        assert_eq!(result["score"]["points"], json!(10.0));

        // Read-only
        assert_eq!(ledger.total_points().unwrap(), 0.0);
    }

    #[test]
    fn test_import_profile_tool() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);
        let html = r#"
            <html><body>
              <div data-test-id="badge-card">
                <h3>AWS Certified Cloud Practitioner</h3>
                <p>Issued</p><p>Jan 12, 2023</p>
              </div>
              <div data-test-id="badge-card">
                <h3>HashiCorp Certified: Terraform Associate</h3>
                <p>Issued</p><p>Feb 01, 2021</p>
                <p>Expired</p>
              </div>
            </body></html>
        "#;
        let args = json!({ "html": html });

        let summary = call_tool(&ledger, "import_profile", &args).unwrap();
        assert_eq!(summary["inserted"], json!(2));
        assert_eq!(summary["duplicates"], json!(0));

        let again = call_tool(&ledger, "import_profile", &args).unwrap();
        assert_eq!(again["inserted"], json!(0));
        assert_eq!(again["duplicates"], json!(2));

        // Terraform badge is expired
        assert_eq!(ledger.total_points().unwrap(), 10.0);

        assert!(matches!(
            call_tool(&ledger, "import_profile", &json!({})),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_encoding_failure_is_internal() {
        use std::collections::BTreeMap;

        // JSON object keys must be strings
        let value = BTreeMap::from([((1, 2), 3)]);
        assert!(matches!(to_value(&value), Err(LedgerError::Internal(_))));
    }
}
