//! Human-readable tool catalog for clients.

use serde::Serialize;

/// Description of a tool as shown to users.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [&'static str],
    pub example: &'static str,
}

/// Tools the assistant can use, with example requests.
pub fn tool_catalog() -> Vec<ToolInfo> {
    vec![
        ToolInfo {
            name: "Study Plan Creator",
            description: "Create comprehensive study plans with time allocation",
            parameters: &["topic", "hours", "learning style"],
            example: "Create a 10-hour study plan for calculus for visual learners",
        },
        ToolInfo {
            name: "Concept Explainer",
            description: "Get detailed explanations of complex concepts",
            parameters: &["concept", "difficulty level"],
            example: "Explain quantum physics to a beginner",
        },
        ToolInfo {
            name: "Study Timer",
            description: "Set a study timer for focused learning sessions",
            parameters: &["duration (minutes)", "subject", "timer name (optional)"],
            example: "Set a 25-minute timer for math practice",
        },
        ToolInfo {
            name: "Pomodoro Session",
            description: "Start a Pomodoro technique session (25min focus, 5min break)",
            parameters: &["subject", "number of sessions (optional)"],
            example: "Start a Pomodoro session for physics with 4 sessions",
        },
        ToolInfo {
            name: "Practice Questions",
            description: "Generate practice questions with answers",
            parameters: &["topic", "difficulty", "count"],
            example: "Generate 5 medium difficulty questions about algebra",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_value(tool_catalog()).unwrap();
        assert_eq!(json[0]["name"], "Study Plan Creator");
        assert_eq!(json[2]["parameters"][0], "duration (minutes)");
    }
}
