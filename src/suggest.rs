//! Follow-up suggestions for chat queries.
//!
//! Queries are matched against keyword categories; each matching category
//! contributes its suggestions in declaration order, followed by the
//! general suggestions, and the list is cut to [`MAX_SUGGESTIONS`].

/// Maximum number of suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 4;

/// Topic category a query can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Study,
    Concept,
    Timer,
    General,
}

struct CategoryRule {
    category: Category,
    keywords: &'static [&'static str],
    suggestions: &'static [&'static str],
}

const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Study,
        keywords: &["study", "learn", "subject", "topic"],
        suggestions: &[
            "Create a study plan for this topic",
            "Set a timer for focused study",
            "Generate practice questions",
        ],
    },
    CategoryRule {
        category: Category::Concept,
        keywords: &["explain", "what is", "how does", "define"],
        suggestions: &[
            "Explain this in more detail",
            "Give me examples of this concept",
            "Break this down into simpler terms",
        ],
    },
    CategoryRule {
        category: Category::Timer,
        keywords: &["timer", "pomodoro", "focus", "study session"],
        suggestions: &[
            "Show my active timers",
            "Start a Pomodoro session",
            "Set another timer",
        ],
    },
    // Always matches.
    CategoryRule {
        category: Category::General,
        keywords: &[],
        suggestions: &[
            "Find research papers about this",
            "Help me with a different topic",
            "What other subjects can you help with?",
        ],
    },
];

impl CategoryRule {
    fn matches(&self, query: &str) -> bool {
        self.category == Category::General || self.keywords.iter().any(|k| query.contains(k))
    }
}

/// Categories a query falls into, in declaration order.
pub fn classify(query: &str) -> Vec<Category> {
    let query = query.to_lowercase();
    RULES
        .iter()
        .filter(|r| r.matches(&query))
        .map(|r| r.category)
        .collect()
}

impl Category {
    /// Follow-up prompts offered for this category.
    pub fn suggestions(self) -> &'static [&'static str] {
        RULES
            .iter()
            .find(|r| r.category == self)
            .map(|r| r.suggestions)
            .unwrap_or_default()
    }
}

/// Suggested follow-up prompts for a query.
pub fn followup_suggestions(query: &str) -> Vec<String> {
    classify(query)
        .into_iter()
        .flat_map(Category::suggestions)
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect()
}
