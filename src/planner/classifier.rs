//! Keyword heuristics that decide what kind of deadline an event is.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Exam,
    Quiz,
    Project,
    Assignment,
    Other,
}

pub trait EventClassifier: Send + Sync {
    /// `text` is already lowercased.
    fn classify(&self, text: &str) -> EventCategory;
}

/// Substring rules checked in order; the first rule with a matching keyword wins.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(EventCategory, Vec<String>)>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, category: EventCategory, keywords: &[&str]) -> Self {
        self.rules.push((
            category,
            keywords.iter().map(|k| k.to_lowercase()).collect(),
        ));
        self
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
            .with_rule(EventCategory::Exam, &["exam", "test", "final"])
            .with_rule(EventCategory::Quiz, &["quiz", "midterm"])
            .with_rule(EventCategory::Project, &["project"])
            .with_rule(EventCategory::Assignment, &["assignment", "homework", "hw"])
    }
}

impl EventClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> EventCategory {
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(EventCategory::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_rules_take_precedence() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("quiz midterm exam"), EventCategory::Exam);
        assert_eq!(classifier.classify("other midterm review"), EventCategory::Quiz);
        assert_eq!(classifier.classify("homework final project"), EventCategory::Exam);
        assert_eq!(classifier.classify("assignment group project"), EventCategory::Project);
        assert_eq!(classifier.classify("homework problem set 3"), EventCategory::Assignment);
        assert_eq!(classifier.classify("hw 4"), EventCategory::Assignment);
        assert_eq!(classifier.classify("reading chapter 2"), EventCategory::Other);
        assert_eq!(classifier.classify(""), EventCategory::Other);
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let classifier = KeywordClassifier::new()
            .with_rule(EventCategory::Exam, &["Prüfung", "klausur"])
            .with_rule(EventCategory::Assignment, &["übung"]);
        assert_eq!(classifier.classify("klausur analysis"), EventCategory::Exam);
        assert_eq!(classifier.classify("prüfung"), EventCategory::Exam);
        assert_eq!(classifier.classify("übung 3"), EventCategory::Assignment);
        assert_eq!(classifier.classify("exam"), EventCategory::Other);
    }
}
