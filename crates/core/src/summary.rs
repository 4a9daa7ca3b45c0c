//! Comma-joined, pluralised change summaries ("2 new scenes, 1 deleted scene").

/// Summary text when every category is empty.
pub const NO_CHANGES_SUMMARY: &str = "No changes detected";

/// Collects "<n> <noun>" clauses, skipping empty counts.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    clauses: Vec<String>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause for `count` items, picking `singular` when it is 1.
    pub fn count(mut self, count: usize, singular: &str, plural: &str) -> Self {
        if count > 0 {
            let noun = if count == 1 { singular } else { plural };
            self.clauses.push(format!("{count} {noun}"));
        }
        self
    }

    pub fn build(self) -> String {
        if self.clauses.is_empty() {
            NO_CHANGES_SUMMARY.to_string()
        } else {
            self.clauses.join(", ")
        }
    }
}
