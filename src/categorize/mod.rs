use crate::models::{Category, Expense};

/// Ordered substring rules. The first rule with a matching token wins, so order is significant.
pub(crate) const RULES: &[(Category, &[&str])] = &[
    // "tim" also catches "Tims", "tim's" and "Timmies"
    (Category::Coffee, &["tim", "starbucks", "coffee"]),
    (Category::Gas, &["gas", "fuel"]),
    (Category::Food, &["food", "restaurant", "mcdonald", "domino"]),
    (Category::Cannabis, &["weed", "cannabis"]),
];

pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    tokens: Vec<String>,
    category: Category,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(RULES)
    }
}

impl Categorizer {
    pub(crate) fn new(rules: &[(Category, &[&str])]) -> Self {
        let compiled = rules
            .iter()
            .map(|(category, tokens)| CompiledRule {
                tokens: tokens.iter().map(|t| t.to_lowercase()).collect(),
                category: *category,
            })
            .collect();

        Self { rules: compiled }
    }

    pub(crate) fn categorize(&self, description: &str) -> Category {
        let desc_lower = description.to_lowercase();

        for rule in &self.rules {
            if rule.tokens.iter().any(|t| desc_lower.contains(t.as_str())) {
                return rule.category;
            }
        }

        Category::Other
    }

    pub(crate) fn categorize_expense(&self, expense: &Expense) -> Category {
        self.categorize(&expense.description)
    }
}

#[cfg(test)]
mod tests;
