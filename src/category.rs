//! The fixed set of transaction categories and their income/expense classification.
//!
//! A category decides whether a transaction counts as income or as an expense.
//! Labels outside the fixed set are kept as [Category::Other] and count as expenses.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or sends it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. rent.
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// The category of a transaction, e.g. 'Salary', 'Food', 'Housing'.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Wages from an employer.
    Salary,
    /// Income from work outside of a main job.
    SideHustle,
    /// Dividends, interest and other returns.
    Investments,
    /// Rent, mortgage payments and the like.
    Housing,
    /// Fuel, public transport, car maintenance.
    Transportation,
    /// Groceries and eating out.
    Food,
    /// Electricity, water, internet.
    Utilities,
    /// Doctor visits and medication.
    Medical,
    /// Hobbies and entertainment.
    Leisure,
    /// Courses, books and tuition.
    Education,
    /// Any label not in the fixed set, stored verbatim.
    Other(String),
}

impl Category {
    /// Every fixed category, income categories first.
    pub const ALL: [Category; 10] = [
        Category::Salary,
        Category::SideHustle,
        Category::Investments,
        Category::Housing,
        Category::Transportation,
        Category::Food,
        Category::Utilities,
        Category::Medical,
        Category::Leisure,
        Category::Education,
    ];

    /// The label shown to users and stored in the database.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Salary => "Salary",
            Category::SideHustle => "Side hustle",
            Category::Investments => "Investments",
            Category::Housing => "Housing",
            Category::Transportation => "Transportation",
            Category::Food => "Food",
            Category::Utilities => "Utilities",
            Category::Medical => "Medical",
            Category::Leisure => "Leisure",
            Category::Education => "Education",
            Category::Other(label) => label,
        }
    }

    /// Classify the category as income or expense.
    ///
    /// Unrecognised categories are expenses.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Category::Salary | Category::SideHustle | Category::Investments => {
                TransactionType::Income
            }
            _ => TransactionType::Expense,
        }
    }

    /// Whether transactions in this category are income.
    pub fn is_income(&self) -> bool {
        self.transaction_type() == TransactionType::Income
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
            .unwrap_or_else(|| Category::Other(label.to_owned()))
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from(label.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_owned()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, TransactionType};

    #[test]
    fn income_categories_classify_as_income() {
        for label in ["Salary", "Side hustle", "Investments"] {
            assert_eq!(
                Category::from(label).transaction_type(),
                TransactionType::Income,
                "{label} should be income"
            );
        }
    }

    #[test]
    fn expense_categories_classify_as_expense() {
        for label in [
            "Housing",
            "Transportation",
            "Food",
            "Utilities",
            "Medical",
            "Leisure",
            "Education",
        ] {
            assert_eq!(
                Category::from(label).transaction_type(),
                TransactionType::Expense,
                "{label} should be an expense"
            );
        }
    }

    #[test]
    fn unknown_category_is_kept_and_classified_as_expense() {
        let category = Category::from("Gifts");

        assert_eq!(category, Category::Other("Gifts".to_owned()));
        assert_eq!(category.as_str(), "Gifts");
        assert_eq!(category.transaction_type(), TransactionType::Expense);
    }

    #[test]
    fn labels_parse_back_to_the_same_category() {
        for category in Category::ALL {
            assert_eq!(Category::from(category.as_str()), category);
        }
    }

    #[test]
    fn income_categories_are_listed_first() {
        let first_expense = Category::ALL
            .iter()
            .position(|category| !category.is_income())
            .unwrap();

        assert_eq!(first_expense, 3);
        assert!(Category::ALL[first_expense..].iter().all(|c| !c.is_income()));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::SideHustle).unwrap();
        assert_eq!(json, "\"Side hustle\"");

        let category: Category = serde_json::from_str("\"Food\"").unwrap();
        assert_eq!(category, Category::Food);
    }
}
