//! Prompt construction for product classification

use crate::model::CategoryList;

/// Build the classification prompt for one product description
///
/// The description is substituted verbatim and the categories are joined
/// with `", "`. Nothing is escaped or truncated.
pub fn format_prompt(description: &str, categories: &CategoryList) -> String {
    format!(
        r#"You are an expert product classifier. Given the following product description and list of categories, choose the most appropriate category for the product.
Since this output will be used by other automated processing, only respond with the category name that matches the product description.

Product Description: {description}

Categories: {categories}

The best category for the product is:
"#,
        description = description,
        categories = categories.joined(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_description_and_categories() {
        let categories: CategoryList = ["Electronics", "Clothing"].into_iter().collect();
        let prompt = format_prompt("A smartphone with 128GB storage.", &categories);

        assert!(prompt.contains("Product Description: A smartphone with 128GB storage.\n"));
        assert!(prompt.contains("Categories: Electronics, Clothing\n"));
        assert!(prompt.contains("only respond with the category name"));
        assert!(prompt.trim_end().ends_with("The best category for the product is:"));
    }

    #[test]
    fn test_prompt_passes_input_through_unmodified() {
        let description = format!("{{braces}} \"quotes\" {}", "x".repeat(10_000));
        let categories: CategoryList = ["A, B", "C"].into_iter().collect();
        let prompt = format_prompt(&description, &categories);

        assert!(prompt.contains(&description));
        assert!(prompt.contains("Categories: A, B, C\n"));
    }

    #[test]
    fn test_prompt_with_empty_inputs() {
        let prompt = format_prompt("", &CategoryList::default());

        assert!(prompt.contains("Product Description: \n"));
        assert!(prompt.contains("Categories: \n"));
    }
}
