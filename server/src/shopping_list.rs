//! Shopping-list download text.
//!
//! The database groups the cart's ingredient rows by (name, unit) and sums
//! them. This module fixes the line order and renders the file body.

pub const FILENAME: &str = "foodgram_shopping_cart.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Orders by descending total. Ties are broken by name, then unit, so the
/// output does not depend on the database's grouping order or collation.
pub fn sort_lines(lines: &mut [ShoppingListLine]) {
    lines.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
    });
}

/// Renders one `Name (unit) - total` line per ingredient.
pub fn render(lines: &[ShoppingListLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{} ({}) - {}", line.name, line.measurement_unit, line.total))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, total: i64) -> ShoppingListLine {
        ShoppingListLine {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total,
        }
    }

    #[test]
    fn test_empty_cart() {
        let mut lines = Vec::new();
        sort_lines(&mut lines);
        assert_eq!(render(&lines), "");
    }

    #[test]
    fn test_largest_total_first() {
        // Flour 200 g + 100 g across two recipes, sugar 50 g, egg 2 pcs.
        let mut lines = vec![
            line("Egg", "шт", 2),
            line("Flour", "g", 300),
            line("Sugar", "g", 50),
        ];

        sort_lines(&mut lines);
        assert_eq!(
            render(&lines),
            "Flour (g) - 300\nSugar (g) - 50\nEgg (шт) - 2"
        );
    }

    #[test]
    fn test_same_name_different_unit_ordered_by_unit() {
        let mut lines = vec![line("Butter", "tbsp", 2), line("Butter", "g", 2)];

        sort_lines(&mut lines);
        assert_eq!(lines[0].measurement_unit, "g");
        assert_eq!(lines[1].measurement_unit, "tbsp");
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let mut lines = vec![line("Pepper", "g", 5), line("Basil", "g", 5), line("Oil", "ml", 5)];

        sort_lines(&mut lines);
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Basil", "Oil", "Pepper"]);
    }

    #[test]
    fn test_renders_totals_beyond_i32() {
        let lines = vec![line("Water", "ml", 3_000_000_000)];
        assert_eq!(render(&lines), "Water (ml) - 3000000000");
    }
}
