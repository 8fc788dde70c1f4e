use super::AggregatedLine;

const TITLE: &str = "Shopping list";

/// Renders the list as a plain-text document
pub fn render_text(lines: &[AggregatedLine]) -> String {
    let mut out = format!("{TITLE}\n{}\n", "=".repeat(TITLE.len()));

    if lines.is_empty() {
        out.push_str("Your shopping cart is empty.\n");
        return out;
    }

    for (n, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({}) - {}\n",
            n + 1,
            line.name,
            line.measurement_unit,
            line.amount
        ));
    }
    out
}
