//! Table rendering
//!
//! Table elements carry two forms of their content: a flat whitespace-joined
//! text and an HTML rendering in `metadata.text_as_html`. The rendering goes
//! through [`TableRenderer`] so callers can plug in a different markup.

/// Renders a 2-D grid of cell texts as markup.
pub trait TableRenderer: Send + Sync {
    /// Render `rows`. Rows may have different lengths.
    fn render(&self, rows: &[Vec<String>]) -> String;
}

/// Renders a plain `<table>` with one `<tr>` per row and one `<td>` per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HtmlTableRenderer;

impl HtmlTableRenderer {
    #[inline]
    #[must_use = "creates a table renderer"]
    pub const fn new() -> Self {
        Self
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl TableRenderer for HtmlTableRenderer {
    fn render(&self, rows: &[Vec<String>]) -> String {
        let mut html = String::from("<table>");
        for row in rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

/// Non-empty cell texts joined by single spaces, row by row.
#[must_use = "returns the flattened table text"]
pub fn table_text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .flatten()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_render_simple_grid() {
        let rows = grid(&[&["Name", "Qty"], &["Apples", "3"]]);
        assert_eq!(
            HtmlTableRenderer::new().render(&rows),
            "<table><tr><td>Name</td><td>Qty</td></tr><tr><td>Apples</td><td>3</td></tr></table>"
        );
    }

    #[test]
    fn test_render_escapes_markup() {
        let rows = grid(&[&["a < b & c"]]);
        assert_eq!(
            HtmlTableRenderer.render(&rows),
            "<table><tr><td>a &lt; b &amp; c</td></tr></table>"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(HtmlTableRenderer.render(&[]), "<table></table>");
    }

    #[test]
    fn test_table_text_skips_empty_cells() {
        let rows = grid(&[&["Name", " ", "Qty"], &[], &["Apples", "3"]]);
        assert_eq!(table_text(&rows), "Name Qty Apples 3");
    }
}
