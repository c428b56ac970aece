// Markup rendering of a task view

use crate::models::Task;

/// Escape text for embedding in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a view as an HTML list fragment.
///
/// Task text is always escaped. An empty view renders the empty-state
/// paragraph instead of an empty list.
pub fn render_html(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "<p class=\"empty-state\">No tasks yet!</p>\n".to_string();
    }

    let mut out = String::from("<ul class=\"todo-list\">\n");
    for task in tasks {
        let class = if task.completed {
            "todo-item completed"
        } else {
            "todo-item"
        };
        out.push_str(&format!(
            "  <li class=\"{}\" data-id=\"{}\" draggable=\"true\">\n    <input type=\"checkbox\"{}>\n    <span class=\"todo-text\">{}</span>\n  </li>\n",
            class,
            task.id,
            if task.completed { " checked" } else { "" },
            escape_html(&task.text),
        ));
    }
    out.push_str("</ul>\n");
    out
}
