use std::time::Instant;

use super::view::{ViewState, EMPTY_PLACEHOLDER};

/// Renders the view as terminal lines: banner first, then one line per task.
pub fn render(view: &ViewState, now: Instant) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.items().len() + 1);
    if let Some(banner) = view.visible_banner(now) {
        lines.push(format!("! {}", banner.message));
    }
    if view.is_empty() {
        lines.push(EMPTY_PLACEHOLDER.to_string());
        return lines;
    }
    for (index, task) in view.items().iter().enumerate() {
        let mark = if task.completed { 'x' } else { ' ' };
        lines.push(format!(
            "#{:<3} [{mark}] {}  ({})",
            index + 1,
            task.text,
            task.id
        ));
    }
    lines
}

/// Maps user input to a task id: `#N` picks the N-th visible task, anything
/// else must be an id that is currently shown.
pub fn resolve_reference(view: &ViewState, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if let Some(position) = reference.strip_prefix('#') {
        let index = position.parse::<usize>().ok()?.checked_sub(1)?;
        return view.items().get(index).map(|task| task.id.clone());
    }
    view.get(reference).map(|task| task.id.clone())
}
