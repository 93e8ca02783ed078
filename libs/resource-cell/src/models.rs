use std::fmt;
use serde::{Deserialize, Serialize};

use shared_models::EntityId;

/// Result of a manager operation as observed by the caller.
///
/// Failures have already been reported through the notification channel by
/// the time an operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Failed,
    /// The user declined, or the operation had nothing to act on.
    Declined,
}

/// What the edit form is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode<E> {
    Create,
    Edit(E),
}

impl<E> Default for FormMode<E> {
    fn default() -> Self {
        FormMode::Create
    }
}

impl<E> FormMode<E> {
    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }

    pub fn current(&self) -> Option<&E> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(item) => Some(item),
        }
    }
}

/// Plain-text rendering of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<(EntityId, Vec<String>)>,
    pub empty_message: String,
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;

        if self.rows.is_empty() {
            return writeln!(f, "{}", self.empty_message);
        }

        let mut widths: Vec<usize> = std::iter::once("ID".len())
            .chain(self.columns.iter().map(|c| c.chars().count()))
            .collect();
        for (id, cells) in &self.rows {
            widths[0] = widths[0].max(id.to_string().chars().count());
            for (i, cell) in cells.iter().enumerate() {
                if let Some(width) = widths.get_mut(i + 1) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let header: Vec<&str> = std::iter::once("ID")
            .chain(self.columns.iter().map(String::as_str))
            .collect();
        write_row(f, &header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths)?;

        for (id, cells) in &self.rows {
            let id = id.to_string();
            let line: Vec<&str> = std::iter::once(id.as_str())
                .chain(cells.iter().map(String::as_str))
                .collect();
            write_row(f, &line, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}
