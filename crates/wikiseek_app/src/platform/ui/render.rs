use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use wikiseek_core::{AppViewModel, EntryKind, Phase, WikiEndpoint};

use super::constants::*;

/// Redraws the whole popup from the view model.
pub fn render(out: &mut impl Write, view: &AppViewModel) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;

    for endpoint in WikiEndpoint::ALL {
        let (column, _) = toggle_span(endpoint);
        let label = format!("[ {} ]", endpoint.label());
        queue!(out, MoveTo(column, ROW_TOGGLES))?;
        if endpoint == view.endpoint {
            queue!(out, SetAttribute(Attribute::Reverse), Print(label), SetAttribute(Attribute::Reset))?;
        } else {
            queue!(out, Print(label))?;
        }
    }
    if let Some(status) = status_text(view.phase) {
        queue!(out, MoveTo(TOGGLE_POE2.1 + 2, ROW_TOGGLES), Print(status))?;
    }

    if view.dropdown_open {
        for (index, entry) in view.entries.iter().enumerate() {
            let row = ROW_FIRST_ENTRY.saturating_add(index as u16);
            queue!(out, MoveTo(0, row))?;
            let highlighted = view.selected == Some(index);
            if highlighted {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            if entry.kind == EntryKind::FullTextSearch {
                queue!(out, SetAttribute(Attribute::Italic))?;
            }
            queue!(out, Print(format!("  {}", entry.label)), SetAttribute(Attribute::Reset))?;
        }
    }

    let hint_row = ROW_FIRST_ENTRY + view.entries.len() as u16 + 1;
    queue!(
        out,
        MoveTo(0, hint_row),
        SetAttribute(Attribute::Dim),
        Print(HINT_TEXT),
        SetAttribute(Attribute::Reset)
    )?;

    let cursor_column = (INPUT_PROMPT.chars().count() + view.query.chars().count()) as u16;
    queue!(
        out,
        MoveTo(0, ROW_INPUT),
        Print(INPUT_PROMPT),
        Print(&view.query),
        MoveTo(cursor_column, ROW_INPUT)
    )?;
    out.flush()
}

fn toggle_span(endpoint: WikiEndpoint) -> (u16, u16) {
    match endpoint {
        WikiEndpoint::Poe1 => TOGGLE_POE1,
        WikiEndpoint::Poe2 => TOGGLE_POE2,
    }
}

fn status_text(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Debouncing | Phase::AwaitingFetch => Some("searching…"),
        _ => None,
    }
}
