//! Maps terminal key and mouse events onto core messages.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use wikiseek_core::{Activation, AppViewModel, Key, Msg, WikiEndpoint};

use super::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Dispatch(Msg),
    /// End the session without navigating.
    Quit,
    Ignore,
}

pub fn map_key(event: KeyEvent, view: &AppViewModel) -> UiAction {
    if event.kind != KeyEventKind::Press {
        return UiAction::Ignore;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let msg = match event.code {
        KeyCode::Char('c') if ctrl => return UiAction::Quit,
        KeyCode::Char(_) if ctrl || event.modifiers.contains(KeyModifiers::ALT) => {
            return UiAction::Ignore
        }
        KeyCode::Char(ch) => {
            let mut text = view.query.clone();
            text.push(ch);
            Msg::InputChanged(text)
        }
        KeyCode::Backspace => {
            let mut text = view.query.clone();
            if text.pop().is_none() {
                return UiAction::Ignore;
            }
            Msg::InputChanged(text)
        }
        KeyCode::Up => Msg::KeyPressed(Key::Up),
        KeyCode::Down => Msg::KeyPressed(Key::Down),
        KeyCode::Enter => Msg::KeyPressed(Key::Enter),
        KeyCode::Esc => Msg::KeyPressed(Key::Escape),
        KeyCode::Tab | KeyCode::BackTab => Msg::EndpointSelected(view.endpoint.toggled()),
        KeyCode::F(1) => Msg::EndpointSelected(WikiEndpoint::Poe1),
        KeyCode::F(2) => Msg::EndpointSelected(WikiEndpoint::Poe2),
        _ => return UiAction::Ignore,
    };
    UiAction::Dispatch(msg)
}

pub fn map_mouse(event: MouseEvent, view: &AppViewModel) -> UiAction {
    let button = match event.kind {
        MouseEventKind::Down(button @ (MouseButton::Left | MouseButton::Middle)) => button,
        _ => return UiAction::Ignore,
    };

    let msg = match event.row {
        ROW_TOGGLES => match toggle_at(event.column) {
            Some(endpoint) => Msg::EndpointSelected(endpoint),
            None => Msg::PointerOutside,
        },
        ROW_INPUT => return UiAction::Ignore,
        row => match entry_at(row, view) {
            Some(index) => {
                let modified = event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
                let activation = if button == MouseButton::Middle || modified {
                    Activation::Secondary
                } else {
                    Activation::Primary
                };
                Msg::EntryActivated { index, activation }
            }
            None => Msg::PointerOutside,
        },
    };
    UiAction::Dispatch(msg)
}

fn toggle_at(column: u16) -> Option<WikiEndpoint> {
    let within = |(start, end): (u16, u16)| (start..end).contains(&column);
    if within(TOGGLE_POE1) {
        Some(WikiEndpoint::Poe1)
    } else if within(TOGGLE_POE2) {
        Some(WikiEndpoint::Poe2)
    } else {
        None
    }
}

fn entry_at(row: u16, view: &AppViewModel) -> Option<usize> {
    if !view.dropdown_open || row < ROW_FIRST_ENTRY {
        return None;
    }
    let index = usize::from(row - ROW_FIRST_ENTRY);
    (index < view.entries.len()).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiseek_core::{EntryKind, EntryView};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn click(button: MouseButton, column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers,
        }
    }

    fn open_view() -> AppViewModel {
        let entry = |label: &str, kind| EntryView {
            label: label.into(),
            url: format!("https://wiki/{label}"),
            kind,
        };
        AppViewModel {
            query: "Flame".into(),
            dropdown_open: true,
            entries: vec![
                entry("Flame Dash", EntryKind::Suggestion),
                entry("search", EntryKind::FullTextSearch),
            ],
            ..AppViewModel::default()
        }
    }

    #[test]
    fn typing_appends_to_query() {
        let view = open_view();
        assert_eq!(
            map_key(key(KeyCode::Char('s'), KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::InputChanged("Flames".into()))
        );
        assert_eq!(
            map_key(key(KeyCode::Backspace, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::InputChanged("Flam".into()))
        );
        assert_eq!(
            map_key(key(KeyCode::Backspace, KeyModifiers::NONE), &AppViewModel::default()),
            UiAction::Ignore
        );
    }

    #[test]
    fn control_keys_map_to_actions() {
        let view = open_view();
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), &view),
            UiAction::Quit
        );
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::KeyPressed(Key::Escape))
        );
        assert_eq!(
            map_key(key(KeyCode::Tab, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::EndpointSelected(WikiEndpoint::Poe2))
        );
        assert_eq!(
            map_key(key(KeyCode::F(1), KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::EndpointSelected(WikiEndpoint::Poe1))
        );
    }

    #[test]
    fn clicks_on_entries_choose_activation() {
        let view = open_view();
        assert_eq!(
            map_mouse(click(MouseButton::Left, 4, ROW_FIRST_ENTRY, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::EntryActivated {
                index: 0,
                activation: Activation::Primary,
            })
        );
        assert_eq!(
            map_mouse(
                click(MouseButton::Left, 4, ROW_FIRST_ENTRY + 1, KeyModifiers::CONTROL),
                &view
            ),
            UiAction::Dispatch(Msg::EntryActivated {
                index: 1,
                activation: Activation::Secondary,
            })
        );
        assert_eq!(
            map_mouse(click(MouseButton::Middle, 4, ROW_FIRST_ENTRY, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::EntryActivated {
                index: 0,
                activation: Activation::Secondary,
            })
        );
    }

    #[test]
    fn clicks_elsewhere_close_or_toggle() {
        let view = open_view();
        assert_eq!(
            map_mouse(click(MouseButton::Left, 0, 20, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::PointerOutside)
        );
        assert_eq!(
            map_mouse(click(MouseButton::Left, 10, ROW_TOGGLES, KeyModifiers::NONE), &view),
            UiAction::Dispatch(Msg::EndpointSelected(WikiEndpoint::Poe2))
        );
        assert_eq!(
            map_mouse(click(MouseButton::Left, 3, ROW_INPUT, KeyModifiers::NONE), &view),
            UiAction::Ignore
        );
        assert_eq!(
            map_mouse(click(MouseButton::Right, 4, ROW_FIRST_ENTRY, KeyModifiers::NONE), &view),
            UiAction::Ignore
        );
    }
}
