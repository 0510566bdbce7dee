/// Row holding the wiki toggles.
pub const ROW_TOGGLES: u16 = 0;
/// Row holding the search input.
pub const ROW_INPUT: u16 = 1;
/// First dropdown row; entry `i` is drawn on `ROW_FIRST_ENTRY + i`.
pub const ROW_FIRST_ENTRY: u16 = 3;

pub const INPUT_PROMPT: &str = "Search: ";

/// Column spans (inclusive start, exclusive end) of the toggle labels.
pub const TOGGLE_POE1: (u16, u16) = (0, 8);
pub const TOGGLE_POE2: (u16, u16) = (9, 17);

pub const HINT_TEXT: &str = "Tab/F1/F2 switch wiki | Up/Down select | Enter open | Esc close | Ctrl+C quit";
