//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Top-level screens. Navigation lives in memory only.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Home,
    /// Category picker when nothing is active, category detail otherwise
    Work,
    Admin,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    OpenWork,
    OpenAdmin,
    GoHome,
    MoveUp,
    MoveDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    /// Enter while editing: add the category or item being typed
    Submit,

    // Categories
    EnterCategory,
    LeaveCategory,
    DeleteCategory,

    // Items
    ToggleItem,
    DeleteItem,
    ReloadItems,

    // Popups
    DismissNotice,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// UI context needed to map a key to an event
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub screen: Screen,
    pub in_category: bool,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub has_notice: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups swallow the next key
    if ctx.has_notice {
        return Some(UiEvent::DismissNotice);
    }
    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    match ctx.screen {
        Screen::Home => handle_home_keys(key),
        Screen::Admin => handle_admin_keys(key),
        Screen::Work if ctx.in_category => handle_detail_keys(key),
        Screen::Work => handle_picker_keys(key),
    }
}

fn handle_home_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('w') | KeyCode::Char('1') => Some(UiEvent::OpenWork),
        KeyCode::Char('a') | KeyCode::Char('2') => Some(UiEvent::OpenAdmin),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}

fn handle_admin_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('e') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteCategory),
        KeyCode::Esc | KeyCode::Char('h') => Some(UiEvent::GoHome),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}

fn handle_picker_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
        KeyCode::Enter => Some(UiEvent::EnterCategory),
        KeyCode::Esc | KeyCode::Char('h') => Some(UiEvent::GoHome),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}

fn handle_detail_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('e') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
        KeyCode::Char(' ') | KeyCode::Char('t') | KeyCode::Enter => Some(UiEvent::ToggleItem),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteItem),
        KeyCode::Char('r') => Some(UiEvent::ReloadItems),
        KeyCode::Char('l') => Some(UiEvent::LeaveCategory),
        KeyCode::Esc | KeyCode::Char('h') => Some(UiEvent::GoHome),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}
