//! Keyboard shortcuts registry.
//!
//! Single source of truth for the editor's key bindings. The help dialog is
//! rendered from it.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., arrow key)
    pub alt_key: Option<KeyCode>,
    /// Whether Ctrl must be held
    pub ctrl: bool,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    pub category: ShortcutCategory,
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Editing,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Step list with no modal open
    StepList,
    /// Edit/insert modal
    StepModal,
}

impl ShortcutCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Editing => "Editing",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Editing,
        ]
    }
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::StepList => "Step List",
            ShortcutContext::StepModal => "Step Editor",
        }
    }

    /// All contexts in display order
    pub fn all() -> &'static [ShortcutContext] {
        &[ShortcutContext::StepList, ShortcutContext::StepModal]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "Ctrl+S", "j/↓")
    pub fn key_display(&self) -> String {
        let primary = if self.ctrl {
            format!("Ctrl+{}", format_keycode(&self.key).to_uppercase())
        } else {
            format_keycode(&self.key)
        };
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for help dialog (left-padded to 8 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<8}", self.key_display())
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Step list ===
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        ctrl: false,
        description: "Quit",
        category: ShortcutCategory::General,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        ctrl: false,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        ctrl: false,
        description: "Move down",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        ctrl: false,
        description: "Move up",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('g'),
        alt_key: Some(KeyCode::Home),
        ctrl: false,
        description: "First step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('G'),
        alt_key: Some(KeyCode::End),
        ctrl: false,
        description: "Last step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: Some(KeyCode::Char('e')),
        ctrl: false,
        description: "Edit step",
        category: ShortcutCategory::Editing,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('i'),
        alt_key: Some(KeyCode::Char('+')),
        ctrl: false,
        description: "Insert step below",
        category: ShortcutCategory::Editing,
        context: ShortcutContext::StepList,
    },
    Shortcut {
        key: KeyCode::Char('I'),
        alt_key: None,
        ctrl: false,
        description: "Insert step at start",
        category: ShortcutCategory::Editing,
        context: ShortcutContext::StepList,
    },
    // === Step modal ===
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: None,
        ctrl: true,
        description: "Save step",
        category: ShortcutCategory::Editing,
        context: ShortcutContext::StepModal,
    },
    Shortcut {
        key: KeyCode::Char('d'),
        alt_key: None,
        ctrl: true,
        description: "Remove step (press twice)",
        category: ShortcutCategory::Editing,
        context: ShortcutContext::StepModal,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        ctrl: false,
        description: "Cancel",
        category: ShortcutCategory::General,
        context: ShortcutContext::StepModal,
    },
];

pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(
    context: ShortcutContext,
) -> Vec<(ShortcutCategory, Vec<&'static Shortcut>)> {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.context == context && s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}
