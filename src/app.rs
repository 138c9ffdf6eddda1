//! App state and core application logic
//!
//! Owns the two search boxes and the equation, routes keyboard input to
//! them, and applies completions arriving from background tasks. All state
//! changes happen on the event loop that owns the [`App`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::MovieService;
use crate::equation::{EquationEngine, EquationEvent};
use crate::generation::Emitter;
use crate::models::{Movie, Operator, ResultSlot, SearchCache, Slot};
use crate::search::{OperandChange, SearchCoordinator, SearchEvent};

// =============================================================================
// Events
// =============================================================================

/// Completions posted by background tasks to the event loop
#[derive(Debug)]
pub enum AppEvent {
    Search(Slot, SearchEvent),
    Equation(EquationEvent),
}

// =============================================================================
// Selection State
// =============================================================================

/// Highlight position in a candidate list
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Operand Box
// =============================================================================

/// One operand: its search box plus the highlighted candidate
pub struct OperandBox {
    pub search: SearchCoordinator,
    pub list: ListState,
}

impl OperandBox {
    fn new(search: SearchCoordinator) -> Self {
        Self {
            search,
            list: ListState::default(),
        }
    }

    /// Candidate under the cursor
    pub fn highlighted(&self) -> Option<&Movie> {
        self.search.candidates().get(self.list.selected)
    }

    fn sync_list(&mut self) {
        self.list.set_len(self.search.candidates().len());
    }

    fn type_char(&mut self, c: char) {
        let mut value = self.search.value().to_string();
        value.push(c);
        self.search.on_input_change(&value);
    }

    fn backspace(&mut self) {
        let mut value = self.search.value().to_string();
        value.pop();
        self.search.on_input_change(&value);
        self.sync_list();
    }
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Operand box receiving keyboard input
    pub focus: Slot,
    pub first: OperandBox,
    pub second: OperandBox,
    pub engine: EquationEngine,
    /// Transient message shown in the status bar
    pub error: Option<String>,
}

impl App {
    pub fn new(
        service: Arc<dyn MovieService>,
        cache: Arc<SearchCache>,
        debounce: Duration,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let search_box = |slot: Slot| {
            let tx = events.clone();
            let emit = Emitter::new(move |event| {
                let _ = tx.send(AppEvent::Search(slot, event));
            });
            let search = SearchCoordinator::new(slot, Arc::clone(&service), Arc::clone(&cache), emit)
                .with_debounce(debounce);
            OperandBox::new(search)
        };

        let first = search_box(Slot::First);
        let second = search_box(Slot::Second);

        let tx = events.clone();
        let engine = EquationEngine::new(
            Arc::clone(&service),
            Emitter::new(move |event| {
                let _ = tx.send(AppEvent::Equation(event));
            }),
        );

        Self {
            running: true,
            focus: Slot::First,
            first,
            second,
            engine,
            error: None,
        }
    }

    pub fn operand_box(&self, slot: Slot) -> &OperandBox {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    fn operand_box_mut(&mut self, slot: Slot) -> &mut OperandBox {
        match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        }
    }

    /// Whether the focused box shows a search input (no operand chosen yet)
    pub fn is_editing(&self) -> bool {
        self.engine.operand(self.focus).is_none()
    }

    pub fn result(&self) -> &ResultSlot {
        self.engine.result()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Put a movie straight into a slot, as if picked from the list
    pub fn prefill(&mut self, slot: Slot, movie: Movie) {
        let change = self.operand_box_mut(slot).search.select(Some(movie));
        self.apply_change(change);
    }

    pub fn set_operator(&mut self, operator: Operator) {
        self.engine.set_operator(operator);
    }

    fn apply_change(&mut self, change: OperandChange) {
        self.operand_box_mut(change.slot).sync_list();
        self.engine.set_operand(change.slot, change.movie);
    }

    // -------------------------------------------------------------------------
    // Background completions
    // -------------------------------------------------------------------------

    /// Apply a completion posted by a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Search(slot, event) => {
                let operand_box = self.operand_box_mut(slot);
                let change = operand_box.search.handle(event);
                operand_box.sync_list();
                if let Some(change) = change {
                    self.apply_change(change);
                }
            }
            AppEvent::Equation(event) => {
                self.engine.handle(event);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.error = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.quit();
                return true;
            }
            KeyCode::Char('o') if ctrl => {
                self.engine.toggle_operator();
                return true;
            }
            KeyCode::Char('x') if ctrl => {
                self.clear_focused();
                return true;
            }
            KeyCode::Esc => {
                self.quit();
                return true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.other();
                return true;
            }
            _ => {}
        }

        if self.is_editing() {
            self.handle_editing_key(key)
        } else {
            self.handle_selected_key(key)
        }
    }

    /// Keys while the focused box is a search input
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        let focus = self.focus;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.operand_box_mut(focus).type_char(c);
                true
            }
            KeyCode::Backspace => {
                self.operand_box_mut(focus).backspace();
                true
            }
            KeyCode::Up => {
                self.operand_box_mut(focus).list.up();
                true
            }
            KeyCode::Down => {
                self.operand_box_mut(focus).list.down();
                true
            }
            KeyCode::Enter => {
                let Some(movie) = self.operand_box(focus).highlighted().cloned() else {
                    return false;
                };
                let change = self.operand_box_mut(focus).search.select(Some(movie));
                self.apply_change(change);
                true
            }
            _ => false,
        }
    }

    /// Keys while the focused box shows a chosen movie
    fn handle_selected_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => {
                self.clear_focused();
                true
            }
            KeyCode::Char('o') | KeyCode::Char(' ') => {
                self.engine.toggle_operator();
                true
            }
            KeyCode::Char('+') => {
                self.engine.set_operator(Operator::Add);
                true
            }
            KeyCode::Char('-') => {
                self.engine.set_operator(Operator::Subtract);
                true
            }
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            _ => false,
        }
    }

    fn clear_focused(&mut self) {
        let focus = self.focus;
        let change = self.operand_box_mut(focus).search.clear();
        self.apply_change(change);
    }
}
