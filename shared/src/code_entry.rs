//! Six single-digit fields, modelled without any DOM so the focus rules can be tested.

use crate::constants::CODE_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    None,
    Focus(usize),
    Submit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeEntry {
    digits: [Option<char>; CODE_LENGTH],
    focus: usize,
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn digit(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    pub fn value(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(CODE_LENGTH - 1);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn after_write(&self, next: usize) -> EntryAction {
        if self.is_complete() {
            EntryAction::Submit(self.value())
        } else {
            EntryAction::Focus(next.min(CODE_LENGTH - 1))
        }
    }

    /// Typed text for field `index`; only its first digit is kept.
    pub fn input(&mut self, index: usize, text: &str) -> EntryAction {
        self.set_focus(index);
        let Some(digit) = text.chars().find(char::is_ascii_digit) else {
            self.digits[self.focus] = None;
            return EntryAction::None;
        };

        self.digits[self.focus] = Some(digit);
        let next = self.focus + 1;
        let action = self.after_write(next);
        if let EntryAction::Focus(i) = action {
            self.focus = i;
        }
        action
    }

    /// Clears the current field, or steps back and clears the previous one
    /// when the current field is already empty.
    pub fn backspace(&mut self, index: usize) -> EntryAction {
        self.set_focus(index);
        if self.digits[self.focus].is_some() {
            self.digits[self.focus] = None;
            return EntryAction::Focus(self.focus);
        }
        if self.focus == 0 {
            return EntryAction::None;
        }
        self.focus -= 1;
        self.digits[self.focus] = None;
        EntryAction::Focus(self.focus)
    }

    /// Spreads pasted digits across the fields starting at `index`.
    pub fn paste(&mut self, index: usize, text: &str) -> EntryAction {
        self.set_focus(index);
        let mut position = self.focus;
        for digit in text.chars().filter(char::is_ascii_digit) {
            if position >= CODE_LENGTH {
                break;
            }
            self.digits[position] = Some(digit);
            position += 1;
        }

        if position == self.focus {
            return EntryAction::None;
        }

        let action = self.after_write(position);
        if let EntryAction::Focus(i) = action {
            self.focus = i;
        }
        action
    }

    /// Enter submits only a complete code.
    pub fn enter(&self) -> EntryAction {
        if self.is_complete() {
            EntryAction::Submit(self.value())
        } else {
            EntryAction::None
        }
    }
}
