//! Keyboard state keyed by one canonical identifier.
//!
//! Hosts report three identifiers per key event: the symbolic name
//! (`"a"`, `"A"`, `"Shift"`), the physical code (`"KeyA"`, `"ShiftLeft"`) and
//! a legacy numeric code (`65`, `16`). State is stored once per physical code
//! ([`KeyId`]); names and legacy codes are remembered as aliases pointing at
//! the codes they were seen with, so a query by any of the three resolves to
//! the same bit. A key pressed as `"a"` and released as `"A"` therefore
//! clears cleanly.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::events::{KeyInput, Modifiers};

/// Canonical key identifier: the physical code when the host reports one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(String);

impl KeyId {
    /// Normalize a key event: physical code, else the legacy-code mapping,
    /// else the symbolic name.
    #[must_use]
    pub fn from_input(input: &KeyInput) -> Self {
        if !input.code.is_empty() {
            return Self(input.code.clone());
        }
        if let Some(code) = legacy_code(input.key_code) {
            return Self(code);
        }
        Self(input.key.clone())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Physical code for a legacy numeric key code, for the common keys.
#[must_use]
pub fn legacy_code(key_code: u32) -> Option<String> {
    let named = match key_code {
        8 => "Backspace",
        9 => "Tab",
        13 => "Enter",
        16 => "ShiftLeft",
        17 => "ControlLeft",
        18 => "AltLeft",
        27 => "Escape",
        32 => "Space",
        37 => "ArrowLeft",
        38 => "ArrowUp",
        39 => "ArrowRight",
        40 => "ArrowDown",
        46 => "Delete",
        48..=57 => return Some(format!("Digit{}", key_code - 48)),
        65..=90 => return char::from_u32(key_code).map(|c| format!("Key{c}")),
        96..=105 => return Some(format!("Numpad{}", key_code - 96)),
        112..=123 => return Some(format!("F{}", key_code - 111)),
        _ => return None,
    };
    Some(named.to_owned())
}

/// How a caller names a key: symbolic name or physical code, or legacy number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyQuery<'a> {
    Text(&'a str),
    Legacy(u32),
}

impl<'a> From<&'a str> for KeyQuery<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<u32> for KeyQuery<'_> {
    fn from(code: u32) -> Self {
        Self::Legacy(code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashSet<KeyId>,
    by_name: HashMap<String, BTreeSet<KeyId>>,
    by_legacy: HashMap<u32, BTreeSet<KeyId>>,
    modifiers: Modifiers,
}

impl KeyState {
    pub fn press(&mut self, input: &KeyInput) {
        let id = self.learn(input);
        self.down.insert(id);
        self.modifiers = input.modifiers;
    }

    pub fn release(&mut self, input: &KeyInput) {
        let id = self.learn(input);
        self.down.remove(&id);
        self.modifiers = input.modifiers;
    }

    /// Whether the key named by `query` is held.
    #[must_use]
    pub fn is_down<'q>(&self, query: impl Into<KeyQuery<'q>>) -> bool {
        match query.into() {
            KeyQuery::Text(text) => {
                self.down.contains(&KeyId(text.to_owned())) || self.any_down(self.by_name.get(text))
            }
            KeyQuery::Legacy(code) => self.any_down(self.by_legacy.get(&code)),
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.ctrl
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }

    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.alt
    }

    /// Codes currently held, sorted.
    #[must_use]
    pub fn pressed(&self) -> Vec<&str> {
        let mut codes = self.down.iter().map(KeyId::as_str).collect::<Vec<_>>();
        codes.sort_unstable();
        codes
    }

    /// Record the event's aliases and return its canonical id.
    fn learn(&mut self, input: &KeyInput) -> KeyId {
        let id = KeyId::from_input(input);
        if !input.key.is_empty() {
            self.by_name.entry(input.key.clone()).or_default().insert(id.clone());
        }
        if input.key_code != 0 {
            self.by_legacy.entry(input.key_code).or_default().insert(id.clone());
        }
        id
    }

    fn any_down(&self, ids: Option<&BTreeSet<KeyId>>) -> bool {
        ids.is_some_and(|ids| ids.iter().any(|id| self.down.contains(id)))
    }
}
