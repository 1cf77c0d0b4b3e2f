//! Form field state used by the wizard steps

/// Editable single-line text field
///
/// The cursor is a character index, so multi-byte input is safe to edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    label: &'static str,
    value: String,
    cursor: usize,
    sensitive: bool,
}

impl TextInput {
    pub fn new(label: &'static str, initial: impl Into<String>) -> Self {
        let value = initial.into();
        let cursor = value.chars().count();
        Self {
            label,
            value,
            cursor,
            sensitive: false,
        }
    }

    /// A field whose value is masked when displayed
    pub fn sensitive(label: &'static str, initial: impl Into<String>) -> Self {
        Self {
            sensitive: true,
            ..Self::new(label, initial)
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the value and move the cursor to the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor);
        self.value.insert(index, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor < self.value.chars().count() {
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Value as it should appear on screen
    pub fn display_value(&self) -> String {
        if self.sensitive {
            mask(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Mask all but the last four characters; short values are fully masked
pub fn mask(value: &str) -> String {
    let len = value.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = value.chars().skip(len - 4).collect();
    format!("{}{}", "*".repeat(len - 4), visible)
}

/// One option of a [`SelectList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub title: String,
    pub description: String,
}

impl<T> Choice<T> {
    pub fn new(value: T, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Single-choice list; the highlighted option is the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectList<T> {
    label: &'static str,
    items: Vec<Choice<T>>,
    cursor: usize,
}

impl<T> SelectList<T> {
    pub fn new(label: &'static str, items: Vec<Choice<T>>) -> Self {
        Self {
            label,
            items,
            cursor: 0,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn items(&self) -> &[Choice<T>] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&Choice<T>> {
        self.items.get(self.cursor)
    }

    pub fn selected_value(&self) -> Option<&T> {
        self.selected().map(|choice| &choice.value)
    }
}

impl<T: PartialEq> SelectList<T> {
    /// Move the cursor to `value` if present
    pub fn select(&mut self, value: &T) -> bool {
        match self.items.iter().position(|c| &c.value == value) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Progress indicator advanced by timer ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }

    pub fn ticks(&self) -> usize {
        self.frame
    }
}
