use std::fmt;

/// Editable part of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Title,
    Definition,
    Translation,
    Example,
    ExampleTranslation,
}

impl FieldKind {
    /// Field following `self` during guided creation, `None` once the order is exhausted.
    pub fn next(self) -> Option<FieldKind> {
        match self {
            FieldKind::Title => Some(FieldKind::Definition),
            FieldKind::Definition => Some(FieldKind::Translation),
            FieldKind::Translation => Some(FieldKind::Example),
            FieldKind::Example | FieldKind::ExampleTranslation => None,
        }
    }

    /// Both halves of an example are edited from the example menu.
    pub fn is_example(self) -> bool {
        matches!(self, FieldKind::Example | FieldKind::ExampleTranslation)
    }

    /// List-valued fields, where the index of a `FieldRef` is meaningful.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            FieldKind::Translation | FieldKind::Example | FieldKind::ExampleTranslation
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::Title => "Title",
            FieldKind::Definition => "Definition",
            FieldKind::Translation => "Translations",
            FieldKind::Example => "Example",
            FieldKind::ExampleTranslation => "Example translation",
        };
        f.write_str(label)
    }
}

/// Slot of a card: a field kind and, for list fields, a position.
/// An index equal to the list length designates the slot after the last element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub kind: FieldKind,
    pub index: usize,
}

impl FieldRef {
    pub fn new(kind: FieldKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn title() -> Self {
        Self::new(FieldKind::Title, 0)
    }

    pub fn definition() -> Self {
        Self::new(FieldKind::Definition, 0)
    }

    pub fn translation(index: usize) -> Self {
        Self::new(FieldKind::Translation, index)
    }

    pub fn example(index: usize) -> Self {
        Self::new(FieldKind::Example, index)
    }

    pub fn example_translation(index: usize) -> Self {
        Self::new(FieldKind::ExampleTranslation, index)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_list() {
            write!(f, "{}[{}]", self.kind, self.index)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
