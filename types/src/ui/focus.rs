/// Which part of the phonebook screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Filter,
    #[default]
    Name,
    Number,
    List,
}

impl Focus {
    pub const ALL: [Self; 4] = [Self::Filter, Self::Name, Self::Number, Self::List];

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Filter => Self::Name,
            Self::Name => Self::Number,
            Self::Number => Self::List,
            Self::List => Self::Filter,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Filter => Self::List,
            Self::Name => Self::Filter,
            Self::Number => Self::Name,
            Self::List => Self::Number,
        }
    }

    /// Whether this focus edits a text buffer.
    #[must_use]
    pub const fn is_text_input(self) -> bool {
        !matches!(self, Self::List)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Filter => "filter shown with",
            Self::Name => "name",
            Self::Number => "number",
            Self::List => "numbers",
        }
    }
}
