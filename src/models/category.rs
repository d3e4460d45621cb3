/// Reporting-only spending category, derived from an expense description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Coffee,
    Gas,
    Food,
    Cannabis,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coffee => "Coffee",
            Self::Gas => "Gas",
            Self::Food => "Food",
            Self::Cannabis => "Cannabis",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
