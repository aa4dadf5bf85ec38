/// Vertical bar of the table
pub const VERTICAL: char = '│';

/// Horizontal bar of the table
pub const HORIZONTAL: char = '─';

/// Position for lines inside the table
pub enum Position {
    Top,
    Middle,
    Bottom,
}

impl Position {
    /// Left, inner and right joints of a separator line
    pub fn joints(&self) -> (char, char, char) {
        match self {
            Self::Top => ('┌', '┬', '┐'),
            Self::Middle => ('├', '┼', '┤'),
            Self::Bottom => ('└', '┴', '┘'),
        }
    }
}
