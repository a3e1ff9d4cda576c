use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const ROMAN: Color = Color::BrightYellow;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const DUPLICATE: Color = Color::Yellow;
