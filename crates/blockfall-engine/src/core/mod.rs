pub use self::{board::*, collision::*, piece::*};

pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod piece;

/// Playing field width in cells.
pub const FIELD_WIDTH: usize = 10;
/// Playing field height in cells.
pub const FIELD_HEIGHT: usize = 20;
/// Side length of the square bounding grid every piece shape lives in.
pub const SHAPE_SIZE: usize = 5;
