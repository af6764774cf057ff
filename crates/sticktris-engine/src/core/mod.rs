pub use self::{board_pos::*, filled_area::*, shape::*};

pub(crate) mod board_pos;
pub(crate) mod filled_area;
pub(crate) mod shape;
