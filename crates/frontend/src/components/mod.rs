pub mod legend;
pub mod map_controls;
pub mod point_popup;
pub mod tile_map;
