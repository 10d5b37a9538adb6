//! Plain-text lake dump.

use frostlake_logic::constants::map_codes;
use frostlake_logic::grid::Grid;
use frostlake_logic::item::{EquipmentStore, Item};

const CELL_WIDTH: usize = 5;

/// One line per row; each cell shows its item code and occupant.
pub fn render_grid(grid: &Grid, store: &EquipmentStore) -> String {
    let mut out = String::new();
    for row in grid.rows_iter() {
        for cell in row {
            let item = match cell.item() {
                None => "",
                Some(Item::Wall) => map_codes::WALL,
                Some(Item::Entrance) => map_codes::ENTRANCE,
                Some(Item::Hazard(h)) => h.map_code(),
                Some(Item::Equipment(id)) => store.kind(id).map_or("?", |k| k.code()),
            };
            let text = match cell.occupant() {
                Some(id) if item.is_empty() => id.to_string(),
                Some(id) => format!("{item}{}", id.0),
                None => item.to_string(),
            };
            out.push_str(&format!("[{text:^w$}]", w = CELL_WIDTH - 2));
        }
        out.push('\n');
    }
    out
}
