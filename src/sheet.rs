use crate::cell::Cell;
use std::collections::HashMap;

/// Read side of the sheet, as seen by the evaluator.
///
/// The evaluator trusts the committed value/error of whatever cell comes
/// back; recalculation ordering and cycle prevention live with the caller.
pub trait CellLookup {
    fn get_cell_by_label(&self, label: &str) -> Cell;
}

/// Label-keyed store of committed cells.
///
/// Labels that were never assigned read back as unset cells, which the
/// evaluator reports as invalid references.
#[derive(Debug, Clone, Default)]
pub struct SheetMemory {
    cells: HashMap<String, Cell>,
}

impl SheetMemory {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    pub fn set_cell(&mut self, label: &str, cell: Cell) {
        self.cells.insert(label.to_string(), cell);
    }

    pub fn clear_cell(&mut self, label: &str) {
        self.cells.remove(label);
    }

    /// Assigned labels in grid order: shorter columns first, then column
    /// letters, then row number (A2 before A10, Z9 before AA1).
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.cells.keys().cloned().collect();
        labels.sort_by_key(|label| {
            let letters = label
                .chars()
                .take_while(|c| c.is_ascii_uppercase())
                .count();
            let row: u64 = label[letters..].parse().unwrap_or(0);
            (letters, label[..letters].to_string(), row)
        });
        labels
    }
}

impl CellLookup for SheetMemory {
    fn get_cell_by_label(&self, label: &str) -> Cell {
        self.cells.get(label).cloned().unwrap_or_default()
    }
}
