//! Column resolution order.
//!
//! A column is converted only after every column it requires. Among the
//! columns that are ready, the leftmost goes first, so arrays without
//! dependencies resolve in column order.

use std::collections::BTreeSet;

use crate::error::{Result, StandardizeError};

/// Returns the column indices in resolution order.
///
/// `requires[i]` lists the columns column `i` needs. `names` is only used
/// to report a cycle.
pub fn resolution_order(requires: &[Vec<usize>], names: &[String]) -> Result<Vec<usize>> {
    let count = requires.len();
    let mut pending = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (column, needs) in requires.iter().enumerate() {
        for &needed in needs {
            if needed >= count {
                return Err(StandardizeError::configuration(format!(
                    "column {column} requires column {needed}, which does not exist"
                )));
            }
            pending[column] += 1;
            dependents[needed].push(column);
        }
    }

    let mut ready: BTreeSet<usize> = (0..count).filter(|&c| pending[c] == 0).collect();
    let mut order = Vec::with_capacity(count);
    while let Some(column) = ready.pop_first() {
        order.push(column);
        for &dependent in &dependents[column] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < count {
        let columns = (0..count)
            .filter(|&c| pending[c] > 0)
            .map(|c| names.get(c).cloned().unwrap_or_else(|| c.to_string()))
            .collect();
        return Err(StandardizeError::DependencyCycle { columns });
    }
    Ok(order)
}
