//! Step-major storage for costs and backpointers.

use crate::error::{HmmError, Result};

/// Accumulated minimum costs and backpointers, one column per decoded word.
///
/// Cell `(step, state)` lives at `step * n_states + state`. A backpointer of
/// `None` means the path started at `<s>` (only at step 0).
#[derive(Debug, Clone)]
pub(crate) struct Trellis {
    n_states: usize,
    costs: Vec<f64>,
    backpointers: Vec<Option<usize>>,
}

impl Trellis {
    pub(crate) fn new(n_states: usize) -> Self {
        Self {
            n_states,
            costs: Vec::new(),
            backpointers: Vec::new(),
        }
    }

    /// Drop every column, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.costs.clear();
        self.backpointers.clear();
    }

    /// Number of computed steps.
    pub(crate) fn len(&self) -> usize {
        if self.n_states == 0 {
            0
        } else {
            self.costs.len() / self.n_states
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Append a column; both slices must have one entry per state.
    pub(crate) fn push_column(&mut self, costs: &[f64], backpointers: &[Option<usize>]) {
        debug_assert_eq!(costs.len(), self.n_states);
        debug_assert_eq!(backpointers.len(), self.n_states);
        self.costs.extend_from_slice(costs);
        self.backpointers.extend_from_slice(backpointers);
    }

    /// Costs of every state at `step`.
    pub(crate) fn column(&self, step: usize) -> &[f64] {
        let start = step * self.n_states;
        &self.costs[start..start + self.n_states]
    }

    pub(crate) fn cost(&self, step: usize, state: usize) -> f64 {
        self.costs[step * self.n_states + state]
    }

    pub(crate) fn backpointer(&self, step: usize, state: usize) -> Option<usize> {
        self.backpointers[step * self.n_states + state]
    }

    /// Map a possibly negative step onto `[0, len)`; `-1` is the last step.
    pub(crate) fn resolve_step(&self, step: isize) -> Result<usize> {
        let len = self.len();
        let resolved = if step < 0 {
            len as isize + step
        } else {
            step
        };
        if resolved < 0 || resolved as usize >= len {
            return Err(HmmError::StepOutOfRange { step, len });
        }
        Ok(resolved as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> Trellis {
        let mut trellis = Trellis::new(2);
        trellis.push_column(&[1.0, 2.0], &[None, None]);
        trellis.push_column(&[3.5, 4.5], &[Some(1), Some(0)]);
        trellis
    }

    #[test]
    fn test_layout() {
        let trellis = two_columns();
        assert_eq!(trellis.len(), 2);
        assert_eq!(trellis.column(1), &[3.5, 4.5]);
        assert_eq!(trellis.cost(0, 1), 2.0);
        assert_eq!(trellis.backpointer(0, 0), None);
        assert_eq!(trellis.backpointer(1, 0), Some(1));
    }

    #[test]
    fn test_resolve_step() {
        let trellis = two_columns();
        assert_eq!(trellis.resolve_step(0).unwrap(), 0);
        assert_eq!(trellis.resolve_step(1).unwrap(), 1);
        assert_eq!(trellis.resolve_step(-1).unwrap(), 1);
        assert_eq!(trellis.resolve_step(-2).unwrap(), 0);
        assert!(matches!(
            trellis.resolve_step(2),
            Err(HmmError::StepOutOfRange { step: 2, len: 2 })
        ));
        assert!(matches!(
            trellis.resolve_step(-3),
            Err(HmmError::StepOutOfRange { step: -3, len: 2 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut trellis = two_columns();
        trellis.clear();
        assert!(trellis.is_empty());
        assert_eq!(trellis.len(), 0);
        assert!(trellis.resolve_step(0).is_err());
    }
}
