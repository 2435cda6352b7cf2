//! # Viterbi Decoder
//!
//! Finds the most likely tag sequence for a sentence, word by word.
//!
//! Every score here is a **cost**, `-log2 P`: lower is better and the
//! recurrence takes minima, not maxima. With `c[s, t]` the trellis cost of
//! state `s` at step `t`:
//!
//! ```text
//! c[s, 0] = -log2 P(s | <s>) - log2 P(w0 | s)
//! c[s, t] = min_p ( c[p, t-1] - log2 P(s | p) - log2 P(wt | s) )
//! final   = min_s ( c[s, T-1] - log2 P(</s> | s) )
//! ```
//!
//! Step `t` is the column of the `t`-th word. `<s>` is the implicit origin of
//! step 0 and `</s>` is folded in by [`ViterbiDecoder::terminate`]. Neither
//! gets a column of its own. Ties keep the first minimum in states-list order.

use tracing::debug;

use crate::decoder::trellis::Trellis;
use crate::error::{HmmError, Result};
use crate::model::HmmModel;
use crate::types::{END_TAG, START_TAG, fold_case};

/// Lifecycle of a [`ViterbiDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// No sentence started yet.
    Uninitialized,
    /// At least one word consumed; more may follow.
    Decoding,
    /// `</s>` folded in; the best path can be read back.
    Terminated,
}

/// Viterbi decoder over a borrowed model.
///
/// The trellis is scratch space: [`initialize`](Self::initialize) wipes it,
/// so one decoder can be reused across sentences without any state leaking
/// from one to the next.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder<'m> {
    model: &'m HmmModel,
    trellis: Trellis,
    phase: DecoderPhase,
    /// Best final state and its cost including `</s>`.
    terminal: Option<(usize, f64)>,
    costs: Vec<f64>,
    backpointers: Vec<Option<usize>>,
}

impl<'m> ViterbiDecoder<'m> {
    /// Create a decoder for `model`.
    pub fn new(model: &'m HmmModel) -> Self {
        let n_states = model.num_states();
        Self {
            model,
            trellis: Trellis::new(n_states),
            phase: DecoderPhase::Uninitialized,
            terminal: None,
            costs: Vec::with_capacity(n_states),
            backpointers: Vec::with_capacity(n_states),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DecoderPhase {
        self.phase
    }

    /// Number of words consumed so far.
    pub fn len(&self) -> usize {
        self.trellis.len()
    }

    /// Returns `true` if no word has been consumed.
    pub fn is_empty(&self) -> bool {
        self.trellis.is_empty()
    }

    /// The best final tag and its total cost, once terminated.
    pub fn final_state(&self) -> Option<(&'m str, f64)> {
        let model = self.model;
        self.terminal
            .map(|(state, cost)| (model.states()[state].as_str(), cost))
    }

    /// -log2 P(word | state) for an already folded word.
    fn emission_cost(&self, state: usize, word: &str) -> Result<f64> {
        let tag = &self.model.states()[state];
        Ok(-self.model.emission().logprob_folded(tag, word)?)
    }

    /// Start a new sentence with its first word.
    ///
    /// Fills step 0 with `-(log2 P(s | <s>) + log2 P(word | s))` for every
    /// state; each backpointer points at `<s>`.
    pub fn initialize(&mut self, first_word: &str) -> Result<()> {
        self.trellis.clear();
        self.terminal = None;
        self.phase = DecoderPhase::Uninitialized;

        let model = self.model;
        let word = fold_case(first_word);
        let start = &model.costs().start;
        self.costs.clear();
        self.backpointers.clear();
        for (state, &start_cost) in start.iter().enumerate() {
            let cost = start_cost + self.emission_cost(state, &word)?;
            self.costs.push(cost);
            self.backpointers.push(None);
        }

        self.trellis.push_column(&self.costs, &self.backpointers);
        self.phase = DecoderPhase::Decoding;
        Ok(())
    }

    /// Consume the next word, adding one trellis column.
    ///
    /// # Errors
    /// - [`HmmError::NotInitialized`] before [`initialize`](Self::initialize)
    /// - [`HmmError::AlreadyTerminated`] after [`terminate`](Self::terminate)
    pub fn step(&mut self, word: &str) -> Result<()> {
        match self.phase {
            DecoderPhase::Uninitialized => return Err(HmmError::NotInitialized),
            DecoderPhase::Terminated => return Err(HmmError::AlreadyTerminated),
            DecoderPhase::Decoding => {}
        }

        let model = self.model;
        let word = fold_case(word);
        let n = model.num_states();
        let transition = &model.costs().transition;
        let prev = self.trellis.column(self.trellis.len() - 1);

        let mut costs = std::mem::take(&mut self.costs);
        let mut backpointers = std::mem::take(&mut self.backpointers);
        costs.clear();
        backpointers.clear();

        for state in 0..n {
            let emission = self.emission_cost(state, &word)?;

            let mut best_cost = f64::INFINITY;
            let mut best_prev = 0;
            for (p, &prev_cost) in prev.iter().enumerate() {
                let cost = prev_cost + transition[p * n + state] + emission;
                if cost < best_cost {
                    best_cost = cost;
                    best_prev = p;
                }
            }

            costs.push(best_cost);
            backpointers.push(Some(best_prev));
        }

        self.trellis.push_column(&costs, &backpointers);
        self.costs = costs;
        self.backpointers = backpointers;
        Ok(())
    }

    /// Fold in the transition to `</s>` and pick the best final state.
    ///
    /// Calling it again on a terminated decoder is a no-op.
    ///
    /// # Errors
    /// [`HmmError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn terminate(&mut self) -> Result<()> {
        match self.phase {
            DecoderPhase::Uninitialized => return Err(HmmError::NotInitialized),
            DecoderPhase::Terminated => return Ok(()),
            DecoderPhase::Decoding => {}
        }

        let model = self.model;
        let last = self.trellis.column(self.trellis.len() - 1);
        let mut best: Option<(usize, f64)> = None;
        for (state, (&cost, &end)) in last.iter().zip(&model.costs().end).enumerate() {
            let total = cost + end;
            if best.is_none_or(|(_, best_cost)| total < best_cost) {
                best = Some((state, total));
            }
        }

        self.terminal = best;
        self.phase = DecoderPhase::Terminated;
        if let Some((state, cost)) = best {
            debug!(
                steps = self.trellis.len(),
                final_state = %model.states()[state],
                cost,
                "viterbi terminated"
            );
        }
        Ok(())
    }

    /// Follow backpointers from the final state to step 0.
    ///
    /// Returns one tag per consumed word, in input order. Never contains
    /// `<s>` or `</s>`.
    ///
    /// # Errors
    /// [`HmmError::NotInitialized`] or [`HmmError::NotTerminated`] when
    /// called out of order.
    pub fn backtrace(&self) -> Result<Vec<String>> {
        let (mut state, _) = match self.phase {
            DecoderPhase::Uninitialized => return Err(HmmError::NotInitialized),
            DecoderPhase::Decoding => return Err(HmmError::NotTerminated),
            DecoderPhase::Terminated => self.terminal.ok_or(HmmError::NotTerminated)?,
        };

        let states = self.model.states();
        let mut tags = Vec::with_capacity(self.trellis.len());
        for step in (0..self.trellis.len()).rev() {
            tags.push(states[state].clone());
            match self.trellis.backpointer(step, state) {
                Some(prev) => state = prev,
                None => break,
            }
        }
        tags.reverse();
        Ok(tags)
    }

    /// Run a whole sentence: initialize, step, terminate, backtrace.
    ///
    /// # Errors
    /// [`HmmError::EmptySentence`] for zero words.
    pub fn decode<S: AsRef<str>>(&mut self, words: &[S]) -> Result<Vec<String>> {
        let (first, rest) = words.split_first().ok_or(HmmError::EmptySentence)?;
        self.initialize(first.as_ref())?;
        for word in rest {
            self.step(word.as_ref())?;
        }
        self.terminate()?;
        self.backtrace()
    }

    fn state_of(&self, tag: &str) -> Result<usize> {
        self.model
            .state_index(tag)
            .ok_or_else(|| HmmError::UnknownState {
                tag: tag.to_string(),
            })
    }

    fn resolve_step(&self, step: isize) -> Result<usize> {
        if self.phase == DecoderPhase::Uninitialized {
            return Err(HmmError::NotInitialized);
        }
        self.trellis.resolve_step(step)
    }

    /// `</s>` only exists at the last step, after termination.
    fn terminal_at(&self, step: usize) -> Result<(usize, f64)> {
        if step + 1 != self.trellis.len() {
            return Err(HmmError::UnknownState {
                tag: END_TAG.to_string(),
            });
        }
        self.terminal.ok_or(HmmError::NotTerminated)
    }

    /// Accumulated minimum cost (-log2 P) of `tag` at `step`.
    ///
    /// Negative steps count back from the last one (`-1` is the last).
    /// `</s>` at the last step gives the best total cost including the end
    /// transition.
    pub fn viterbi_cost(&self, tag: &str, step: isize) -> Result<f64> {
        let step = self.resolve_step(step)?;
        if tag == END_TAG {
            return self.terminal_at(step).map(|(_, cost)| cost);
        }
        let state = self.state_of(tag)?;
        Ok(self.trellis.cost(step, state))
    }

    /// The state that `tag` at `step` came from.
    ///
    /// At step 0 every state comes from `<s>`. `</s>` at the last step
    /// comes from the best final state.
    pub fn backpointer(&self, tag: &str, step: isize) -> Result<String> {
        let step = self.resolve_step(step)?;
        let states = self.model.states();
        if tag == END_TAG {
            let (state, _) = self.terminal_at(step)?;
            return Ok(states[state].clone());
        }
        let state = self.state_of(tag)?;
        Ok(match self.trellis.backpointer(step, state) {
            Some(prev) => states[prev].clone(),
            None => START_TAG.to_string(),
        })
    }
}
