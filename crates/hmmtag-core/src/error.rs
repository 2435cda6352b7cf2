use thiserror::Error;

/// Errors that can occur while training or decoding with the tagger.
#[derive(Debug, Error)]
pub enum HmmError {
    /// A probability lookup used a condition that never occurred in training.
    #[error("unknown condition {condition:?}: never observed during training")]
    UnknownCondition {
        /// The condition (a tag, or `<s>` for transitions) that was looked up.
        condition: String,
    },

    /// A trellis query named a tag that is not a decoding state.
    #[error("unknown state {tag:?}")]
    UnknownState {
        /// The offending tag.
        tag: String,
    },

    /// The decoder was asked to tag a sentence with no words.
    #[error("cannot decode an empty sentence")]
    EmptySentence,

    /// `step`, `terminate`, `backtrace` or a trellis query ran before `initialize`.
    #[error("decoder has not been initialized with a first word")]
    NotInitialized,

    /// `backtrace` or a `</s>` query ran before `terminate`.
    #[error("decoder has not been terminated")]
    NotTerminated,

    /// `step` ran after `terminate` closed the sentence.
    #[error("decoder already terminated; call initialize to start a new sentence")]
    AlreadyTerminated,

    /// A trellis query addressed a step that has not been computed.
    #[error("step {step} out of range for trellis with {len} steps")]
    StepOutOfRange {
        /// The requested step, as given by the caller.
        step: isize,
        /// Number of computed steps.
        len: usize,
    },

    /// Training data contained no tagged words.
    #[error("training corpus contains no tagged words")]
    EmptyCorpus,

    /// Training data used one of the synthetic boundary tags.
    #[error("tag {tag:?} is reserved for sentence boundaries")]
    ReservedTag {
        /// The reserved tag found in the data.
        tag: String,
    },

    /// An invalid trainer configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model (de)serialization failed.
    #[error("model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a model failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tagger operations.
pub type Result<T> = std::result::Result<T, HmmError>;
