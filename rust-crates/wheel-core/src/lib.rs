pub use error::{
    LoadError,
    ValidationError,
    ValidationKind,
};
pub use options::{
    CHANCE_TOLERANCE,
    OptionConfig,
    ResolutionSummary,
    ResolvedOption,
    Wheel,
    resolve,
};
pub use outcome::{
    POINTER_ANGLE,
    Slice,
    SpinOutcome,
    pick_winner_index,
    plan_spin,
    slice_under_pointer,
    slices,
    target_angle,
};
pub use payload::{
    fingerprint,
    load_file,
    load_slice,
    load_str,
    parse_payload,
};
pub use random::{
    RandomSource,
    SequenceRandom,
};

pub mod error;
pub mod options;
pub mod outcome;
pub mod payload;
pub mod random;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
