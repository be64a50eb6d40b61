//! ChanPak engine: filename classification, texture set building, mode
//! resolution, and channel compositing.
//!
//! The pipeline a caller drives, per folder:
//!
//! 1. [`matcher::SuffixTypeMatcher`] classifies filename stems into texture
//!    types and set names.
//! 2. [`set_builder::build_texture_sets`] groups classified files into
//!    [`set_builder::TextureSet`]s, probing each file's resolution.
//! 3. [`resolve::candidate_modes`] decides which configured packing modes
//!    can run against each set, and
//!    [`resolve::pick_target_resolution`] picks the output resolution.
//! 4. [`compositor::compose`] loads, resizes and merges source channels
//!    into the packed image.
//!
//! [`report::RunReport`] accumulates what happened for end-of-run output.

pub mod compositor;
pub mod image_io;
pub mod matcher;
pub mod report;
pub mod resolve;
pub mod set_builder;

pub use compositor::{compose, ComposeInput, ComposeResult, LoadFailure};
pub use image_io::ImageIoError;
pub use matcher::{MatchOutcome, MatchedName, MatcherError, SizeSuffixDetector, SuffixTypeMatcher};
pub use report::{
    CreatedOutput, FileAction, FileOperation, FileOutcome, RunReport, SkippedSet,
};
pub use resolve::{
    candidate_modes, pick_target_resolution, resolution_to_suffix, ModeCandidate, ResolutionIssue,
    ScaleNote, SuffixNote,
};
pub use set_builder::{build_texture_sets, TextureMapEntry, TextureSet};
