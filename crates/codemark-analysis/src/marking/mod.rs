//! Backdoor marking: spec validation, corpus partitioning, selection, and
//! split assembly.

pub mod assembler;
pub mod backdoor;
pub mod partition;
pub mod pipeline;
pub mod result;
pub mod selector;
pub mod stats;

pub use assembler::{AssembledDataset, SplitAssembler};
pub use backdoor::{parse_backdoors, validate_mark_rates, BackdoorSpec, BackdoorTerm};
pub use partition::split_contiguous;
pub use pipeline::{MarkingPipeline, SampleOutcome, SampleState};
pub use result::{ActualRecord, Blob, PartResult, RewriteResult, TestRecord};
pub use selector::{select, Selection, SelectionOrder};
pub use stats::{CorpusStats, MarkCounts, PartStats, RateStats};
