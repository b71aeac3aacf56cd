pub mod annotator;
pub mod config;
pub mod document;
pub mod heuristics;
pub mod messaging;
pub mod search;
pub mod sentence_detector;

// Re-export main types for convenient access
pub use annotator::{
    Annotator, Flag, FlagReason, Highlight, HighlightKind, ScanResult, TooltipAction
};
pub use config::{AnnotatorConfig, SearchConfig};
pub use document::{ElementId, HostDocument, OverlayElement, Rect, StaticPage};
pub use heuristics::{BlockView, ClaimHeuristic, CueWordHeuristic};

// Re-export channel types used by hosts
pub use messaging::{
    status_line, Ack, Command, Response, SearchChannel, SearchDispatcher, SearchRequest, TabOpener
};
