pub mod dashboard;
pub mod pager;
pub mod pipeline;
pub mod state;

pub use dashboard::{Dashboard, DashboardState, DashboardView, Notice, NO_MORE_NEWS};
pub use pager::{Batch, PageOutcome, Pager};
pub use pipeline::{AnnotatedBatch, Annotator};
pub use state::SessionState;

pub mod prelude {
    pub use super::{Dashboard, DashboardState, DashboardView, Notice};
    pub use ns_core::{Error, Result, ScoredArticle, Topic};
}
