mod outcome;
mod poller;
mod rate_limit;
mod resolver;
mod snapshot;
mod stages;

pub use outcome::{classify, Outcome};
pub use poller::{
    Completion, PollerState, StatusPoller, StatusSource, TrackerEvent, POLL_INTERVAL,
    SUCCESS_GRACE,
};
pub use rate_limit::{interpret, interpret_at, RateLimitInfo, RateLimitNotice};
pub use resolver::{complete, resolve, StageProgress, StageState};
pub use snapshot::{JobId, StatusSnapshot};
pub use stages::{StageDescriptor, StageRegistry};
