pub mod resolve_query_target;
pub mod resolve_record_types;
pub mod run_query_plan;
pub mod transport;

pub use resolve_query_target::QueryTargetResolver;
pub use resolve_record_types::{RecordTypeResolver, DEFAULT_RECORD_TYPES};
pub use run_query_plan::{QueryPlan, ReplySet, RunQueryPlanUseCase};
pub use transport::QueryTransport;
