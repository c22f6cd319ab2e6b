pub mod lookup;

pub use lookup::{
    QueryPlan, QueryTargetResolver, QueryTransport, RecordTypeResolver, ReplySet,
    RunQueryPlanUseCase, DEFAULT_RECORD_TYPES,
};
