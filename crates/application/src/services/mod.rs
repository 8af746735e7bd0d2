pub mod naptr_selection;
pub mod resolver_settings;
pub mod srv_selection;
pub mod tuple_marks;

pub use naptr_selection::NaptrCandidate;
pub use resolver_settings::ResolverSettings;
pub use srv_selection::SrvCandidate;
pub use tuple_marks::{TupleMark, TupleMarks};
