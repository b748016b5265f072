//! Pipeline stages: auction listing fetch and the earnings symbol join.

pub mod auctions;
pub mod earnings;
pub mod queries;

pub use auctions::fetch_auctions;
pub use earnings::EntityJoinPipeline;
