mod mongodb;
pub mod query;
pub mod join;

pub use mongodb::MongoDBService;
pub use query::RangeQuery;
pub use join::{join_related, Joined};
