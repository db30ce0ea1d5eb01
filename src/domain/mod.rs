pub mod feed;
pub mod item;

pub use feed::NormalizedFeed;
pub use item::NormalizedItem;
