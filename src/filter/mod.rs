//! Record-level predicates and the inputs they are built from.

pub mod allow_list;
pub mod chain;
pub mod channels;
pub mod quality;
pub mod time_window;

pub use allow_list::{AllowList, AllowListSources, Decision};
pub use chain::{CommentMode, FilterChain};
pub use channels::ChannelSet;
pub use time_window::{StartTime, TimeWindow, WindowSpec};
