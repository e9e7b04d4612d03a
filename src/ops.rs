pub mod combine_latest;
pub mod concat;
pub mod debounce;
pub mod delay;
pub mod distinct_until_changed;
pub mod filter;
pub mod flat_map_first;
pub mod map;
pub mod merge;
pub mod merge_all;
pub mod scan;
pub mod skip;
pub mod start_with;
pub mod switch_latest;
pub mod tap;
pub mod throttle;
pub mod with_latest_from;
pub mod zip;

use map::MapOp;
use merge_all::MergeAllOp;
use switch_latest::SwitchLatestOp;

pub type FlatMapOp<S, F, ItemIn, Inner> =
  MergeAllOp<MapOp<S, F, ItemIn>, Inner>;
pub type FlatMapLatestOp<S, F, ItemIn, Inner> =
  SwitchLatestOp<MapOp<S, F, ItemIn>, Inner>;
pub type ConcatAllOp<S, Inner> = MergeAllOp<S, Inner>;
