//! PriceGrid core: pure search state machine, response contract, and
//! view-model derivation.
mod effect;
pub mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    BestDeal, Comparison, Metadata, Offer, PlatformBucket, PlatformSummary, PriceRange,
    SearchFailure, SearchOutcome, SearchRequest, SearchResponse,
};
pub use msg::Msg;
pub use state::{
    no_results_message, AppState, ErrorKind, ErrorNotice, Generation, SearchPhase,
    CONNECTIVITY_MESSAGE, DECLINED_FALLBACK_MESSAGE, SAMPLE_QUERIES, VALIDATION_MESSAGE,
};
pub use update::update;
pub use view_model::{
    bucket_offers, price_badge, AppViewModel, BestDealView, BucketView, ErrorView, PlatformRowView,
    PriceBadge, BEST_PRICE_THRESHOLD, BUCKET_DISPLAY_LIMIT,
};
