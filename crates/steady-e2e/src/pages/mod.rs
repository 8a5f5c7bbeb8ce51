// Pages - Page objects built from catalogs and facade calls
//
// Page objects only name logical elements and sequence facade operations.
// Resolution, waiting and retry stay in the facade.

mod base;
mod component;
mod header;
mod live;
mod sport;

pub use base::BasePage;
pub use component::BaseComponent;
pub use header::HeaderComponent;
pub use live::{LIVE_PATH, LivePage};
pub use sport::{RequiredButtons, SPORT_PATH, SportPage, SubPageLink};
