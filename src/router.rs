use crate::domain::health::HealthView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Default,
    Fallback,
    Unavailable,
}

/// Picks the upstream for one dispatch from a single health view. Ties
/// on response time go to the default upstream.
pub fn choose(view: &HealthView) -> Route {
    let d = &view.default;
    let f = &view.fallback;

    if !d.failing && (f.failing || d.min_response_time <= f.min_response_time) {
        Route::Default
    } else if !f.failing && (d.failing || f.min_response_time <= d.min_response_time) {
        Route::Fallback
    } else {
        Route::Unavailable
    }
}
