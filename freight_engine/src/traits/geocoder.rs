use freight_common::{Coordinate, RouteOption};

/// Address resolution and routing, as consumed by the order and registration workflows.
///
/// Implementations absorb every external failure: a lookup that fails for any reason yields `None`.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// The `[longitude, latitude]` of the best match for `address`, if there is one.
    async fn resolve_address(&self, address: &str) -> Option<Coordinate>;

    /// The driving route alternatives between two points. `None` means routing failed, which is different from
    /// `Some(vec![])`, a successful lookup that found no route.
    async fn fetch_routes(&self, start: Coordinate, end: Coordinate) -> Option<Vec<RouteOption>>;
}
