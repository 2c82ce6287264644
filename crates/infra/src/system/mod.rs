use chrono::Utc;

/// Clock seam. Use cases read the current time through this so tests can
/// pin it to a fixed instant.
pub trait ISys: Send + Sync {
    /// Current UTC timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// The wall clock, used everywhere outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
