use std::time::Duration;

use jiff::Timestamp;

use super::*;

pub trait TimeExt {
    fn now() -> Self;
    /// The instant `age` before `self`, saturating at the representable range.
    fn earlier_by(&self, age: Duration) -> Self;
    fn age_at(&self, now: &Self) -> Duration;
}

impl TimeExt for metav1::Time {
    /// Create a metav1::Time set to the current UTC time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_recycler_ext::{metav1, TimeExt as _};
    /// let now = metav1::Time::now();
    /// ```
    fn now() -> Self {
        Self(Timestamp::now())
    }

    fn earlier_by(&self, age: Duration) -> Self {
        let millis = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
        let then = self.0.as_millisecond().saturating_sub(millis);
        Timestamp::from_millisecond(then)
            .map(Self)
            .unwrap_or(Self(Timestamp::MIN))
    }

    /// Elapsed time from `self` until `now`; zero when `self` lies in the future.
    fn age_at(&self, now: &Self) -> Duration {
        let elapsed = now.0.as_millisecond().saturating_sub(self.0.as_millisecond());
        u64::try_from(elapsed)
            .map(Duration::from_millis)
            .unwrap_or_default()
    }
}
