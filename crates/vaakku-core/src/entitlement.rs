//! Anonymous Entitlement Tracking
//!
//! Counts free-tier attempts per feature for anonymous callers so the client
//! can refuse locally before contacting the server. The server remains the
//! authority: when it reports the quota as spent, the local counter is forced
//! up to the limit.
//!
//! Counters are re-read from storage on every call and never cached, so
//! several processes sharing one profile converge on the stored value. The
//! read-modify-write is not locked; concurrent increments can be lost.

use crate::feature::{Feature, FeatureLimits, ANONYMOUS_LIMITS};
use crate::storage::{SharedStore, ANONYMOUS_USAGE_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

// ============================================================================
// Types
// ============================================================================

/// Attempts consumed per feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Text-to-speech attempts
    pub tts: u32,
    /// Speech-to-text attempts
    pub stt: u32,
    /// Translation attempts
    pub translate: u32,
}

impl UsageCounters {
    /// Count for one feature
    #[must_use]
    pub fn get(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Tts => self.tts,
            Feature::Stt => self.stt,
            Feature::Translate => self.translate,
        }
    }

    fn get_mut(&mut self, feature: Feature) -> &mut u32 {
        match feature {
            Feature::Tts => &mut self.tts,
            Feature::Stt => &mut self.stt,
            Feature::Translate => &mut self.translate,
        }
    }

    /// Parse stored counters leniently
    ///
    /// Anything unreadable becomes zero: a missing key, a non-object document,
    /// a negative or non-numeric value. Numeric strings and fractional numbers
    /// are accepted (truncated). Counts above a limit are clamped to it.
    fn from_stored(raw: &str, limits: &FeatureLimits) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Usage counters unreadable, treating as fresh");
                return Self::default();
            }
        };

        let mut counters = Self::default();
        if let Some(map) = value.as_object() {
            for feature in Feature::ALL {
                let count = map.get(feature.as_str()).map_or(0, parse_count);
                *counters.get_mut(feature) = count.min(limits.get(feature));
            }
        }
        counters
    }
}

/// Parse one stored count; non-numeric or negative values are zero
fn parse_count(value: &serde_json::Value) -> u32 {
    let n = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    n.map_or(0, |n| n.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Gate state of one feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaState {
    /// Free attempts remain
    Available {
        /// Attempts left
        remaining: u32,
    },
    /// No free attempts remain; only clearing storage resets this
    Exhausted,
}

// ============================================================================
// EntitlementTracker
// ============================================================================

/// Persisted per-feature usage gate for anonymous callers
#[derive(Clone)]
pub struct EntitlementTracker {
    store: SharedStore,
    limits: FeatureLimits,
}

impl EntitlementTracker {
    /// Create a tracker with the standard anonymous allowances
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            limits: ANONYMOUS_LIMITS,
        }
    }

    /// Allowance for a feature
    #[must_use]
    pub fn limit(&self, feature: Feature) -> u32 {
        self.limits.get(feature)
    }

    /// Current counters, read fresh from storage
    #[must_use]
    pub fn counters(&self) -> UsageCounters {
        match self.store.get(ANONYMOUS_USAGE_KEY) {
            Ok(Some(raw)) => UsageCounters::from_stored(&raw, &self.limits),
            Ok(None) => UsageCounters::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read usage counters, treating as fresh");
                UsageCounters::default()
            }
        }
    }

    /// Attempts consumed for a feature
    #[must_use]
    pub fn usage(&self, feature: Feature) -> u32 {
        self.counters().get(feature)
    }

    /// Attempts left: `max(0, limit - count)`
    #[must_use]
    pub fn remaining(&self, feature: Feature) -> u32 {
        self.limit(feature).saturating_sub(self.usage(feature))
    }

    /// `true` when no attempts are left
    #[must_use]
    pub fn is_exhausted(&self, feature: Feature) -> bool {
        self.remaining(feature) == 0
    }

    /// Gate state for a feature
    #[must_use]
    pub fn state(&self, feature: Feature) -> QuotaState {
        match self.remaining(feature) {
            0 => QuotaState::Exhausted,
            remaining => QuotaState::Available { remaining },
        }
    }

    /// Count one successful attempt, never exceeding the limit
    ///
    /// Call once per confirmed success; repeated calls each count.
    pub fn record_attempt(&self, feature: Feature) {
        let mut counters = self.counters();
        let limit = self.limit(feature);
        let count = counters.get_mut(feature);

        if *count >= limit {
            debug!(feature = %feature, "Usage already at limit");
            return;
        }

        *count += 1;
        let remaining = limit - *count;
        self.write(&counters);
        debug!(feature = %feature, remaining, "Recorded anonymous attempt");
    }

    /// Force a feature to its limit after the server reports it spent
    ///
    /// Only ever raises the counter; a counter already at the limit is left
    /// untouched.
    pub fn force_exhaust(&self, feature: Feature) {
        let mut counters = self.counters();
        let limit = self.limit(feature);
        let count = counters.get_mut(feature);

        if *count >= limit {
            return;
        }

        let previous = *count;
        *count = limit;
        self.write(&counters);
        info!(feature = %feature, previous, limit, "Anonymous quota reconciled with server");
    }

    fn write(&self, counters: &UsageCounters) {
        let json = match serde_json::to_string(counters) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode usage counters");
                return;
            }
        };
        if let Err(e) = self.store.set(ANONYMOUS_USAGE_KEY, &json) {
            warn!(error = %e, "Failed to persist usage counters");
        }
    }
}
